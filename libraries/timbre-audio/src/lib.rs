//! Timbre Audio
//!
//! Decoding, encoding, resampling, effects and analysis for Timbre.
//!
//! This crate provides:
//! - Audio decoding via Symphonia (WAV, FLAC, OGG/Vorbis, MP3, AAC)
//! - WAV encoding via hound
//! - Rational sample rate conversion via rubato
//! - Stateless effects (EQ, noise reduction, delay, chorus, reverb,
//!   distortion, filters, pan, dynamics)
//! - Signal metrics and a composable processing pipeline
//!
//! # Example: Decoding Audio
//!
//! ```rust,no_run
//! use timbre_audio::{compute_metrics, read};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let buffer = read("/music/take.flac")?;
//! println!("{}", compute_metrics(&buffer));
//! # Ok(())
//! # }
//! ```
//!
//! # Example: Using Effects
//!
//! ```rust
//! use timbre_audio::effects::{compress, parametric_eq};
//! use timbre_audio::test_utils::signals;
//! use timbre_core::{CompressorParams, EqParams};
//!
//! let input = signals::sine(220.0, 44_100, 0.25, 0.8, 2);
//! let eq = EqParams::default().with_gains(3.0, -2.0, 2.0);
//! let output = compress(&parametric_eq(&input, &eq)?, &CompressorParams::default())?;
//! assert_eq!(output.frames(), input.frames());
//! # Ok::<(), timbre_core::TimbreError>(())
//! ```

mod decoder;
mod device;
pub mod effects;
mod encoder;
pub mod filter_design;
mod metrics;
pub mod pipeline;
pub mod resampling;
pub mod test_utils;

pub use decoder::{read, SymphoniaDecoder};
pub use device::LoopbackDevice;
pub use encoder::{write, WavEncoder};
pub use metrics::{compute_metrics, Metrics};
pub use pipeline::{Pipeline, Stage};
pub use resampling::resample;
