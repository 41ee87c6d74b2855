//! Timbre Core
//!
//! Platform-agnostic buffer types, effect parameters, traits, and error
//! handling shared by every Timbre crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Buffer Types**: `AudioBuffer`, `AudioFormat`, `SampleRate`
//! - **Effect Parameters**: one explicit record per transform (`DelayParams`, `EqParams`, ...)
//! - **Core Traits**: `AudioDecoder`, `AudioEncoder`, `AudioTransform`, `AudioOutput`, `AudioInput`
//! - **Error Handling**: Unified `TimbreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use timbre_core::{AudioBuffer, SampleRate};
//!
//! // Two frames of stereo audio
//! let buffer = AudioBuffer::from_interleaved(vec![0.1, -0.1, 0.2, -0.2], 2, SampleRate::CD_QUALITY)?;
//! assert_eq!(buffer.frames(), 2);
//! assert_eq!(buffer.channel(1), vec![-0.1, -0.2]);
//! # Ok::<(), timbre_core::TimbreError>(())
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Result, TimbreError};
pub use traits::{AudioDecoder, AudioEncoder, AudioInput, AudioOutput, AudioTransform};

pub use types::{
    // Buffer types
    AudioBuffer, AudioFormat, SampleRate,
    // Effect parameters
    ChorusParams, CompressorParams, DelayParams, DistortionParams, EqParams, FilterSpec,
    NoiseReducerParams, ReverbParams,
};

/// Converts a decibel value to a linear amplitude factor.
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Converts a linear amplitude to decibels, flooring at `floor` to avoid `log(0)`.
#[inline]
pub fn linear_to_db(linear: f32, floor: f32) -> f32 {
    20.0 * linear.max(floor).log10()
}
