//! Offline sample rate conversion
//!
//! Whole-buffer conversion between integer sample rates using a rational
//! ratio `up/down` (the two rates divided by their GCD). Every channel is
//! converted independently and the output holds exactly
//! `round(frames * up / down)` frames.
//!
//! The heavy lifting is done by rubato's FFT resampler, which runs a
//! band-limiting filter at the lower of the two Nyquist frequencies, so
//! downsampling does not alias.
//!
//! ## Example
//!
//! ```rust
//! use timbre_audio::resampling::resample;
//! use timbre_core::{AudioBuffer, SampleRate};
//!
//! let input = AudioBuffer::silence(44_100, 2, SampleRate::CD_QUALITY)?;
//! let output = resample(&input, 48_000)?;
//! assert_eq!(output.frames(), 48_000);
//! assert_eq!(output.sample_rate(), 48_000);
//! # Ok::<(), timbre_core::TimbreError>(())
//! ```

mod rubato_backend;

use thiserror::Error;
use timbre_core::{AudioBuffer, Result as TimbreResult, SampleRate, TimbreError};
use tracing::debug;

pub use rubato_backend::RubatoResampler;

/// Resampling errors
#[derive(Error, Debug)]
pub enum ResamplingError {
    #[error("Invalid sample rate: {0} Hz (must be > 0)")]
    InvalidSampleRate(u32),

    #[error("Input channels have different lengths")]
    RaggedInput,

    #[error("Resampler initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

pub type Result<T> = std::result::Result<T, ResamplingError>;

impl From<ResamplingError> for TimbreError {
    fn from(err: ResamplingError) -> Self {
        match err {
            ResamplingError::InvalidSampleRate(hz) => {
                TimbreError::invalid_parameter("sample_rate", hz, "must be > 0")
            }
            other => TimbreError::Resample(other.to_string()),
        }
    }
}

/// Reduced conversion ratio `up / down`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RationalRatio {
    pub up: u64,
    pub down: u64,
}

impl RationalRatio {
    /// Ratio from `source_rate` to `target_rate`, reduced by the GCD
    pub fn new(source_rate: u32, target_rate: u32) -> Result<Self> {
        for rate in [source_rate, target_rate] {
            if rate == 0 {
                return Err(ResamplingError::InvalidSampleRate(rate));
            }
        }
        let divisor = gcd(u64::from(source_rate), u64::from(target_rate));
        Ok(Self {
            up: u64::from(target_rate) / divisor,
            down: u64::from(source_rate) / divisor,
        })
    }

    /// `round(frames * up / down)`
    ///
    /// Rounding makes an upsample followed by the inverse downsample land
    /// back on the original frame count.
    pub fn output_frames(&self, frames: usize) -> usize {
        let frames = frames as u64;
        ((frames * self.up + self.down / 2) / self.down) as usize
    }

    pub fn is_identity(&self) -> bool {
        self.up == self.down
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Convert a buffer to `target_rate`
///
/// Returns an unchanged copy when the rates already match and an empty
/// buffer at the target rate for empty input. The bit depth is carried over.
pub fn resample(input: &AudioBuffer, target_rate: u32) -> TimbreResult<AudioBuffer> {
    let ratio = RationalRatio::new(input.sample_rate(), target_rate)?;

    if ratio.is_identity() {
        return Ok(input.clone());
    }

    let bits = input.format().bits_per_sample;
    let channels = input.format().channels;

    if input.is_empty() {
        return Ok(AudioBuffer::from_interleaved(Vec::new(), channels, SampleRate::new(target_rate))?
            .with_bits_per_sample(bits));
    }

    debug!(
        from = input.sample_rate(),
        to = target_rate,
        up = ratio.up,
        down = ratio.down,
        frames = input.frames(),
        "resampling"
    );

    let mut resampler = RubatoResampler::new(input.sample_rate(), target_rate, input.channels())?;
    let planar = resampler.process_all(&input.to_channels())?;

    Ok(AudioBuffer::from_channels(planar, SampleRate::new(target_rate))?.with_bits_per_sample(bits))
}
