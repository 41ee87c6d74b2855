/// Audio-related types
use crate::error::{Result, TimbreError};
use serde::{Deserialize, Serialize};

/// Sample rate in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleRate(pub u32);

impl SampleRate {
    /// Common sample rates
    pub const CD_QUALITY: Self = Self(44_100);
    pub const DVD_QUALITY: Self = Self(48_000);

    /// Create a new sample rate
    #[must_use]
    pub fn new(hz: u32) -> Self {
        Self(hz)
    }

    /// Get the sample rate as Hz
    pub fn as_hz(&self) -> u32 {
        self.0
    }

    /// Nyquist frequency in Hz
    pub fn nyquist(&self) -> f64 {
        f64::from(self.0) / 2.0
    }
}

/// Audio format information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFormat {
    /// Sample rate
    pub sample_rate: SampleRate,

    /// Number of channels (1 = mono, 2 = stereo, etc.)
    pub channels: u16,

    /// Bits per sample of the source (or the preferred output depth)
    pub bits_per_sample: u16,
}

impl AudioFormat {
    /// Create a new audio format
    pub fn new(sample_rate: SampleRate, channels: u16, bits_per_sample: u16) -> Self {
        Self {
            sample_rate,
            channels,
            bits_per_sample,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.channels == 0 {
            return Err(TimbreError::shape_mismatch("at least 1 channel", "0 channels"));
        }
        if self.sample_rate.as_hz() == 0 {
            return Err(TimbreError::invalid_parameter(
                "sample_rate",
                0.0,
                "must be > 0",
            ));
        }
        Ok(())
    }
}

/// Audio buffer containing decoded samples
///
/// Samples are stored as f32, nominally in [-1.0, 1.0] but never clamped:
/// intermediate stages are free to exceed unity.
/// Interleaved format: [L, R, L, R, ...] for stereo.
///
/// The sample count is always a whole number of frames. A buffer with zero
/// frames is valid.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    format: AudioFormat,
}

impl AudioBuffer {
    /// Create a new audio buffer from interleaved samples
    pub fn new(samples: Vec<f32>, format: AudioFormat) -> Result<Self> {
        format.validate()?;
        let channels = usize::from(format.channels);
        if samples.len() % channels != 0 {
            return Err(TimbreError::shape_mismatch(
                format!("a multiple of {} samples", channels),
                format!("{} samples", samples.len()),
            ));
        }
        Ok(Self { samples, format })
    }

    /// Create a 32-bit float buffer from interleaved samples
    pub fn from_interleaved(samples: Vec<f32>, channels: u16, sample_rate: SampleRate) -> Result<Self> {
        Self::new(samples, AudioFormat::new(sample_rate, channels, 32))
    }

    /// Create a buffer from planar channel data
    ///
    /// Every channel must have the same length.
    pub fn from_channels(channels: Vec<Vec<f32>>, sample_rate: SampleRate) -> Result<Self> {
        let Some(first) = channels.first() else {
            return Err(TimbreError::shape_mismatch("at least 1 channel", "0 channels"));
        };
        let frames = first.len();
        if let Some(bad) = channels.iter().find(|c| c.len() != frames) {
            return Err(TimbreError::shape_mismatch(
                format!("{} frames per channel", frames),
                format!("{} frames", bad.len()),
            ));
        }

        let count = channels.len();
        let channel_count = u16::try_from(count)
            .map_err(|_| TimbreError::shape_mismatch("at most 65535 channels", format!("{}", count)))?;

        let mut samples = Vec::with_capacity(frames * count);
        for frame in 0..frames {
            for channel in &channels {
                samples.push(channel[frame]);
            }
        }

        Self::from_interleaved(samples, channel_count, sample_rate)
    }

    /// Create an all-zero buffer
    pub fn silence(frames: usize, channels: u16, sample_rate: SampleRate) -> Result<Self> {
        Self::from_interleaved(vec![0.0; frames * usize::from(channels)], channels, sample_rate)
    }

    /// Replace the samples, keeping this buffer's format
    pub fn with_samples(&self, samples: Vec<f32>) -> Result<Self> {
        Self::new(samples, self.format)
    }

    /// Replace the planar channel data, keeping sample rate and bit depth
    pub fn with_channels(&self, channels: Vec<Vec<f32>>) -> Result<Self> {
        let buffer = Self::from_channels(channels, self.format.sample_rate)?;
        Ok(buffer.with_bits_per_sample(self.format.bits_per_sample))
    }

    /// Set the preferred bit depth
    #[must_use]
    pub fn with_bits_per_sample(mut self, bits_per_sample: u16) -> Self {
        self.format.bits_per_sample = bits_per_sample;
        self
    }

    /// Apply a function to every sample, returning a new buffer
    #[must_use]
    pub fn map_samples(&self, f: impl FnMut(f32) -> f32) -> Self {
        Self {
            samples: self.samples.iter().copied().map(f).collect(),
            format: self.format,
        }
    }

    /// Build a new buffer by transforming each channel independently
    ///
    /// The closure receives the channel index and its samples.
    pub fn map_channels(&self, mut f: impl FnMut(usize, &[f32]) -> Vec<f32>) -> Result<Self> {
        let processed = self
            .to_channels()
            .iter()
            .enumerate()
            .map(|(idx, channel)| f(idx, channel))
            .collect();
        self.with_channels(processed)
    }

    /// Interleaved samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Consume the buffer, returning the interleaved samples
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Audio format information
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.format.sample_rate.as_hz()
    }

    /// Number of channels
    pub fn channels(&self) -> usize {
        usize::from(self.format.channels)
    }

    /// Get the number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels()
    }

    /// Get the duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / f64::from(self.sample_rate())
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get the length in samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Copy out one channel
    ///
    /// # Panics
    /// Panics if `index` is not below `channels()`
    pub fn channel(&self, index: usize) -> Vec<f32> {
        let channels = self.channels();
        assert!(index < channels, "channel {} out of range ({} channels)", index, channels);
        self.samples
            .iter()
            .skip(index)
            .step_by(channels)
            .copied()
            .collect()
    }

    /// Copy out all channels as planar data
    pub fn to_channels(&self) -> Vec<Vec<f32>> {
        let channels = self.channels();
        let mut planar = vec![Vec::with_capacity(self.frames()); channels];
        for frame in self.samples.chunks_exact(channels) {
            for (ch, &sample) in frame.iter().enumerate() {
                planar[ch].push(sample);
            }
        }
        planar
    }

    /// Average of all channels, one value per frame
    pub fn mono_mix(&self) -> Vec<f32> {
        let channels = self.channels();
        let scale = 1.0 / channels as f32;
        self.samples
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() * scale)
            .collect()
    }

    /// Largest absolute sample value (0.0 for empty buffers)
    pub fn peak(&self) -> f32 {
        self.samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max)
    }

    /// RMS over every sample of every channel (0.0 for empty buffers)
    pub fn rms(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum_squares: f64 = self.samples.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
        (sum_squares / self.samples.len() as f64).sqrt() as f32
    }

    /// True when every sample is exactly zero
    pub fn is_silent(&self) -> bool {
        self.samples.iter().all(|&s| s == 0.0)
    }
}
