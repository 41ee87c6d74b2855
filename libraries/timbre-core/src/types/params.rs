//! Effect parameter records
//!
//! Every transform takes one of these explicitly; there is no global or
//! environment-driven configuration. All records deserialize with defaults
//! for missing fields so partial configs are accepted.
//!
//! `validate()` rejects values the math cannot handle. Values with a
//! well-defined degenerate meaning (zero delay, zero decay, zero gain) are
//! accepted and treated as no-ops by the transforms.

use crate::error::{Result, TimbreError};
use serde::{Deserialize, Serialize};

/// Reusable range checks
pub mod checks {
    use super::{Result, TimbreError};

    /// Value must be finite
    pub fn finite(name: &'static str, value: f32) -> Result<()> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(TimbreError::invalid_parameter(name, value, "must be finite"))
        }
    }

    /// Value must be finite and strictly positive
    pub fn positive(name: &'static str, value: f32) -> Result<()> {
        finite(name, value)?;
        if value > 0.0 {
            Ok(())
        } else {
            Err(TimbreError::invalid_parameter(name, value, "must be > 0"))
        }
    }

    /// Value must lie in [0, 1]
    pub fn unit_interval(name: &'static str, value: f32) -> Result<()> {
        finite(name, value)?;
        if (0.0..=1.0).contains(&value) {
            Ok(())
        } else {
            Err(TimbreError::invalid_parameter(name, value, "must be within [0, 1]"))
        }
    }
}

/// Gain below this magnitude (dB) turns a peaking band into a bypass
pub const BYPASS_GAIN_DB: f32 = 0.01;

/// One peaking biquad band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    /// Center frequency in Hz
    pub frequency_hz: f32,
    /// Quality factor, controls bandwidth
    pub q: f32,
    /// Boost/cut in dB
    pub gain_db: f32,
}

impl FilterSpec {
    pub fn new(frequency_hz: f32, q: f32, gain_db: f32) -> Self {
        Self {
            frequency_hz,
            q,
            gain_db,
        }
    }

    /// A band with `|gain_db| < 0.01` is an identity stage
    pub fn is_bypass(&self) -> bool {
        self.gain_db.abs() < BYPASS_GAIN_DB
    }

    pub fn validate(&self) -> Result<()> {
        checks::positive("frequency_hz", self.frequency_hz)?;
        checks::positive("q", self.q)?;
        checks::finite("gain_db", self.gain_db)
    }
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self::new(1000.0, 1.0, 0.0)
    }
}

/// Three-band parametric EQ settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EqParams {
    pub low: FilterSpec,
    pub mid: FilterSpec,
    pub high: FilterSpec,
}

impl EqParams {
    /// Bands in processing order
    pub fn bands(&self) -> [FilterSpec; 3] {
        [self.low, self.mid, self.high]
    }

    /// Same band frequencies with gains replaced
    #[must_use]
    pub fn with_gains(mut self, low_db: f32, mid_db: f32, high_db: f32) -> Self {
        self.low.gain_db = low_db;
        self.mid.gain_db = mid_db;
        self.high.gain_db = high_db;
        self
    }

    pub fn is_bypass(&self) -> bool {
        self.bands().iter().all(FilterSpec::is_bypass)
    }

    pub fn validate(&self) -> Result<()> {
        self.bands().iter().try_for_each(FilterSpec::validate)
    }
}

impl Default for EqParams {
    fn default() -> Self {
        Self {
            low: FilterSpec::new(100.0, 0.707, 0.0),
            mid: FilterSpec::new(1000.0, 1.0, 0.0),
            high: FilterSpec::new(8000.0, 0.707, 0.0),
        }
    }
}

/// Feedback delay line settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayParams {
    /// Delay time in milliseconds (<= 0 disables the effect)
    pub delay_ms: f32,
    /// Feedback amount, [0, 1)
    pub feedback: f32,
    /// Dry/wet mix (0.0 = dry, 1.0 = wet)
    pub mix: f32,
}

impl DelayParams {
    pub fn validate(&self) -> Result<()> {
        checks::finite("delay_ms", self.delay_ms)?;
        checks::finite("feedback", self.feedback)?;
        if !(0.0..1.0).contains(&self.feedback) {
            return Err(TimbreError::invalid_parameter(
                "feedback",
                self.feedback,
                "must be within [0, 1)",
            ));
        }
        checks::unit_interval("mix", self.mix)
    }
}

impl Default for DelayParams {
    fn default() -> Self {
        Self {
            delay_ms: 250.0,
            feedback: 0.35,
            mix: 0.3,
        }
    }
}

/// Modulated-delay chorus settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChorusParams {
    /// Maximum tap delay in milliseconds (<= 0 disables the effect)
    pub depth_ms: f32,
    /// Modulation rate in Hz
    pub rate_hz: f32,
    /// Dry/wet mix
    pub mix: f32,
}

impl ChorusParams {
    pub fn validate(&self) -> Result<()> {
        checks::finite("depth_ms", self.depth_ms)?;
        checks::positive("rate_hz", self.rate_hz)?;
        checks::unit_interval("mix", self.mix)
    }
}

impl Default for ChorusParams {
    fn default() -> Self {
        Self {
            depth_ms: 15.0,
            rate_hz: 1.5,
            mix: 0.5,
        }
    }
}

/// Synthetic convolution reverb settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReverbParams {
    /// Impulse response length in seconds (<= 0 disables the effect)
    pub decay_seconds: f32,
    /// Dry/wet mix
    pub mix: f32,
    /// Seed for the impulse response noise
    pub seed: u64,
}

impl ReverbParams {
    pub fn validate(&self) -> Result<()> {
        checks::finite("decay_seconds", self.decay_seconds)?;
        checks::unit_interval("mix", self.mix)
    }
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self {
            decay_seconds: 1.5,
            mix: 0.25,
            seed: 0,
        }
    }
}

/// Compressor settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressorParams {
    /// Threshold in dBFS
    pub threshold_db: f32,
    /// Ratio (>= 1.0), e.g. 4.0 means 4:1
    pub ratio: f32,
    /// Attack time in milliseconds
    pub attack_ms: f32,
    /// Release time in milliseconds
    pub release_ms: f32,
}

impl CompressorParams {
    pub fn validate(&self) -> Result<()> {
        checks::finite("threshold_db", self.threshold_db)?;
        checks::finite("ratio", self.ratio)?;
        if self.ratio < 1.0 {
            return Err(TimbreError::invalid_parameter("ratio", self.ratio, "must be >= 1"));
        }
        checks::positive("attack_ms", self.attack_ms)?;
        checks::positive("release_ms", self.release_ms)
    }
}

impl Default for CompressorParams {
    fn default() -> Self {
        Self {
            threshold_db: -18.0,
            ratio: 4.0,
            attack_ms: 10.0,
            release_ms: 100.0,
        }
    }
}

/// Spectral-subtraction noise reducer settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseReducerParams {
    /// How far the estimated noise is pulled down, in dB (>= 0)
    pub reduction_db: f32,
    /// Minimum spectral magnitude after subtraction, in dB
    pub noise_floor_db: f32,
}

impl NoiseReducerParams {
    pub fn validate(&self) -> Result<()> {
        checks::finite("reduction_db", self.reduction_db)?;
        if self.reduction_db < 0.0 {
            return Err(TimbreError::invalid_parameter(
                "reduction_db",
                self.reduction_db,
                "must be >= 0",
            ));
        }
        checks::finite("noise_floor_db", self.noise_floor_db)
    }
}

impl Default for NoiseReducerParams {
    fn default() -> Self {
        Self {
            reduction_db: 12.0,
            noise_floor_db: -80.0,
        }
    }
}

/// Soft-clip distortion settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistortionParams {
    /// Input drive (> 0)
    pub drive: f32,
    /// Dry/wet mix
    pub mix: f32,
}

impl DistortionParams {
    pub fn validate(&self) -> Result<()> {
        checks::positive("drive", self.drive)?;
        checks::unit_interval("mix", self.mix)
    }
}

impl Default for DistortionParams {
    fn default() -> Self {
        Self { drive: 4.0, mix: 1.0 }
    }
}
