/// One processing step of a pipeline
use crate::effects;
use serde::{Deserialize, Serialize};
use timbre_core::types::params::checks;
use timbre_core::{
    AudioBuffer, AudioTransform, ChorusParams, CompressorParams, DelayParams, DistortionParams, EqParams,
    NoiseReducerParams, Result, ReverbParams, TimbreError,
};

/// Stage category, in the conventional processing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StageKind {
    Gain,
    Eq,
    NoiseReduction,
    TimeEffect,
    Distortion,
    Filter,
    Dynamics,
    Pan,
}

/// A transform together with its parameters
///
/// Serialized with an internal `type` tag, e.g.
/// `{ type = "delay", delay_ms = 120.0 }`; missing parameter fields fall back
/// to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Stage {
    Gain { gain_db: f32 },
    Eq(EqParams),
    NoiseReduction(NoiseReducerParams),
    Delay(DelayParams),
    Chorus(ChorusParams),
    Reverb(ReverbParams),
    Distortion(DistortionParams),
    Highpass { cutoff_hz: f32 },
    Lowpass { cutoff_hz: f32 },
    Compressor(CompressorParams),
    Normalize { target_db: f32 },
    AutoGain { target_rms_db: f32 },
    Pan { position: f32 },
}

impl Stage {
    pub fn kind(&self) -> StageKind {
        match self {
            Self::Gain { .. } => StageKind::Gain,
            Self::Eq(_) => StageKind::Eq,
            Self::NoiseReduction(_) => StageKind::NoiseReduction,
            Self::Delay(_) | Self::Chorus(_) | Self::Reverb(_) => StageKind::TimeEffect,
            Self::Distortion(_) => StageKind::Distortion,
            Self::Highpass { .. } | Self::Lowpass { .. } => StageKind::Filter,
            Self::Compressor(_) | Self::Normalize { .. } | Self::AutoGain { .. } => StageKind::Dynamics,
            Self::Pan { .. } => StageKind::Pan,
        }
    }

    /// Check parameters that do not depend on the buffer
    ///
    /// Filter cutoffs are checked against Nyquist when the stage runs.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Gain { gain_db } => checks::finite("gain_db", *gain_db),
            Self::Eq(params) => params.validate(),
            Self::NoiseReduction(params) => params.validate(),
            Self::Delay(params) => params.validate(),
            Self::Chorus(params) => params.validate(),
            Self::Reverb(params) => params.validate(),
            Self::Distortion(params) => params.validate(),
            Self::Highpass { cutoff_hz } | Self::Lowpass { cutoff_hz } => checks::finite("cutoff_hz", *cutoff_hz),
            Self::Compressor(params) => params.validate(),
            Self::Normalize { target_db } => checks::finite("target_db", *target_db),
            Self::AutoGain { target_rms_db } => checks::finite("target_rms_db", *target_rms_db),
            Self::Pan { position } => {
                checks::finite("position", *position)?;
                if (-1.0..=1.0).contains(position) {
                    Ok(())
                } else {
                    Err(TimbreError::invalid_parameter(
                        "position",
                        *position,
                        "must be within [-1, 1]",
                    ))
                }
            }
        }
    }

    pub fn apply(&self, input: &AudioBuffer) -> Result<AudioBuffer> {
        match self {
            Self::Gain { gain_db } => effects::apply_gain(input, *gain_db),
            Self::Eq(params) => effects::parametric_eq(input, params),
            Self::NoiseReduction(params) => effects::reduce_noise(input, params),
            Self::Delay(params) => effects::delay(input, params),
            Self::Chorus(params) => effects::chorus(input, params),
            Self::Reverb(params) => effects::reverb(input, params),
            Self::Distortion(params) => effects::soft_clip(input, params),
            Self::Highpass { cutoff_hz } => effects::highpass(input, *cutoff_hz),
            Self::Lowpass { cutoff_hz } => effects::lowpass(input, *cutoff_hz),
            Self::Compressor(params) => effects::compress(input, params),
            Self::Normalize { target_db } => effects::normalize(input, *target_db),
            Self::AutoGain { target_rms_db } => effects::auto_gain(input, *target_rms_db),
            Self::Pan { position } => effects::pan(input, *position),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Gain { .. } => "gain",
            Self::Eq(_) => "eq",
            Self::NoiseReduction(_) => "noise_reduction",
            Self::Delay(_) => "delay",
            Self::Chorus(_) => "chorus",
            Self::Reverb(_) => "reverb",
            Self::Distortion(_) => "distortion",
            Self::Highpass { .. } => "highpass",
            Self::Lowpass { .. } => "lowpass",
            Self::Compressor(_) => "compressor",
            Self::Normalize { .. } => "normalize",
            Self::AutoGain { .. } => "auto_gain",
            Self::Pan { .. } => "pan",
        }
    }
}

impl AudioTransform for Stage {
    fn process(&self, input: &AudioBuffer) -> Result<AudioBuffer> {
        self.apply(input)
    }

    fn name(&self) -> &str {
        Stage::name(self)
    }
}
