//! Ordered composition of transforms
//!
//! A `Pipeline` optionally resamples its input, then threads it through its
//! stages exactly in the order given. Every stage is validated before any
//! audio is processed, so a bad parameter later in the list fails the whole
//! run up front.
//!
//! ## Example
//!
//! ```rust
//! use timbre_audio::pipeline::{Pipeline, Stage};
//! use timbre_audio::test_utils::signals;
//! use timbre_core::DelayParams;
//!
//! let pipeline = Pipeline::new()
//!     .then(Stage::Gain { gain_db: -3.0 })
//!     .then(Stage::Delay(DelayParams::default()))
//!     .then(Stage::Normalize { target_db: -1.0 });
//!
//! let input = signals::sine(440.0, 44_100, 0.5, 0.5, 2);
//! let output = pipeline.process(&input)?;
//! assert_eq!(output.frames(), input.frames());
//! # Ok::<(), timbre_core::TimbreError>(())
//! ```

mod stage;

pub use stage::{Stage, StageKind};

use crate::resampling::resample;
use serde::{Deserialize, Serialize};
use timbre_core::{AudioBuffer, AudioTransform, Result, TimbreError};
use tracing::debug;

/// Optional resample plus an ordered list of stages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pipeline {
    /// Resample to this rate before the first stage
    pub target_sample_rate: Option<u32>,
    pub stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_target_sample_rate(mut self, rate: u32) -> Self {
        self.target_sample_rate = Some(rate);
        self
    }

    /// Append a stage
    #[must_use]
    pub fn then(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_sample_rate == Some(0) {
            return Err(TimbreError::invalid_parameter(
                "target_sample_rate",
                0.0,
                "must be > 0",
            ));
        }
        self.stages.iter().try_for_each(Stage::validate)
    }

    /// True when stages follow gain, EQ, noise reduction, time effects,
    /// distortion, filters, dynamics, pan
    pub fn is_canonical_order(&self) -> bool {
        self.stages.windows(2).all(|pair| pair[0].kind() <= pair[1].kind())
    }

    /// Run the pipeline over a buffer
    pub fn process(&self, input: &AudioBuffer) -> Result<AudioBuffer> {
        self.validate()?;

        let mut buffer = match self.target_sample_rate {
            Some(rate) if rate != input.sample_rate() => resample(input, rate)?,
            _ => input.clone(),
        };

        for (index, stage) in self.stages.iter().enumerate() {
            debug!(index, stage = stage.name(), frames = buffer.frames(), "pipeline stage");
            buffer = stage.apply(&buffer)?;
        }
        Ok(buffer)
    }
}

impl AudioTransform for Pipeline {
    fn process(&self, input: &AudioBuffer) -> Result<AudioBuffer> {
        Pipeline::process(self, input)
    }

    fn name(&self) -> &str {
        "pipeline"
    }
}
