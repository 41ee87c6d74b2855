//! File-level operations behind each subcommand

use crate::config::{TimbreConfig, SUPPORTED_BIT_DEPTHS};
use crate::error::Result;
use std::path::Path;
use timbre_audio::pipeline::Pipeline;
use timbre_audio::{compute_metrics, read, write, Metrics};
use tracing::{info, warn};

/// Metrics of the decoded input and of the written output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessReport {
    pub before: Metrics,
    pub after: Metrics,
}

/// Decode `input`, run the configured pipeline, write WAV to `output`
pub fn process(input: &Path, output: &Path, config: &TimbreConfig) -> Result<ProcessReport> {
    config.validate()?;

    let buffer = read(input)?;
    let before = compute_metrics(&buffer);
    info!(path = %input.display(), metrics = %before, "input");

    if !config.pipeline.is_canonical_order() {
        warn!("pipeline stages are not in canonical order; running them as given");
    }

    let processed = config
        .pipeline
        .process(&buffer)?
        .with_bits_per_sample(config.output.bits_per_sample);
    let after = compute_metrics(&processed);
    info!(path = %output.display(), stages = config.pipeline.len(), metrics = %after, "output");

    write(output, &processed)?;
    Ok(ProcessReport { before, after })
}

/// Decode `input` and measure it
pub fn analyze(input: &Path) -> Result<Metrics> {
    let buffer = read(input)?;
    Ok(compute_metrics(&buffer))
}

/// Convert `input` to `rate` and write it as WAV
///
/// The source bit depth is kept when WAV can carry it, otherwise the
/// output is 32-bit float.
pub fn resample_file(input: &Path, output: &Path, rate: u32) -> Result<Metrics> {
    let buffer = read(input)?;
    let bits = buffer.format().bits_per_sample;
    let bits = if SUPPORTED_BIT_DEPTHS.contains(&bits) { bits } else { 32 };

    let resampled = Pipeline::new()
        .with_target_sample_rate(rate)
        .process(&buffer)?
        .with_bits_per_sample(bits);
    info!(
        from = buffer.sample_rate(),
        to = rate,
        frames = resampled.frames(),
        "resampled"
    );

    write(output, &resampled)?;
    Ok(compute_metrics(&resampled))
}
