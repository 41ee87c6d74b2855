/// Soft-clip distortion
///
/// `tanh(x·drive) / tanh(drive)` so that a full-scale input still maps to
/// ±1, blended with the dry signal by `mix`.
use timbre_core::{AudioBuffer, DistortionParams, Result};
use tracing::debug;

/// Apply soft-clip distortion to every sample
pub fn soft_clip(input: &AudioBuffer, params: &DistortionParams) -> Result<AudioBuffer> {
    params.validate()?;
    debug!(drive = params.drive, mix = params.mix, frames = input.frames(), "soft clip");

    let drive = params.drive;
    let norm = drive.tanh();
    let mix = params.mix;

    Ok(input.map_samples(|x| {
        let wet = (x * drive).tanh() / norm;
        (1.0 - mix) * x + mix * wet
    }))
}
