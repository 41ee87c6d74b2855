/// Constant-power stereo panning
///
/// `angle = (position + 1)·π/4`, left gain `cos(angle)`, right gain
/// `sin(angle)`. Mono input is duplicated to stereo first; the output is
/// always stereo.
use std::f32::consts::FRAC_PI_4;
use timbre_core::types::params::checks;
use timbre_core::{AudioBuffer, Result, TimbreError};
use tracing::debug;

/// Left and right gains for a pan position in [-1, 1]
pub fn pan_gains(position: f32) -> (f32, f32) {
    let angle = (position + 1.0) * FRAC_PI_4;
    (angle.cos(), angle.sin())
}

/// Pan a mono or stereo buffer
pub fn pan(input: &AudioBuffer, position: f32) -> Result<AudioBuffer> {
    checks::finite("position", position)?;
    if !(-1.0..=1.0).contains(&position) {
        return Err(TimbreError::invalid_parameter(
            "position",
            position,
            "must be within [-1, 1]",
        ));
    }

    let (left_gain, right_gain) = pan_gains(position);
    debug!(position, left_gain, right_gain, channels = input.channels(), "pan");

    let (left, right) = match input.channels() {
        1 => {
            let mono = input.channel(0);
            (mono.clone(), mono)
        }
        2 => (input.channel(0), input.channel(1)),
        n => {
            return Err(TimbreError::shape_mismatch(
                "1 or 2 channels",
                format!("{} channels", n),
            ))
        }
    };

    let left = left.into_iter().map(|s| s * left_gain).collect();
    let right = right.into_iter().map(|s| s * right_gain).collect();
    input.with_channels(vec![left, right])
}
