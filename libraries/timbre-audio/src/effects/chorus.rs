/// Single-tap chorus
///
/// The tap wanders between 0 and `depth` samples behind the input following
/// `0.5 + 0.5·sin(2π·rate·n/fs)`. Lookup is sample-accurate (truncated, no
/// interpolation); taps reaching before the first sample read silence.
use std::f64::consts::PI;
use timbre_core::{AudioBuffer, ChorusParams, Result};
use tracing::{debug, trace};

/// Apply chorus to every channel
pub fn chorus(input: &AudioBuffer, params: &ChorusParams) -> Result<AudioBuffer> {
    params.validate()?;

    let sample_rate = f64::from(input.sample_rate());
    let depth = (sample_rate * f64::from(params.depth_ms) / 1000.0).round();
    debug!(
        depth_ms = params.depth_ms,
        rate_hz = params.rate_hz,
        mix = params.mix,
        frames = input.frames(),
        "chorus"
    );

    if depth <= 0.0 || input.is_empty() {
        return Ok(input.clone());
    }
    trace!(depth, "chorus depth in samples");

    // The modulation is shared by every channel
    let phase_step = 2.0 * PI * f64::from(params.rate_hz) / sample_rate;
    let taps: Vec<usize> = (0..input.frames())
        .map(|n| (depth * (0.5 + 0.5 * (phase_step * n as f64).sin())) as usize)
        .collect();

    let mix = params.mix;
    input.map_channels(|_, channel| {
        channel
            .iter()
            .zip(&taps)
            .enumerate()
            .map(|(n, (&x, &tap))| {
                let delayed = n.checked_sub(tap).map_or(0.0, |i| channel[i]);
                (1.0 - mix) * x + mix * delayed
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{analysis, signals};

    #[test]
    fn zero_depth_is_identity() {
        let input = signals::sine(440.0, 44100, 0.1, 0.5, 2);
        let params = ChorusParams {
            depth_ms: 0.0,
            ..ChorusParams::default()
        };
        assert_eq!(chorus(&input, &params).unwrap(), input);
    }

    #[test]
    fn dry_mix_is_identity() {
        let input = signals::sine(440.0, 44100, 0.1, 0.5, 1);
        let params = ChorusParams {
            mix: 0.0,
            ..ChorusParams::default()
        };
        assert_eq!(chorus(&input, &params).unwrap(), input);
    }

    #[test]
    fn wet_signal_is_delayed_copy() {
        // At n = 0 the tap sits at depth / 2, so the first samples read silence
        let input = signals::white_noise(1000, 1.0, 0.5, 1, 2);
        let params = ChorusParams {
            depth_ms: 20.0,
            rate_hz: 1.0,
            mix: 1.0,
        };
        let output = chorus(&input, &params).unwrap();
        let y = output.samples();
        assert!(y[..10].iter().all(|&s| s == 0.0));
        assert_eq!(y[10], input.samples()[0]);
        assert_eq!(output.frames(), input.frames());
        assert!(analysis::all_finite(y));
    }

    #[test]
    fn zero_rate_is_rejected() {
        let input = signals::silence(10, 1, 1000);
        let params = ChorusParams {
            rate_hz: 0.0,
            ..ChorusParams::default()
        };
        assert!(chorus(&input, &params).is_err());
    }
}
