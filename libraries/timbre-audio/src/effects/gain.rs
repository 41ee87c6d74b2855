/// Static gain, peak normalization and RMS auto-gain
use timbre_core::types::params::checks;
use timbre_core::{db_to_linear, AudioBuffer, Result};
use tracing::debug;

/// Multiply every sample by `10^(gain_db/20)`
pub fn apply_gain(input: &AudioBuffer, gain_db: f32) -> Result<AudioBuffer> {
    checks::finite("gain_db", gain_db)?;
    debug!(gain_db, frames = input.frames(), "gain");

    let factor = db_to_linear(gain_db);
    Ok(input.map_samples(|s| s * factor))
}

/// Scale so the absolute peak equals `10^(target_db/20)`
///
/// Silent or empty buffers are returned unchanged.
pub fn normalize(input: &AudioBuffer, target_db: f32) -> Result<AudioBuffer> {
    checks::finite("target_db", target_db)?;
    let peak = input.peak();
    debug!(target_db, peak, "normalize");
    scale_to(input, peak, db_to_linear(target_db))
}

/// Scale so the RMS over all samples equals `10^(target_rms_db/20)`
///
/// Silent or empty buffers are returned unchanged.
pub fn auto_gain(input: &AudioBuffer, target_rms_db: f32) -> Result<AudioBuffer> {
    checks::finite("target_rms_db", target_rms_db)?;
    let rms = input.rms();
    debug!(target_rms_db, rms, "auto gain");
    scale_to(input, rms, db_to_linear(target_rms_db))
}

fn scale_to(input: &AudioBuffer, current: f32, target: f32) -> Result<AudioBuffer> {
    if current <= 0.0 {
        return Ok(input.clone());
    }
    let factor = target / current;
    Ok(input.map_samples(|s| s * factor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{analysis, signals};

    #[test]
    fn gain_round_trip() {
        let input = signals::white_noise(44100, 0.1, 0.4, 2, 9);
        let louder = apply_gain(&input, 6.0).unwrap();
        let back = apply_gain(&louder, -6.0).unwrap();
        assert!(analysis::max_abs_diff(input.samples(), back.samples()) < 1e-5);
    }

    #[test]
    fn zero_gain_is_identity() {
        let input = signals::sine(440.0, 44100, 0.05, 0.5, 1);
        assert_eq!(apply_gain(&input, 0.0).unwrap(), input);
    }

    #[test]
    fn normalize_hits_target_peak() {
        let input = signals::sine(440.0, 44100, 1.0, 0.9, 1);
        let output = normalize(&input, -1.0).unwrap();
        assert!((output.peak() - 10.0_f32.powf(-1.0 / 20.0)).abs() < 1e-4);
    }

    #[test]
    fn normalize_is_idempotent() {
        let input = signals::white_noise(44100, 0.2, 0.3, 2, 12);
        let once = normalize(&input, -1.0).unwrap();
        let twice = normalize(&once, -1.0).unwrap();
        assert!(analysis::max_abs_diff(once.samples(), twice.samples()) < 1e-6);
    }

    #[test]
    fn auto_gain_hits_target_rms() {
        let input = signals::sine(1000.0, 44100, 0.5, 0.1, 2);
        let output = auto_gain(&input, -20.0).unwrap();
        assert!((output.rms() - 0.1).abs() < 1e-4);
    }

    #[test]
    fn silence_is_left_alone() {
        let input = signals::silence(512, 2, 44100);
        assert_eq!(normalize(&input, -1.0).unwrap(), input);
        assert_eq!(auto_gain(&input, -20.0).unwrap(), input);
    }

    #[test]
    fn non_finite_gain_is_rejected() {
        let input = signals::silence(4, 1, 44100);
        assert!(apply_gain(&input, f32::INFINITY).is_err());
    }
}
