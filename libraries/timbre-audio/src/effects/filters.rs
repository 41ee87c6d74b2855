/// 4th-order Butterworth high-pass and low-pass
///
/// Single causal pass through two cascaded biquads per channel. A cutoff at or
/// below 0 Hz disables the filter.
use crate::filter_design::{apply_cascade, butterworth_highpass, butterworth_lowpass, BiquadCoeffs};
use timbre_core::types::params::checks;
use timbre_core::{AudioBuffer, Result};
use tracing::debug;

/// Remove content below `cutoff_hz`
pub fn highpass(input: &AudioBuffer, cutoff_hz: f32) -> Result<AudioBuffer> {
    filter(input, cutoff_hz, "highpass", butterworth_highpass)
}

/// Remove content above `cutoff_hz`
pub fn lowpass(input: &AudioBuffer, cutoff_hz: f32) -> Result<AudioBuffer> {
    filter(input, cutoff_hz, "lowpass", butterworth_lowpass)
}

fn filter(
    input: &AudioBuffer,
    cutoff_hz: f32,
    kind: &'static str,
    design: fn(f32, u32) -> Result<[BiquadCoeffs; 2]>,
) -> Result<AudioBuffer> {
    checks::finite("cutoff_hz", cutoff_hz)?;
    debug!(kind, cutoff_hz, frames = input.frames(), "butterworth filter");

    if cutoff_hz <= 0.0 {
        return Ok(input.clone());
    }

    let sections = design(cutoff_hz, input.sample_rate())?;
    if input.is_empty() {
        return Ok(input.clone());
    }
    input.map_channels(|_, channel| apply_cascade(&sections, channel))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{analysis, signals};

    const SKIP: usize = 2205;

    fn level_change(input: &AudioBuffer, output: &AudioBuffer) -> f32 {
        analysis::gain_db(
            analysis::rms(&input.samples()[SKIP..]),
            analysis::rms(&output.samples()[SKIP..]),
        )
    }

    #[test]
    fn lowpass_passes_low_and_blocks_high() {
        let low = signals::sine(200.0, 44100, 0.5, 0.5, 1);
        let high = signals::sine(8000.0, 44100, 0.5, 0.5, 1);

        let low_out = lowpass(&low, 1000.0).unwrap();
        let high_out = lowpass(&high, 1000.0).unwrap();

        assert!(level_change(&low, &low_out).abs() < 0.1);
        assert!(level_change(&high, &high_out) < -60.0);
    }

    #[test]
    fn highpass_passes_high_and_blocks_low() {
        let low = signals::sine(100.0, 44100, 0.5, 0.5, 1);
        let high = signals::sine(10_000.0, 44100, 0.5, 0.5, 1);

        assert!(level_change(&low, &highpass(&low, 2000.0).unwrap()) < -60.0);
        assert!(level_change(&high, &highpass(&high, 2000.0).unwrap()).abs() < 0.1);
    }

    #[test]
    fn non_positive_cutoff_is_identity() {
        let input = signals::white_noise(44100, 0.05, 0.5, 2, 4);
        assert_eq!(highpass(&input, 0.0).unwrap(), input);
        assert_eq!(lowpass(&input, -100.0).unwrap(), input);
    }

    #[test]
    fn cutoff_above_nyquist_is_rejected() {
        let input = signals::silence(10, 1, 8000);
        assert!(lowpass(&input, 4000.0).is_err());
        assert!(highpass(&input, f32::NAN).is_err());
    }
}
