/// Feedback delay line
///
/// One ring buffer of `round(fs * delay_ms / 1000)` samples per channel.
/// Each input sample is mixed with the sample leaving the ring, and the ring is
/// refilled with `x + delayed * feedback`. Output keeps the input frame count.
use timbre_core::{AudioBuffer, DelayParams, Result};
use tracing::{debug, trace};

/// Delay length in samples for `delay_ms` at `sample_rate`
pub fn delay_samples(delay_ms: f32, sample_rate: u32) -> i64 {
    (f64::from(sample_rate) * f64::from(delay_ms) / 1000.0).round() as i64
}

/// Apply a feedback delay to every channel
pub fn delay(input: &AudioBuffer, params: &DelayParams) -> Result<AudioBuffer> {
    params.validate()?;

    let length = delay_samples(params.delay_ms, input.sample_rate());
    debug!(
        delay_ms = params.delay_ms,
        feedback = params.feedback,
        mix = params.mix,
        frames = input.frames(),
        "delay"
    );

    if length <= 0 || input.is_empty() {
        return Ok(input.clone());
    }
    // A line longer than the input never returns a sample before the end
    let length = usize::try_from(length)
        .unwrap_or(usize::MAX)
        .min(input.frames() + 1);
    trace!(length, "delay line length");

    input.map_channels(|_, channel| process_line(channel, length, params.feedback, params.mix))
}

fn process_line(input: &[f32], length: usize, feedback: f32, mix: f32) -> Vec<f32> {
    let mut line = vec![0.0_f32; length];
    let mut index = 0;

    input
        .iter()
        .map(|&x| {
            let delayed = line[index];
            line[index] = x + delayed * feedback;
            index = (index + 1) % length;
            (1.0 - mix) * x + mix * delayed
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::signals;

    #[test]
    fn zero_delay_is_identity() {
        let input = signals::white_noise(44100, 0.05, 0.5, 2, 5);
        let params = DelayParams {
            delay_ms: 0.0,
            feedback: 0.5,
            mix: 0.5,
        };
        assert_eq!(delay(&input, &params).unwrap(), input);
    }

    #[test]
    fn dry_only_is_identity() {
        let input = signals::white_noise(44100, 0.05, 0.5, 1, 6);
        let params = DelayParams {
            delay_ms: 10.0,
            feedback: 0.0,
            mix: 0.0,
        };
        assert_eq!(delay(&input, &params).unwrap(), input);
    }

    #[test]
    fn fully_wet_shifts_signal() {
        let input = signals::white_noise(1000, 1.0, 0.5, 1, 8);
        let params = DelayParams {
            delay_ms: 20.0,
            feedback: 0.0,
            mix: 1.0,
        };
        let output = delay(&input, &params).unwrap();
        let d = delay_samples(20.0, 1000) as usize;
        assert_eq!(d, 20);

        let x = input.samples();
        let y = output.samples();
        assert!(y[..d].iter().all(|&s| s == 0.0));
        for n in d..x.len() {
            assert_eq!(y[n], x[n - d]);
        }
    }

    #[test]
    fn feedback_repeats_decay() {
        let input = signals::impulse(100, 0, 1, 1000);
        let params = DelayParams {
            delay_ms: 10.0,
            feedback: 0.5,
            mix: 1.0,
        };
        let output = delay(&input, &params).unwrap();
        let y = output.samples();
        assert_eq!(y[10], 1.0);
        assert_eq!(y[20], 0.5);
        assert_eq!(y[30], 0.25);
        assert_eq!(output.frames(), input.frames());
    }

    #[test]
    fn delay_longer_than_input_leaves_only_dry_signal() {
        let input = signals::white_noise(44100, 0.1, 0.5, 2, 12);
        let params = DelayParams {
            delay_ms: 1.0e9,
            feedback: 0.5,
            mix: 0.25,
        };
        let output = delay(&input, &params).unwrap();
        for (x, y) in input.samples().iter().zip(output.samples()) {
            assert_eq!(*y, 0.75 * x);
        }
    }

    #[test]
    fn unit_feedback_is_rejected() {
        let input = signals::silence(10, 1, 1000);
        let params = DelayParams {
            delay_ms: 1.0,
            feedback: 1.0,
            mix: 0.5,
        };
        assert!(delay(&input, &params).is_err());
    }
}
