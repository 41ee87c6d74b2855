//! Property-based tests for the effect set
//!
//! These tests use proptest to verify invariants across many random inputs.

use proptest::prelude::*;
use timbre_audio::effects::*;
use timbre_audio::resample;
use timbre_audio::resampling::RationalRatio;
use timbre_core::{
    AudioBuffer, ChorusParams, CompressorParams, DelayParams, DistortionParams, EqParams, FilterSpec, SampleRate,
};

// Helper: Check if buffer contains only finite values
fn all_finite(buffer: &AudioBuffer) -> bool {
    buffer.samples().iter().all(|s| s.is_finite())
}

fn mono(samples: Vec<f32>) -> AudioBuffer {
    AudioBuffer::from_interleaved(samples, 1, SampleRate::CD_QUALITY).unwrap()
}

fn stereo(samples: Vec<f32>) -> AudioBuffer {
    let mut samples = samples;
    if samples.len() % 2 == 1 {
        samples.pop();
    }
    AudioBuffer::from_interleaved(samples, 2, SampleRate::CD_QUALITY).unwrap()
}

proptest! {
    /// Property: EQ should never produce NaN or Inf, regardless of input
    #[test]
    fn eq_never_produces_nan_or_inf(
        freq in 20.0f32..20000.0,
        gain_db in -12.0f32..12.0,
        q in 0.1f32..10.0,
        samples in prop::collection::vec(-1.0f32..1.0, 100..1000)
    ) {
        let params = EqParams {
            mid: FilterSpec::new(freq, q, gain_db),
            ..EqParams::default()
        };
        let output = parametric_eq(&stereo(samples), &params).unwrap();
        prop_assert!(all_finite(&output), "EQ produced NaN or Inf");
    }

    /// Property: Compressor never amplifies and never produces NaN or Inf
    #[test]
    fn compressor_never_amplifies(
        threshold_db in -60.0f32..0.0,
        ratio in 1.0f32..20.0,
        attack_ms in 0.1f32..100.0,
        release_ms in 10.0f32..1000.0,
        samples in prop::collection::vec(-1.0f32..1.0, 100..1000)
    ) {
        let params = CompressorParams { threshold_db, ratio, attack_ms, release_ms };
        let input = stereo(samples);
        let output = compress(&input, &params).unwrap();

        prop_assert!(all_finite(&output));
        for (x, y) in input.samples().iter().zip(output.samples()) {
            prop_assert!(y.abs() <= x.abs() + 1e-7);
        }
    }

    /// Property: Soft clip keeps [-1, 1] input within [-1, 1]
    #[test]
    fn soft_clip_is_bounded(
        drive in 0.01f32..50.0,
        mix in 0.0f32..=1.0,
        samples in prop::collection::vec(-1.0f32..=1.0, 1..500)
    ) {
        let output = soft_clip(&mono(samples), &DistortionParams { drive, mix }).unwrap();
        prop_assert!(output.samples().iter().all(|s| s.abs() <= 1.0 + 1e-5));
    }

    /// Property: Time effects keep frame count and channel layout
    #[test]
    fn time_effects_preserve_shape(
        delay_ms in 0.0f32..50.0,
        feedback in 0.0f32..0.95,
        depth_ms in 0.0f32..30.0,
        rate_hz in 0.1f32..5.0,
        mix in 0.0f32..=1.0,
        samples in prop::collection::vec(-1.0f32..1.0, 2..2000)
    ) {
        let input = stereo(samples);
        let delayed = delay(&input, &DelayParams { delay_ms, feedback, mix }).unwrap();
        let chorused = chorus(&input, &ChorusParams { depth_ms, rate_hz, mix }).unwrap();

        for output in [delayed, chorused] {
            prop_assert_eq!(output.frames(), input.frames());
            prop_assert_eq!(output.channels(), 2);
            prop_assert!(all_finite(&output));
        }
    }

    /// Property: Pan preserves per-frame power of mono input
    #[test]
    fn pan_is_constant_power(
        position in -1.0f32..=1.0,
        samples in prop::collection::vec(-1.0f32..1.0, 1..500)
    ) {
        let input = mono(samples);
        let output = pan(&input, position).unwrap();
        for (x, frame) in input.samples().iter().zip(output.samples().chunks_exact(2)) {
            let power = frame[0] * frame[0] + frame[1] * frame[1];
            prop_assert!((power - x * x).abs() < 1e-5);
        }
    }

    /// Property: Gain followed by its inverse restores the input
    #[test]
    fn gain_round_trip(
        gain_db in -24.0f32..24.0,
        samples in prop::collection::vec(-1.0f32..1.0, 1..500)
    ) {
        let input = mono(samples);
        let back = apply_gain(&apply_gain(&input, gain_db).unwrap(), -gain_db).unwrap();
        for (x, y) in input.samples().iter().zip(back.samples()) {
            prop_assert!((x - y).abs() < 1e-5);
        }
    }

    /// Property: Normalize lands exactly on the target peak
    #[test]
    fn normalize_hits_target(
        target_db in -30.0f32..0.0,
        samples in prop::collection::vec(-1.0f32..1.0, 1..500)
    ) {
        let input = mono(samples);
        prop_assume!(input.peak() > 1e-3);
        let output = normalize(&input, target_db).unwrap();
        let target = 10.0f32.powf(target_db / 20.0);
        prop_assert!((output.peak() - target).abs() < target * 1e-5);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: Resampled length follows round(frames * up / down)
    #[test]
    fn resample_length_rule(
        target in prop::sample::select(vec![8_000u32, 16_000, 22_050, 32_000, 48_000, 88_200, 96_000]),
        frames in 1usize..5000
    ) {
        let input = AudioBuffer::silence(frames, 2, SampleRate::CD_QUALITY).unwrap();
        let output = resample(&input, target).unwrap();
        let ratio = RationalRatio::new(44_100, target).unwrap();

        prop_assert_eq!(output.frames(), ratio.output_frames(frames));
        prop_assert_eq!(output.sample_rate(), target);
        prop_assert!(output.is_silent());
    }

    /// Property: Upsampling then converting back restores the frame count
    #[test]
    fn resample_round_trip_restores_frame_count(
        (source, target) in prop::sample::select(vec![
            (44_100u32, 48_000u32),
            (22_050, 44_100),
            (16_000, 44_100),
            (44_100, 96_000),
            (32_000, 48_000),
        ]),
        frames in 1usize..5000
    ) {
        let input = AudioBuffer::silence(frames, 1, SampleRate::new(source)).unwrap();
        let there = resample(&input, target).unwrap();
        let back = resample(&there, source).unwrap();
        prop_assert_eq!(back.frames(), frames);
    }
}
