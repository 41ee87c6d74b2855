//! End-to-end pipeline behaviour

use std::sync::Arc;
use timbre_audio::pipeline::{Pipeline, Stage, StageKind};
use timbre_audio::test_utils::{analysis, signals};
use timbre_audio::{compute_metrics, read, write, LoopbackDevice};
use timbre_core::{
    AudioInput, AudioOutput, AudioTransform, ChorusParams, CompressorParams, DelayParams, DistortionParams,
    EqParams, NoiseReducerParams, ReverbParams,
};

fn full_chain() -> Pipeline {
    Pipeline::new()
        .then(Stage::Gain { gain_db: -3.0 })
        .then(Stage::Eq(EqParams::default().with_gains(2.0, -1.5, 3.0)))
        .then(Stage::NoiseReduction(NoiseReducerParams::default()))
        .then(Stage::Delay(DelayParams::default()))
        .then(Stage::Chorus(ChorusParams::default()))
        .then(Stage::Reverb(ReverbParams {
            decay_seconds: 0.4,
            ..ReverbParams::default()
        }))
        .then(Stage::Distortion(DistortionParams { drive: 2.0, mix: 0.3 }))
        .then(Stage::Highpass { cutoff_hz: 40.0 })
        .then(Stage::Lowpass { cutoff_hz: 16_000.0 })
        .then(Stage::Compressor(CompressorParams::default()))
        .then(Stage::Normalize { target_db: -1.0 })
        .then(Stage::Pan { position: -0.2 })
}

fn noisy_tone() -> timbre_core::AudioBuffer {
    let tone = signals::sine(440.0, 44_100, 1.0, 0.5, 2);
    let noise = signals::white_noise(44_100, 1.0, 0.02, 2, 5);
    let mixed = tone.samples().iter().zip(noise.samples()).map(|(a, b)| a + b).collect();
    tone.with_samples(mixed).unwrap()
}

#[test]
fn full_chain_is_well_formed() {
    let pipeline = full_chain();
    assert!(pipeline.is_canonical_order());

    let input = noisy_tone();
    let output = pipeline.process(&input).unwrap();

    assert_eq!(output.frames(), input.frames());
    assert_eq!(output.channels(), 2);
    assert!(analysis::all_finite(output.samples()));

    // Normalize runs before pan; pan can only lower the louder channel
    let metrics = compute_metrics(&output);
    assert!(metrics.peak_db <= -1.0 + 1e-3, "peak {} dB", metrics.peak_db);
}

#[test]
fn mono_input_comes_out_stereo() {
    let input = signals::sine(220.0, 22_050, 0.5, 0.5, 1);
    let output = Pipeline::new()
        .then(Stage::Lowpass { cutoff_hz: 4000.0 })
        .then(Stage::Pan { position: 0.5 })
        .process(&input)
        .unwrap();
    assert_eq!(output.channels(), 2);
    assert_eq!(output.frames(), input.frames());
}

#[test]
fn lowpass_above_nyquist_fails_at_runtime() {
    // 16 kHz is fine for 44.1 kHz but not after resampling to 16 kHz
    let pipeline = Pipeline::new()
        .with_target_sample_rate(16_000)
        .then(Stage::Lowpass { cutoff_hz: 16_000.0 });
    assert!(pipeline.validate().is_ok());
    assert!(pipeline.process(&signals::sine(440.0, 44_100, 0.2, 0.5, 1)).is_err());
}

#[test]
fn pipeline_deserializes_from_json() {
    let json = r#"{
        "target_sample_rate": 48000,
        "stages": [
            { "type": "gain", "gain_db": -6.0 },
            { "type": "eq", "mid": { "frequency_hz": 1200.0, "q": 1.2, "gain_db": 3.0 } },
            { "type": "reverb", "decay_seconds": 0.8 },
            { "type": "normalize", "target_db": -1.0 }
        ]
    }"#;
    let pipeline: Pipeline = serde_json::from_str(json).unwrap();

    assert_eq!(pipeline.target_sample_rate, Some(48_000));
    assert_eq!(pipeline.len(), 4);
    let kinds: Vec<StageKind> = pipeline.stages.iter().map(Stage::kind).collect();
    assert_eq!(
        kinds,
        vec![StageKind::Gain, StageKind::Eq, StageKind::TimeEffect, StageKind::Dynamics]
    );
    match &pipeline.stages[1] {
        Stage::Eq(eq) => {
            assert_eq!(eq.mid.gain_db, 3.0);
            assert_eq!(eq.low, EqParams::default().low);
        }
        other => panic!("unexpected stage {:?}", other),
    }
}

#[test]
fn transforms_are_shareable_across_threads() {
    let pipeline: Arc<dyn AudioTransform> = Arc::new(full_chain());
    let inputs: Vec<_> = (0..4)
        .map(|seed| signals::white_noise(22_050, 0.25, 0.3, 2, seed))
        .collect();

    let outputs: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| {
                let pipeline = Arc::clone(&pipeline);
                scope.spawn(move || pipeline.process(input).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    // Same result as running sequentially
    for (input, output) in inputs.iter().zip(&outputs) {
        assert_eq!(&pipeline.process(input).unwrap(), output);
    }
    assert_eq!(pipeline.name(), "pipeline");
}

#[test]
fn file_to_file_processing() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("in.wav");
    let target = dir.path().join("out.wav");

    write(&source, &noisy_tone().with_bits_per_sample(24)).unwrap();
    let input = read(&source).unwrap();
    let output = Pipeline::new()
        .then(Stage::AutoGain { target_rms_db: -20.0 })
        .process(&input)
        .unwrap();
    write(&target, &output).unwrap();

    let reread = read(&target).unwrap();
    assert_eq!(reread.format().bits_per_sample, 24);
    assert!((compute_metrics(&reread).rms_db + 20.0).abs() < 0.01);
}

#[test]
fn loopback_device_carries_processed_audio() {
    let mut device = LoopbackDevice::new();
    let processed = full_chain().process(&noisy_tone()).unwrap();

    device.play(&processed).unwrap();
    assert_eq!(device.record().unwrap(), processed);
}
