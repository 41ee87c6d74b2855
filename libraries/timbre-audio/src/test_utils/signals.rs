//! Test signal generation
//!
//! Every generator returns a 32-bit float `AudioBuffer` with the mono signal
//! copied to each channel (noise is drawn independently per channel).
//!
//! # Panics
//! The generators panic when `channels` or `sample_rate` is zero.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;
use timbre_core::{AudioBuffer, SampleRate};

fn frames_for(sample_rate: u32, duration: f32) -> usize {
    (f64::from(sample_rate) * f64::from(duration)).round() as usize
}

fn replicate(mono: &[f32], channels: u16, sample_rate: u32) -> AudioBuffer {
    let samples = mono
        .iter()
        .flat_map(|&s| std::iter::repeat(s).take(usize::from(channels)))
        .collect();
    build(samples, channels, sample_rate)
}

fn build(samples: Vec<f32>, channels: u16, sample_rate: u32) -> AudioBuffer {
    AudioBuffer::from_interleaved(samples, channels, SampleRate::new(sample_rate))
        .unwrap_or_else(|err| panic!("invalid test signal: {}", err))
}

/// Generate a sine wave
///
/// # Arguments
/// * `frequency` - Frequency in Hz
/// * `sample_rate` - Sample rate in Hz
/// * `duration` - Duration in seconds
/// * `amplitude` - Peak amplitude
/// * `channels` - Number of identical channels
pub fn sine(frequency: f32, sample_rate: u32, duration: f32, amplitude: f32, channels: u16) -> AudioBuffer {
    let mono: Vec<f32> = (0..frames_for(sample_rate, duration))
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (2.0 * PI * frequency * t).sin() * amplitude
        })
        .collect();
    replicate(&mono, channels, sample_rate)
}

/// Generate uniform white noise in `[-amplitude, amplitude]`
///
/// The same seed always yields the same buffer.
pub fn white_noise(sample_rate: u32, duration: f32, amplitude: f32, channels: u16, seed: u64) -> AudioBuffer {
    let mut rng = StdRng::seed_from_u64(seed);
    let len = frames_for(sample_rate, duration) * usize::from(channels);
    let samples = (0..len)
        .map(|_| rng.gen_range(-1.0_f32..=1.0) * amplitude)
        .collect();
    build(samples, channels, sample_rate)
}

/// All-zero buffer
pub fn silence(frames: usize, channels: u16, sample_rate: u32) -> AudioBuffer {
    build(vec![0.0; frames * usize::from(channels)], channels, sample_rate)
}

/// Single unit spike at frame `position`, zeros elsewhere
pub fn impulse(frames: usize, position: usize, channels: u16, sample_rate: u32) -> AudioBuffer {
    let mut mono = vec![0.0; frames];
    if let Some(sample) = mono.get_mut(position) {
        *sample = 1.0;
    }
    replicate(&mono, channels, sample_rate)
}

/// Mono sine that is only present between `start` and `end` seconds
///
/// Handy for transient and tail measurements.
pub fn sine_burst(
    frequency: f32,
    sample_rate: u32,
    duration: f32,
    start: f32,
    end: f32,
    amplitude: f32,
) -> AudioBuffer {
    let first = frames_for(sample_rate, start);
    let last = frames_for(sample_rate, end);
    let mono: Vec<f32> = (0..frames_for(sample_rate, duration))
        .map(|i| {
            if (first..last).contains(&i) {
                let t = i as f32 / sample_rate as f32;
                (2.0 * PI * frequency * t).sin() * amplitude
            } else {
                0.0
            }
        })
        .collect();
    replicate(&mono, 1, sample_rate)
}

/// Mono 1 kHz tone that alternates between quiet and loud halves every 100 ms
///
/// Used for compressor testing.
pub fn dynamic_test_signal(sample_rate: u32, duration: f32, quiet_amplitude: f32, loud_amplitude: f32) -> AudioBuffer {
    let section = frames_for(sample_rate, 0.1).max(1);
    let mono: Vec<f32> = (0..frames_for(sample_rate, duration))
        .map(|i| {
            let amplitude = if (i / section) % 2 == 0 {
                quiet_amplitude
            } else {
                loud_amplitude
            };
            let t = i as f32 / sample_rate as f32;
            (2.0 * PI * 1000.0 * t).sin() * amplitude
        })
        .collect();
    replicate(&mono, 1, sample_rate)
}
