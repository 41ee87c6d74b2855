//! Spectral-subtraction noise reduction
//!
//! Per channel:
//! 1. STFT (1024-point periodic Hann window, hop 256, signal centred with
//!    half a frame of zeros on each side)
//! 2. Noise magnitude per bin = 10th percentile of that bin across all frames
//! 3. Each bin's magnitude is reduced by `noise * (1 - 10^(-reduction_db/20))`
//!    and floored at `10^(noise_floor_db/20)`; phase is kept
//! 4. Weighted overlap-add resynthesis, cut to the input length
//!
//! The noise estimate assumes noise is the quietest, most stationary content
//! of the recording. Spectra are scaled by `1 / Σw`, so a full-scale sinusoid
//! of amplitude `A` peaks near `A / 2` and the floor is expressed in those
//! units.

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;
use timbre_core::{db_to_linear, AudioBuffer, NoiseReducerParams, Result};
use tracing::{debug, trace};

/// STFT frame size
pub const FRAME_SIZE: usize = 1024;

/// STFT hop size
pub const HOP_SIZE: usize = FRAME_SIZE / 4;

/// Percentile used for the per-bin noise estimate
const NOISE_PERCENTILE: f32 = 10.0;

/// Below this the overlap-add normalization is treated as zero coverage
const WINDOW_EPSILON: f32 = 1e-10;

/// Reduce stationary noise by spectral subtraction
pub fn reduce_noise(input: &AudioBuffer, params: &NoiseReducerParams) -> Result<AudioBuffer> {
    params.validate()?;

    debug!(
        reduction_db = params.reduction_db,
        noise_floor_db = params.noise_floor_db,
        frames = input.frames(),
        "noise reduction"
    );

    if input.is_empty() {
        return Ok(input.clone());
    }

    let reduction_linear = db_to_linear(-params.reduction_db);
    let floor = db_to_linear(params.noise_floor_db);
    let stft = Stft::new(FRAME_SIZE, HOP_SIZE);

    input.map_channels(|index, channel| {
        if channel.iter().all(|&s| s == 0.0) {
            trace!(channel = index, "silent channel, skipping STFT");
            return vec![0.0; channel.len()];
        }
        stft.denoise(channel, reduction_linear, floor)
    })
}

/// Short-time Fourier transform with a fixed frame and hop size
struct Stft {
    size: usize,
    hop: usize,
    window: Vec<f32>,
    window_sum: f32,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
}

impl Stft {
    fn new(size: usize, hop: usize) -> Self {
        // Periodic Hann
        let window: Vec<f32> = (0..size)
            .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f32 / size as f32).cos())
            .collect();
        let window_sum = window.iter().sum();

        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(size);
        let inverse = planner.plan_fft_inverse(size);

        Self {
            size,
            hop,
            window,
            window_sum,
            forward,
            inverse,
        }
    }

    fn pad(&self) -> usize {
        self.size / 2
    }

    fn frame_count(&self, len: usize) -> usize {
        len.div_ceil(self.hop) + 1
    }

    fn padded_len(&self, frame_count: usize) -> usize {
        (frame_count - 1) * self.hop + self.size
    }

    fn analyze(&self, signal: &[f32]) -> Vec<Vec<Complex<f32>>> {
        let frame_count = self.frame_count(signal.len());
        let mut padded = vec![0.0_f32; self.padded_len(frame_count)];
        padded[self.pad()..self.pad() + signal.len()].copy_from_slice(signal);

        let scale = 1.0 / self.window_sum;
        (0..frame_count)
            .map(|frame| {
                let start = frame * self.hop;
                let mut spectrum: Vec<Complex<f32>> = padded[start..start + self.size]
                    .iter()
                    .zip(&self.window)
                    .map(|(&s, &w)| Complex::new(s * w, 0.0))
                    .collect();
                self.forward.process(&mut spectrum);
                spectrum.iter_mut().for_each(|bin| *bin *= scale);
                spectrum
            })
            .collect()
    }

    fn synthesize(&self, spectra: Vec<Vec<Complex<f32>>>, len: usize) -> Vec<f32> {
        let padded_len = self.padded_len(spectra.len());
        let mut output = vec![0.0_f32; padded_len];
        let mut coverage = vec![0.0_f32; padded_len];

        // Undo the analysis scaling and rustfft's unnormalized inverse together
        let scale = self.window_sum / self.size as f32;

        for (frame, mut spectrum) in spectra.into_iter().enumerate() {
            self.inverse.process(&mut spectrum);
            let start = frame * self.hop;
            for (i, (bin, &w)) in spectrum.iter().zip(&self.window).enumerate() {
                output[start + i] += bin.re * scale * w;
                coverage[start + i] += w * w;
            }
        }

        for (sample, &norm) in output.iter_mut().zip(&coverage) {
            if norm > WINDOW_EPSILON {
                *sample /= norm;
            }
        }

        let mut result: Vec<f32> = output.into_iter().skip(self.pad()).take(len).collect();
        result.resize(len, 0.0);
        result
    }

    fn denoise(&self, signal: &[f32], reduction_linear: f32, floor: f32) -> Vec<f32> {
        let mut spectra = self.analyze(signal);

        let magnitudes: Vec<Vec<f32>> = spectra
            .iter()
            .map(|frame| frame.iter().map(|bin| bin.norm()).collect())
            .collect();
        let noise = noise_profile(&magnitudes, self.size);
        let subtract = 1.0 - reduction_linear;

        for (frame, mags) in spectra.iter_mut().zip(&magnitudes) {
            for ((bin, &mag), &noise_mag) in frame.iter_mut().zip(mags).zip(&noise) {
                // A zero bin has no phase to keep
                if mag > 0.0 {
                    let target = (mag - noise_mag * subtract).max(floor);
                    *bin *= target / mag;
                }
            }
        }

        self.synthesize(spectra, signal.len())
    }
}

/// Per-bin noise magnitude across all frames
fn noise_profile(magnitudes: &[Vec<f32>], bins: usize) -> Vec<f32> {
    let mut column = Vec::with_capacity(magnitudes.len());
    (0..bins)
        .map(|bin| {
            column.clear();
            column.extend(magnitudes.iter().map(|frame| frame[bin]));
            percentile(&mut column, NOISE_PERCENTILE)
        })
        .collect()
}

/// Percentile with linear interpolation between closest ranks
///
/// Sorts `values` in place.
fn percentile(values: &mut [f32], pct: f32) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f32::total_cmp);

    let rank = pct / 100.0 * (values.len() - 1) as f32;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f32;
    values[lower] + (values[upper] - values[lower]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{analysis, signals};

    #[test]
    fn percentile_interpolates() {
        let mut values = vec![4.0, 1.0, 3.0, 2.0, 5.0];
        assert_eq!(percentile(&mut values, 0.0), 1.0);
        assert_eq!(percentile(&mut values, 50.0), 3.0);
        assert_eq!(percentile(&mut values, 100.0), 5.0);
        // rank 0.4 between 1.0 and 2.0
        assert!((percentile(&mut values, 10.0) - 1.4).abs() < 1e-6);
    }

    #[test]
    fn stft_round_trip_is_transparent() {
        let stft = Stft::new(FRAME_SIZE, HOP_SIZE);
        let signal = signals::white_noise(44100, 0.2, 0.5, 1, 3).into_samples();
        let spectra = stft.analyze(&signal);
        let rebuilt = stft.synthesize(spectra, signal.len());

        assert_eq!(rebuilt.len(), signal.len());
        let diff = analysis::max_abs_diff(&signal, &rebuilt);
        assert!(diff < 1e-4, "reconstruction error {}", diff);
    }

    #[test]
    fn short_signals_keep_their_length() {
        let input = signals::white_noise(44100, 0.001, 0.5, 1, 11);
        assert!(input.frames() < FRAME_SIZE);
        let output = reduce_noise(&input, &NoiseReducerParams::default()).unwrap();
        assert_eq!(output.frames(), input.frames());
        assert!(analysis::all_finite(output.samples()));
    }

    #[test]
    fn zero_reduction_is_near_identity() {
        let input = signals::sine(440.0, 44100, 1.0, 0.5, 1);
        let params = NoiseReducerParams {
            reduction_db: 0.0,
            noise_floor_db: -120.0,
        };
        let output = reduce_noise(&input, &params).unwrap();

        let error = analysis::rms_diff(input.samples(), output.samples());
        assert!(error < 1e-3, "rms error {}", error);
    }

    #[test]
    fn stationary_noise_is_attenuated() {
        let input = signals::white_noise(44100, 1.0, 0.1, 1, 42);
        let params = NoiseReducerParams {
            reduction_db: 20.0,
            noise_floor_db: -100.0,
        };
        let output = reduce_noise(&input, &params).unwrap();

        let before = analysis::rms(input.samples());
        let after = analysis::rms(output.samples());
        assert!(after < before * 0.9, "rms {} -> {}", before, after);
    }

    #[test]
    fn silent_input_stays_silent() {
        let input = signals::silence(4096, 2, 44100);
        let output = reduce_noise(&input, &NoiseReducerParams::default()).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn negative_reduction_is_rejected() {
        let input = signals::silence(16, 1, 44100);
        let params = NoiseReducerParams {
            reduction_db: -3.0,
            noise_floor_db: -80.0,
        };
        assert!(reduce_noise(&input, &params).is_err());
    }
}
