//! Convolution reverb with a synthetic impulse response
//!
//! The impulse response is `decay_seconds * fs` samples of Gaussian noise
//! under an exponential envelope falling from 0 dB to -60 dB
//! (`10^(-3·i/(n-1))`). It is not a measured room, just a cheap diffuse tail.
//!
//! Each channel is convolved with the same response in the frequency domain
//! (full linear convolution), the tail past the input length is discarded and
//! the result is blended with the dry signal by `mix`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use std::f64::consts::PI;
use timbre_core::{AudioBuffer, Result, ReverbParams};
use tracing::{debug, trace};

/// Impulse response length in samples (`trunc(decay · fs)`)
pub fn impulse_response_len(decay_seconds: f32, sample_rate: u32) -> usize {
    let n = f64::from(decay_seconds) * f64::from(sample_rate);
    if n >= 1.0 {
        n as usize
    } else {
        0
    }
}

/// Generate the decaying-noise impulse response
///
/// Deterministic for a given `seed`.
pub fn impulse_response(len: usize, seed: u64) -> Vec<f32> {
    impulse_response_head(len, len, seed)
}

/// First `taps` samples of the `len`-sample impulse response
///
/// The envelope still spans `len` samples, so the result is a prefix of
/// `impulse_response(len, seed)`.
pub fn impulse_response_head(len: usize, taps: usize, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let span = len.saturating_sub(1).max(1) as f64;

    (0..taps.min(len))
        .map(|i| {
            let envelope = if len == 1 {
                1.0
            } else {
                10.0_f64.powf(-3.0 * i as f64 / span)
            };
            (envelope * standard_normal(&mut rng)) as f32
        })
        .collect()
}

/// Box-Muller transform: one N(0, 1) sample from two uniforms
fn standard_normal(rng: &mut impl Rng) -> f64 {
    // (0, 1] keeps ln() finite
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Full linear convolution via FFT
///
/// Output length is `signal.len() + kernel.len() - 1` (empty if either input
/// is empty).
pub fn fft_convolve(signal: &[f32], kernel: &[f32]) -> Vec<f32> {
    if signal.is_empty() || kernel.is_empty() {
        return Vec::new();
    }

    let out_len = signal.len() + kernel.len() - 1;
    let fft_size = out_len.next_power_of_two();

    let mut planner = FftPlanner::<f32>::new();
    let forward = planner.plan_fft_forward(fft_size);
    let inverse = planner.plan_fft_inverse(fft_size);

    let to_spectrum = |x: &[f32]| {
        let mut buf: Vec<Complex<f32>> = x.iter().map(|&s| Complex::new(s, 0.0)).collect();
        buf.resize(fft_size, Complex::new(0.0, 0.0));
        forward.process(&mut buf);
        buf
    };

    let kernel_fft = to_spectrum(kernel);
    let mut product = to_spectrum(signal);
    for (a, b) in product.iter_mut().zip(&kernel_fft) {
        *a *= *b;
    }
    inverse.process(&mut product);

    let scale = 1.0 / fft_size as f32;
    product.iter().take(out_len).map(|c| c.re * scale).collect()
}

/// Apply convolution reverb to every channel
pub fn reverb(input: &AudioBuffer, params: &ReverbParams) -> Result<AudioBuffer> {
    params.validate()?;

    let ir_len = impulse_response_len(params.decay_seconds, input.sample_rate());
    debug!(
        decay_seconds = params.decay_seconds,
        mix = params.mix,
        seed = params.seed,
        frames = input.frames(),
        "reverb"
    );

    if ir_len == 0 || input.is_empty() {
        return Ok(input.clone());
    }

    // Taps past the input length only reach the discarded tail
    let ir = impulse_response_head(ir_len, input.frames(), params.seed);
    trace!(ir_len, taps = ir.len(), "impulse response generated");

    let mix = params.mix;
    input.map_channels(|_, channel| {
        let wet = fft_convolve(channel, &ir);
        channel
            .iter()
            .zip(wet)
            .map(|(&dry, wet)| (1.0 - mix) * dry + mix * wet)
            .collect()
    })
}
