/// Dynamic Range Compressor
///
/// Feed-forward, hard-knee, stereo-linked. The sidechain is the rectified mono
/// mix of all channels, smoothed by a one-pole follower that rises with the
/// attack coefficient and falls with the release coefficient:
///
/// `coeff = exp(-1 / (time_ms * sample_rate / 1000))`
///
/// The same gain curve is applied to every channel, so the stereo image does
/// not shift under compression.
use timbre_core::{AudioBuffer, CompressorParams, Result};
use tracing::{debug, trace};

/// Envelope floor used before converting to dB
const ENVELOPE_FLOOR: f64 = 1e-9;

/// One-pole smoothing coefficient for a time constant
fn time_coefficient(time_ms: f32, sample_rate: u32) -> f64 {
    let samples = 0.001 * f64::from(time_ms) * f64::from(sample_rate);
    (-1.0 / samples).exp()
}

/// Linear gain per frame derived from the mono sidechain
fn gain_curve(sidechain: &[f32], params: &CompressorParams, sample_rate: u32) -> Vec<f32> {
    let attack = time_coefficient(params.attack_ms, sample_rate);
    let release = time_coefficient(params.release_ms, sample_rate);
    let threshold = f64::from(params.threshold_db);
    let slope = 1.0 - 1.0 / f64::from(params.ratio);
    trace!(attack, release, slope, "compressor coefficients");

    let mut envelope = 0.0_f64;
    sidechain
        .iter()
        .map(|&x| {
            let level = f64::from(x.abs());
            let coeff = if level > envelope { attack } else { release };
            envelope = coeff * envelope + (1.0 - coeff) * level;

            let envelope_db = 20.0 * envelope.max(ENVELOPE_FLOOR).log10();
            let gain_db = (-(envelope_db - threshold) * slope).min(0.0);
            if gain_db == 0.0 {
                1.0
            } else {
                10.0_f64.powf(gain_db / 20.0) as f32
            }
        })
        .collect()
}

/// Compress every channel with a shared mono-derived gain
pub fn compress(input: &AudioBuffer, params: &CompressorParams) -> Result<AudioBuffer> {
    params.validate()?;
    debug!(
        threshold_db = params.threshold_db,
        ratio = params.ratio,
        attack_ms = params.attack_ms,
        release_ms = params.release_ms,
        frames = input.frames(),
        "compressor"
    );

    if input.is_empty() {
        return Ok(input.clone());
    }

    let gains = gain_curve(&input.mono_mix(), params, input.sample_rate());
    let channels = input.channels();

    let samples = input
        .samples()
        .chunks_exact(channels)
        .zip(&gains)
        .flat_map(|(frame, &gain)| frame.iter().map(move |&s| s * gain))
        .collect();
    input.with_samples(samples)
}
