//! Biquad coefficient synthesis
//!
//! - RBJ peaking sections for the parametric EQ
//! - 4th-order Butterworth high-pass/low-pass as a cascade of two RBJ
//!   (bilinear, prewarped) second-order sections
//!
//! Coefficients are derived in f64 and normalized so that `a0 == 1`.
//! Filtering runs in direct form I with state zeroed at the start of every
//! call, so each call is a pure function of its input slice.

use std::f64::consts::PI;
use timbre_core::types::params::checks;
use timbre_core::{FilterSpec, Result, TimbreError};
use tracing::trace;

/// Section Q values of a 4th-order Butterworth: 1 / (2 cos(π/8)), 1 / (2 cos(3π/8))
const BUTTERWORTH_Q4: [f64; 2] = [0.541_196_100_146_197, 1.306_562_964_876_376_7];

/// Normalized biquad coefficients (a0 == 1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoeffs {
    /// Numerator coefficients
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    /// Denominator coefficients (a0 is normalized to 1.0)
    pub a1: f64,
    pub a2: f64,
}

impl Default for BiquadCoeffs {
    fn default() -> Self {
        Self::identity()
    }
}

impl BiquadCoeffs {
    /// Unity gain, no filtering
    pub fn identity() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
        }
    }

    fn normalized(b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) -> Self {
        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }

    /// RBJ peaking EQ section
    ///
    /// Returns `None` when the band is bypassed (`|gain_db| < 0.01`). An
    /// active band must sit below the Nyquist frequency.
    pub fn peaking(spec: &FilterSpec, sample_rate: u32) -> Result<Option<Self>> {
        spec.validate()?;
        if spec.is_bypass() {
            return Ok(None);
        }
        if f64::from(spec.frequency_hz) >= f64::from(sample_rate) / 2.0 {
            return Err(TimbreError::invalid_parameter(
                "frequency_hz",
                spec.frequency_hz,
                "must be below the Nyquist frequency",
            ));
        }

        let a = 10.0_f64.powf(f64::from(spec.gain_db) / 40.0);
        let w0 = 2.0 * PI * f64::from(spec.frequency_hz) / f64::from(sample_rate);
        let cos_w0 = w0.cos();
        let alpha = w0.sin() / (2.0 * f64::from(spec.q));

        let coeffs = Self::normalized(
            1.0 + alpha * a,
            -2.0 * cos_w0,
            1.0 - alpha * a,
            1.0 + alpha / a,
            -2.0 * cos_w0,
            1.0 - alpha / a,
        );
        trace!(?spec, ?coeffs, "peaking coefficients");
        Ok(Some(coeffs))
    }

    /// RBJ second-order low-pass section
    fn lowpass_section(w0: f64, q: f64) -> Self {
        let cos_w0 = w0.cos();
        let alpha = w0.sin() / (2.0 * q);
        Self::normalized(
            (1.0 - cos_w0) / 2.0,
            1.0 - cos_w0,
            (1.0 - cos_w0) / 2.0,
            1.0 + alpha,
            -2.0 * cos_w0,
            1.0 - alpha,
        )
    }

    /// RBJ second-order high-pass section
    fn highpass_section(w0: f64, q: f64) -> Self {
        let cos_w0 = w0.cos();
        let alpha = w0.sin() / (2.0 * q);
        Self::normalized(
            (1.0 + cos_w0) / 2.0,
            -(1.0 + cos_w0),
            (1.0 + cos_w0) / 2.0,
            1.0 + alpha,
            -2.0 * cos_w0,
            1.0 - alpha,
        )
    }

    /// Magnitude response at `freq_hz`
    pub fn magnitude_at(&self, freq_hz: f64, sample_rate: u32) -> f64 {
        let w = 2.0 * PI * freq_hz / f64::from(sample_rate);
        let (c1, s1) = (w.cos(), w.sin());
        let (c2, s2) = ((2.0 * w).cos(), (2.0 * w).sin());

        let num_re = self.b0 + self.b1 * c1 + self.b2 * c2;
        let num_im = -(self.b1 * s1 + self.b2 * s2);
        let den_re = 1.0 + self.a1 * c1 + self.a2 * c2;
        let den_im = -(self.a1 * s1 + self.a2 * s2);

        ((num_re * num_re + num_im * num_im) / (den_re * den_re + den_im * den_im)).sqrt()
    }
}

fn butterworth_w0(cutoff_hz: f32, sample_rate: u32) -> Result<f64> {
    checks::positive("cutoff_hz", cutoff_hz)?;
    let nyquist = f64::from(sample_rate) / 2.0;
    if f64::from(cutoff_hz) >= nyquist {
        return Err(TimbreError::invalid_parameter(
            "cutoff_hz",
            cutoff_hz,
            "must be below the Nyquist frequency",
        ));
    }
    Ok(2.0 * PI * f64::from(cutoff_hz) / f64::from(sample_rate))
}

/// 4th-order Butterworth low-pass as two cascaded sections
pub fn butterworth_lowpass(cutoff_hz: f32, sample_rate: u32) -> Result<[BiquadCoeffs; 2]> {
    let w0 = butterworth_w0(cutoff_hz, sample_rate)?;
    Ok(BUTTERWORTH_Q4.map(|q| BiquadCoeffs::lowpass_section(w0, q)))
}

/// 4th-order Butterworth high-pass as two cascaded sections
pub fn butterworth_highpass(cutoff_hz: f32, sample_rate: u32) -> Result<[BiquadCoeffs; 2]> {
    let w0 = butterworth_w0(cutoff_hz, sample_rate)?;
    Ok(BUTTERWORTH_Q4.map(|q| BiquadCoeffs::highpass_section(w0, q)))
}

/// Run one biquad over a signal (direct form I, zeroed state)
///
/// `y[n] = b0·x[n] + b1·x[n-1] + b2·x[n-2] - a1·y[n-1] - a2·y[n-2]`
pub fn apply_biquad(coeffs: &BiquadCoeffs, input: &[f32]) -> Vec<f32> {
    let (mut x1, mut x2, mut y1, mut y2) = (0.0_f64, 0.0_f64, 0.0_f64, 0.0_f64);

    input
        .iter()
        .map(|&sample| {
            let x0 = f64::from(sample);
            let y0 = coeffs.b0 * x0 + coeffs.b1 * x1 + coeffs.b2 * x2 - coeffs.a1 * y1 - coeffs.a2 * y2;
            x2 = x1;
            x1 = x0;
            y2 = y1;
            y1 = y0;
            y0 as f32
        })
        .collect()
}

/// Run a cascade of biquads in series
pub fn apply_cascade(sections: &[BiquadCoeffs], input: &[f32]) -> Vec<f32> {
    sections
        .iter()
        .fold(input.to_vec(), |signal, coeffs| apply_biquad(coeffs, &signal))
}
