//! Measurements for verifying processed audio

/// Calculate RMS (Root Mean Square) level
///
/// Accumulates in f64; returns 0.0 for an empty slice.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f64 = samples.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
    (sum_squares / samples.len() as f64).sqrt() as f32
}

/// Absolute maximum sample value
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max)
}

/// Level change from `before` to `after` in dB
pub fn gain_db(before: f32, after: f32) -> f32 {
    20.0 * (after / before).log10()
}

/// Largest absolute difference between two equally long signals
pub fn max_abs_diff(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "signals differ in length");
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0_f32, f32::max)
}

/// RMS of the difference signal, relative to the RMS of `reference`
///
/// Returns the absolute difference RMS when the reference is silent.
pub fn rms_diff(reference: &[f32], other: &[f32]) -> f32 {
    assert_eq!(reference.len(), other.len(), "signals differ in length");
    let diff: Vec<f32> = reference.iter().zip(other).map(|(x, y)| x - y).collect();
    let level = rms(reference);
    if level > 0.0 {
        rms(&diff) / level
    } else {
        rms(&diff)
    }
}

/// True when no sample is NaN or infinite
pub fn all_finite(samples: &[f32]) -> bool {
    samples.iter().all(|s| s.is_finite())
}

/// Number of sign changes
pub fn zero_crossings(samples: &[f32]) -> usize {
    samples
        .windows(2)
        .filter(|pair| (pair[0] < 0.0) != (pair[1] < 0.0))
        .count()
}

/// Estimate the frequency of a tonal mono signal from its zero crossings
pub fn estimate_frequency(samples: &[f32], sample_rate: u32) -> f32 {
    if samples.len() < 2 {
        return 0.0;
    }
    let seconds = samples.len() as f32 / sample_rate as f32;
    zero_crossings(samples) as f32 / (2.0 * seconds)
}
