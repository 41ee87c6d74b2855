//! Signal metrics
//!
//! Read-only summary of a buffer: duration, peak and RMS level in dBFS, crest
//! factor and dynamic range. Levels are measured over every sample of every
//! channel.
//!
//! An empty buffer yields a "no signal" sentinel rather than an error:
//! duration 0, peak and RMS at negative infinity, crest factor and dynamic
//! range 0.

use serde::Serialize;
use std::fmt;
use timbre_core::AudioBuffer;

/// Floor applied before converting a linear level to dB
pub const LEVEL_FLOOR: f64 = 1e-9;

/// Summary metrics for one buffer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    pub duration_secs: f64,
    pub sample_rate: u32,
    pub channels: usize,
    pub peak_db: f64,
    pub rms_db: f64,
    /// Peak over RMS, linear
    pub crest_factor: f64,
    /// Loudest over quietest non-zero sample, in dB
    pub dynamic_range_db: f64,
}

impl Metrics {
    /// True for the empty-buffer sentinel
    pub fn is_no_signal(&self) -> bool {
        self.duration_secs == 0.0 && self.peak_db == f64::NEG_INFINITY
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.3}s {}Hz {}ch peak {:.2} dBFS rms {:.2} dBFS crest {:.2} range {:.2} dB",
            self.duration_secs,
            self.sample_rate,
            self.channels,
            self.peak_db,
            self.rms_db,
            self.crest_factor,
            self.dynamic_range_db
        )
    }
}

fn to_db(linear: f64) -> f64 {
    20.0 * linear.max(LEVEL_FLOOR).log10()
}

/// Compute metrics for a buffer
pub fn compute_metrics(buffer: &AudioBuffer) -> Metrics {
    if buffer.is_empty() {
        return Metrics {
            duration_secs: 0.0,
            sample_rate: buffer.sample_rate(),
            channels: buffer.channels(),
            peak_db: f64::NEG_INFINITY,
            rms_db: f64::NEG_INFINITY,
            crest_factor: 0.0,
            dynamic_range_db: 0.0,
        };
    }

    let samples = buffer.samples();
    let mut peak = 0.0_f64;
    let mut min_nonzero = f64::INFINITY;
    let mut sum_squares = 0.0_f64;

    for &s in samples {
        let magnitude = f64::from(s.abs());
        peak = peak.max(magnitude);
        if magnitude > 0.0 {
            min_nonzero = min_nonzero.min(magnitude);
        }
        sum_squares += magnitude * magnitude;
    }
    let rms = (sum_squares / samples.len() as f64).sqrt();

    let crest_factor = if rms > 0.0 { peak / rms } else { 0.0 };
    let dynamic_range_db = if min_nonzero.is_finite() {
        20.0 * (peak / min_nonzero).log10()
    } else {
        0.0
    };

    Metrics {
        duration_secs: buffer.duration_secs(),
        sample_rate: buffer.sample_rate(),
        channels: buffer.channels(),
        peak_db: to_db(peak),
        rms_db: to_db(rms),
        crest_factor,
        dynamic_range_db,
    }
}
