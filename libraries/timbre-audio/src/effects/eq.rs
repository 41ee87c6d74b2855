/// Parametric Equalizer
///
/// Three peaking bands (low, mid, high) applied in series to every channel.
/// Bands whose gain is below the bypass threshold are skipped; with all three
/// bypassed the input is returned untouched.
use crate::filter_design::{apply_cascade, BiquadCoeffs};
use timbre_core::{AudioBuffer, EqParams, Result};
use tracing::debug;

/// Apply the 3-band parametric EQ
pub fn parametric_eq(input: &AudioBuffer, params: &EqParams) -> Result<AudioBuffer> {
    params.validate()?;

    let mut sections = Vec::with_capacity(3);
    for band in params.bands() {
        if let Some(coeffs) = BiquadCoeffs::peaking(&band, input.sample_rate())? {
            sections.push(coeffs);
        }
    }

    debug!(
        active_bands = sections.len(),
        frames = input.frames(),
        "parametric EQ"
    );

    if sections.is_empty() || input.is_empty() {
        return Ok(input.clone());
    }

    input.map_channels(|_, channel| apply_cascade(&sections, channel))
}
