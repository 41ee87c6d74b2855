/// WAV encoder using hound
///
/// Writes 16- or 24-bit integer PCM or 32-bit float, chosen from the buffer's
/// `bits_per_sample`. Integer output is clamped to full scale here and only
/// here; floats are written as is.
use std::path::Path;
use timbre_core::{AudioBuffer, AudioEncoder, Result, TimbreError};
use tracing::debug;

/// WAV encoder
#[derive(Debug, Default, Clone, Copy)]
pub struct WavEncoder;

impl WavEncoder {
    pub fn new() -> Self {
        Self
    }

    fn spec_for(buffer: &AudioBuffer) -> Result<hound::WavSpec> {
        let format = buffer.format();
        let sample_format = match format.bits_per_sample {
            16 | 24 => hound::SampleFormat::Int,
            32 => hound::SampleFormat::Float,
            other => {
                return Err(TimbreError::encode(format!(
                    "Unsupported bit depth: {} (expected 16, 24 or 32)",
                    other
                )))
            }
        };
        Ok(hound::WavSpec {
            channels: format.channels,
            sample_rate: buffer.sample_rate(),
            bits_per_sample: format.bits_per_sample,
            sample_format,
        })
    }
}

fn encode_error(err: hound::Error) -> TimbreError {
    TimbreError::encode(format!("WAV write failed: {}", err))
}

impl AudioEncoder for WavEncoder {
    fn encode(&self, path: &Path, buffer: &AudioBuffer) -> Result<()> {
        if buffer.is_empty() {
            return Err(TimbreError::encode("Cannot write an empty buffer"));
        }

        let is_wav = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));
        if !is_wav {
            return Err(TimbreError::encode(format!(
                "Unsupported output format: {} (only .wav is written)",
                path.display()
            )));
        }

        let spec = Self::spec_for(buffer)?;
        let mut writer = hound::WavWriter::create(path, spec).map_err(encode_error)?;

        match (spec.sample_format, spec.bits_per_sample) {
            (hound::SampleFormat::Float, _) => {
                for &sample in buffer.samples() {
                    writer.write_sample(sample).map_err(encode_error)?;
                }
            }
            (hound::SampleFormat::Int, bits) => {
                let scale = (1_i64 << (bits - 1)) as f32;
                let max = scale - 1.0;
                for &sample in buffer.samples() {
                    let value = (sample * scale).round().clamp(-scale, max) as i32;
                    writer.write_sample(value).map_err(encode_error)?;
                }
            }
        }

        writer.finalize().map_err(encode_error)?;
        debug!(
            path = %path.display(),
            frames = buffer.frames(),
            channels = buffer.channels(),
            bits_per_sample = spec.bits_per_sample,
            "encoded"
        );
        Ok(())
    }
}

/// Encode a buffer to a WAV file
pub fn write(path: impl AsRef<Path>, buffer: &AudioBuffer) -> Result<()> {
    WavEncoder::new().encode(path.as_ref(), buffer)
}
