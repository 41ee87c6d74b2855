/// Audio decoder implementation using Symphonia
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use timbre_core::{AudioBuffer, AudioDecoder, AudioFormat, Result, SampleRate, TimbreError};
use tracing::{debug, warn};

/// Sample rate assumed when the container does not declare one
const FALLBACK_SAMPLE_RATE: u32 = 44_100;

/// Audio decoder using Symphonia
///
/// Supports: MP3, FLAC, OGG/Vorbis, WAV, AAC/M4A
///
/// Decodes the default track into memory as interleaved f32. The channel
/// layout of the file is kept as is (no downmix).
#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaDecoder;

impl SymphoniaDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self
    }
}

impl AudioDecoder for SymphoniaDecoder {
    fn decode(&self, path: &Path) -> Result<AudioBuffer> {
        if !path.exists() {
            return Err(TimbreError::decode(format!("File not found: {}", path.display())));
        }

        let file = std::fs::File::open(path)
            .map_err(|e| TimbreError::decode(format!("Failed to open {}: {}", path.display(), e)))?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        // Create a hint to help the format registry guess the format
        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| TimbreError::decode(format!("Failed to probe file: {}", e)))?;

        let mut format = probed.format;

        let track = format
            .default_track()
            .ok_or_else(|| TimbreError::decode("No audio tracks found"))?;

        let track_id = track.id;
        let params = track.codec_params.clone();

        let sample_rate = params.sample_rate.unwrap_or_else(|| {
            warn!(path = %path.display(), "no sample rate declared, assuming {} Hz", FALLBACK_SAMPLE_RATE);
            FALLBACK_SAMPLE_RATE
        });
        let bits_per_sample = params
            .bits_per_sample
            .and_then(|bits| u16::try_from(bits).ok())
            .unwrap_or(32);
        let mut channels = params.channels.map(|c| c.count());

        let mut decoder = symphonia::default::get_codecs()
            .make(&params, &DecoderOptions::default())
            .map_err(|e| TimbreError::decode(format!("Failed to create decoder: {}", e)))?;

        let mut samples = Vec::new();
        let mut sample_buf: Option<SampleBuffer<f32>> = None;

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    break;
                }
                Err(SymphoniaError::ResetRequired) => {
                    warn!("decoder reset required, stopping at the current position");
                    break;
                }
                Err(e) => {
                    return Err(TimbreError::decode(format!("Error reading packet: {}", e)));
                }
            };

            // Skip packets that are not for the default track
            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(e)) => {
                    // Corrupt packet: drop it and carry on
                    warn!(error = e, "skipping undecodable packet");
                    continue;
                }
                Err(e) => return Err(TimbreError::decode(format!("Decode error: {}", e))),
            };

            let spec = *decoded.spec();
            channels.get_or_insert(spec.channels.count());

            let buf = sample_buf.get_or_insert_with(|| SampleBuffer::new(decoded.capacity() as u64, spec));
            if buf.capacity() < decoded.capacity() * spec.channels.count() {
                *buf = SampleBuffer::new(decoded.capacity() as u64, spec);
            }
            buf.copy_interleaved_ref(decoded);
            samples.extend_from_slice(buf.samples());
        }

        let channels = channels.ok_or_else(|| TimbreError::decode("Unknown channel layout"))?;
        let channels = u16::try_from(channels)
            .map_err(|_| TimbreError::decode(format!("Unsupported channel count: {}", channels)))?;

        debug!(
            path = %path.display(),
            sample_rate,
            channels,
            bits_per_sample,
            frames = samples.len() / usize::from(channels.max(1)),
            "decoded"
        );

        AudioBuffer::new(
            samples,
            AudioFormat::new(SampleRate::new(sample_rate), channels, bits_per_sample),
        )
        .map_err(|e| TimbreError::decode(format!("Malformed stream: {}", e)))
    }

    fn supports_format(&self, path: &Path) -> bool {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            matches!(
                ext.to_lowercase().as_str(),
                "mp3" | "flac" | "ogg" | "wav" | "m4a" | "aac"
            )
        } else {
            false
        }
    }
}

/// Decode a file into an `AudioBuffer`
pub fn read(path: impl AsRef<Path>) -> Result<AudioBuffer> {
    SymphoniaDecoder::new().decode(path.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_extensions() {
        let decoder = SymphoniaDecoder::new();
        assert!(decoder.supports_format(Path::new("test.mp3")));
        assert!(decoder.supports_format(Path::new("test.FLAC")));
        assert!(decoder.supports_format(Path::new("test.ogg")));
        assert!(decoder.supports_format(Path::new("test.wav")));
        assert!(!decoder.supports_format(Path::new("test.txt")));
        assert!(!decoder.supports_format(Path::new("noext")));
    }

    #[test]
    fn missing_file_is_decode_error() {
        let result = read("/definitely/not/here.wav");
        assert!(matches!(result, Err(TimbreError::Decode(_))));
    }

    #[test]
    fn garbage_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.wav");
        std::fs::write(&path, b"this is not a riff file at all").unwrap();
        assert!(matches!(read(&path), Err(TimbreError::Decode(_))));
    }
}
