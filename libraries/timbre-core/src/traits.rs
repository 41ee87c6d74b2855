/// Core traits for Timbre
use crate::error::Result;
use crate::types::AudioBuffer;
use std::path::Path;

/// Audio decoder trait
///
/// Implementers decode audio files into `AudioBuffer` format.
pub trait AudioDecoder: Send + Sync {
    /// Decode an audio file from the given path (loads entire file)
    ///
    /// # Errors
    /// Returns `TimbreError::Decode` if the file cannot be read or decoded
    fn decode(&self, path: &Path) -> Result<AudioBuffer>;

    /// Check if the decoder supports the given file format
    fn supports_format(&self, path: &Path) -> bool;
}

/// Audio encoder trait
///
/// Implementers write an `AudioBuffer` to a file.
pub trait AudioEncoder: Send + Sync {
    /// Encode the buffer to the given path
    ///
    /// # Errors
    /// Returns `TimbreError::Encode` for unwritable paths, unsupported
    /// containers or empty buffers
    fn encode(&self, path: &Path, buffer: &AudioBuffer) -> Result<()>;
}

/// A pure buffer-to-buffer transform
///
/// Transforms never mutate their input. Each call is a function of the whole
/// buffer: no state survives between calls, so one transform may be shared
/// across threads processing different buffers.
pub trait AudioTransform: Send + Sync {
    /// Process a buffer, returning a new one
    fn process(&self, input: &AudioBuffer) -> Result<AudioBuffer>;

    /// Get transform name (for logging)
    fn name(&self) -> &str;
}

/// Audio output capability
///
/// Playback devices live outside the processing core; they receive finished
/// buffers through this interface.
pub trait AudioOutput: Send {
    /// Play an audio buffer
    ///
    /// # Errors
    /// Returns an error if playback fails
    fn play(&mut self, buffer: &AudioBuffer) -> Result<()>;
}

/// Audio input capability
///
/// Capture devices live outside the processing core; they hand recorded
/// buffers to it through this interface.
pub trait AudioInput: Send {
    /// Record a buffer
    ///
    /// # Errors
    /// Returns an error if capture fails
    fn record(&mut self) -> Result<AudioBuffer>;
}
