/// Core error types for Timbre
use thiserror::Error;

/// Result type alias using `TimbreError`
pub type Result<T> = std::result::Result<T, TimbreError>;

/// Core error type for Timbre
#[derive(Error, Debug)]
pub enum TimbreError {
    /// Unreadable, unsupported or corrupt input file
    #[error("Decode error: {0}")]
    Decode(String),

    /// Unwritable path, unsupported container or invalid buffer
    #[error("Encode error: {0}")]
    Encode(String),

    /// A parameter the math requires to be in a given range is not
    #[error("Invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Channel layout or sample count does not fit the operation
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// Sample rate conversion failed
    #[error("Resample error: {0}")]
    Resample(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TimbreError {
    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create an encode error
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(name: &'static str, value: impl Into<f64>, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value: value.into(),
            reason,
        }
    }

    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_message_names_the_parameter() {
        let err = TimbreError::invalid_parameter("drive", 0.0_f32, "must be > 0");
        assert_eq!(err.to_string(), "Invalid parameter `drive` = 0: must be > 0");
    }

    #[test]
    fn shape_mismatch_message() {
        let err = TimbreError::shape_mismatch("at most 2 channels", "6 channels");
        assert_eq!(
            err.to_string(),
            "Shape mismatch: expected at most 2 channels, got 6 channels"
        );
    }
}
