/// CLI configuration
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use timbre_audio::pipeline::Pipeline;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "timbre.toml";

/// Bit depths the WAV writer can produce
pub const SUPPORTED_BIT_DEPTHS: [u16; 3] = [16, 24, 32];

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TimbreConfig {
    #[serde(default)]
    pub output: OutputSettings,

    #[serde(default)]
    pub pipeline: Pipeline,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OutputSettings {
    #[serde(default = "default_bits_per_sample")]
    pub bits_per_sample: u16,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            bits_per_sample: default_bits_per_sample(),
        }
    }
}

fn default_bits_per_sample() -> u16 {
    16
}

impl TimbreConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist. Without one, `timbre.toml` in the
    /// working directory is used if present. `TIMBRE_`-prefixed variables
    /// override file values, with `__` separating nested keys
    /// (`TIMBRE_OUTPUT__BITS_PER_SAMPLE=24`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        let config_path = match path {
            Some(path) if !path.exists() => {
                return Err(CliError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => Some(path.to_path_buf()),
            None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
        };

        if let Some(config_path) = config_path {
            tracing::debug!(path = %config_path.display(), "loading config file");
            settings = settings.add_source(
                config::File::from(config_path).format(config::FileFormat::Toml),
            );
        }

        settings = settings.add_source(
            config::Environment::with_prefix("TIMBRE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document without consulting the environment
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !SUPPORTED_BIT_DEPTHS.contains(&self.output.bits_per_sample) {
            return Err(CliError::Config(format!(
                "output.bits_per_sample must be one of {:?}, got {}",
                SUPPORTED_BIT_DEPTHS, self.output.bits_per_sample
            )));
        }

        self.pipeline.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timbre_audio::pipeline::Stage;

    #[test]
    fn test_default_config_is_valid() {
        let config = TimbreConfig::default();
        assert_eq!(config.output.bits_per_sample, 16);
        assert!(config.pipeline.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        assert_eq!(TimbreConfig::from_toml_str("").unwrap(), TimbreConfig::default());
    }

    #[test]
    fn test_rejects_unsupported_bit_depth() {
        let err = TimbreConfig::from_toml_str("[output]\nbits_per_sample = 8\n").unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_stage_errors_surface_as_audio_errors() {
        let config = TimbreConfig {
            pipeline: Pipeline::new().then(Stage::Pan { position: 3.0 }),
            ..TimbreConfig::default()
        };
        assert!(matches!(config.validate(), Err(CliError::Audio(_))));
    }
}
