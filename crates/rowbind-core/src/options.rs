//! Engine options and their file-based configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Error type for loading mapping configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error reading the configuration file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Error parsing TOML
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Options for a [`Decoder`](crate::Decoder).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderOptions {
    /// Sentinel meaning "no value"; `omitempty` fields holding it are left untouched.
    pub nil_value: String,
    /// Skip declared columns absent from the header instead of failing.
    pub allow_missing_columns: bool,
}

/// Options for an [`Encoder`](crate::Encoder).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderOptions {
    /// Text written for optional fields holding no value.
    pub nil_value: String,
    /// Skip declared columns absent from the header instead of failing.
    pub allow_missing_columns: bool,
}

/// Options for both engines, loadable from YAML or TOML.
///
/// ```yaml
/// decoder:
///   nil_value: "NULL"
///   allow_missing_columns: true
/// encoder:
///   nil_value: "NULL"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    pub decoder: DecoderOptions,
    pub encoder: EncoderOptions,
}

impl MappingConfig {
    /// Load configuration from a file; `.toml` files are read as TOML,
    /// anything else as YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml(&content),
            _ => Self::from_yaml(&content),
        }
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml)?)
    }
}
