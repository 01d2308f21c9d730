//! Configuration model for the stackwire CLI.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StackwireError};

/// Rendering used for resolved output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned `name  value` lines.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
    /// YAML document.
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = StackwireError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            other => Err(StackwireError::malformed(format!(
                "unknown output format \"{other}\""
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// Root configuration for the stackwire CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackwireConfig {
    /// Descriptor file used when none is passed on the command line.
    pub descriptor: PathBuf,
    /// Stage used when no other source names one.
    pub default_stage: String,
    /// Output rendering for `resolve`.
    pub output_format: OutputFormat,
}

impl Default for StackwireConfig {
    fn default() -> Self {
        Self {
            descriptor: PathBuf::from(crate::constants::DEFAULT_DESCRIPTOR_FILE),
            default_stage: crate::constants::DEFAULT_STAGE.into(),
            output_format: OutputFormat::default(),
        }
    }
}

impl StackwireConfig {
    /// Loads a configuration from a JSON file. Missing keys take their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| StackwireError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_points_at_standard_descriptor() {
        let config = StackwireConfig::default();
        assert_eq!(config.descriptor, PathBuf::from("stackwire.stk"));
        assert_eq!(config.default_stage, "dev");
        assert_eq!(config.output_format, OutputFormat::Text);
    }

    #[test]
    fn load_fills_missing_keys_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(br#"{ "default_stage": "production", "output_format": "json" }"#)
            .expect("write");
        let config = StackwireConfig::load(file.path()).expect("should load");
        assert_eq!(config.default_stage, "production");
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.descriptor, PathBuf::from("stackwire.stk"));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = StackwireConfig::load(Path::new("/nonexistent/stackwire.json")).unwrap_err();
        assert!(matches!(err, StackwireError::Io { .. }));
    }

    #[test]
    fn output_format_parses() {
        assert_eq!("yaml".parse::<OutputFormat>().ok(), Some(OutputFormat::Yaml));
        assert!("toml".parse::<OutputFormat>().is_err());
    }
}
