//! # CLI Configuration
//!
//! Optional YAML file passed with `--config`. Every field has a default,
//! so a partial (or absent) file is valid:
//!
//! ```yaml
//! log_format: json
//! license:
//!   default_cc_version: "4.0"
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use lms_license::LicenseConfig;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Settings for the `lms` binary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Log output format.
    pub log_format: LogFormat,
    /// License parsing and badge settings.
    pub license: LicenseConfig,
}

impl CliConfig {
    /// Load the configuration file, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    /// Parse a YAML configuration. An empty document yields the defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_yields_defaults() {
        let config = CliConfig::load(None).unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.license.default_cc_version, "4.0");
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let config = CliConfig::from_yaml_str("log_format: json\n").unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.license, LicenseConfig::default());
    }

    #[test]
    fn empty_file_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lms.yaml");
        std::fs::write(&path, "").unwrap();
        assert_eq!(CliConfig::load(Some(&path)).unwrap(), CliConfig::default());
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        assert!(CliConfig::from_yaml_str("log_format: xml\n").is_err());
    }

    #[test]
    fn missing_file_names_path() {
        let err = CliConfig::load(Some(Path::new("/nonexistent/lms.yaml"))).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/lms.yaml"));
    }
}
