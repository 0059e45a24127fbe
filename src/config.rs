//! YAML / JSON configuration file support.
//!
//! A configuration file selects the path dialect and the engine tuning used
//! by [`Normalizer`](crate::Normalizer). Every field except `version` is
//! optional.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! # pathnorm configuration
//! version: "1.0"
//! name: "windows build agents"
//!
//! normalize:
//!   dialect: windows
//!   scalar_threshold: 16
//!   batch_width: 64
//!   classifier: auto
//! ```
//!
//! The same document as JSON is accepted by [`PathnormConfig::from_json`],
//! and [`PathnormConfig::from_file`] picks the parser from the file
//! extension.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use lexical::{ConfigError, NormalizeConfig, Normalizer};

/// Errors that can occur when loading configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

impl From<ConfigError> for ConfigLoadError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidConfig(msg) => ConfigLoadError::Validation(msg),
        }
    }
}

/// Top-level configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PathnormConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    /// Dialect and engine tuning
    #[serde(default)]
    pub normalize: NormalizeConfig,
}

impl PathnormConfig {
    /// Load a configuration file; `.json` files are parsed as JSON, anything
    /// else as YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json(&content)?
        } else {
            Self::from_yaml(&content)?
        };
        info!(
            path = %path.display(),
            dialect = ?config.normalize.dialect,
            "pathnorm_config_loaded"
        );
        Ok(config)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: PathnormConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse JSON configuration from a string
    pub fn from_json(json: &str) -> Result<Self, ConfigLoadError> {
        let config: PathnormConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds the normalizer this configuration describes.
    pub fn normalizer(&self) -> Result<Normalizer, ConfigLoadError> {
        Ok(Normalizer::new(self.normalize.clone())?)
    }

    fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;
        self.normalize.validate()?;
        Ok(())
    }
}

impl Default for PathnormConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            normalize: NormalizeConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexical::{BatchWidth, ClassifierKind, Dialect};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_yaml() {
        let yaml = r#"
version: "1.0"
name: "test config"
normalize:
  dialect: windows
  batch_width: 32
"#;

        let config = PathnormConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.name, Some("test config".to_string()));
        assert_eq!(config.normalize.dialect, Dialect::Windows);
        assert_eq!(config.normalize.batch_width, BatchWidth::W32);
        assert_eq!(config.normalize.scalar_threshold, 16);
        assert_eq!(config.normalize.classifier, ClassifierKind::Auto);
    }

    #[test]
    fn test_load_from_file() {
        let yaml = r#"
version: "1"
normalize:
  dialect: unix
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let config = PathnormConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.version, "1");
        assert_eq!(config.normalize.dialect, Dialect::Unix);
    }

    #[test]
    fn test_load_json_by_extension() {
        let json = r#"{"version":"1.0","normalize":{"dialect":"windows","classifier":"scalar"}}"#;

        let mut temp_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        temp_file.write_all(json.as_bytes()).unwrap();

        let config = PathnormConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.normalize.dialect, Dialect::Windows);
        assert_eq!(config.normalize.classifier, ClassifierKind::Scalar);
    }

    #[test]
    fn test_default_config() {
        let config = PathnormConfig::default();
        assert_eq!(config.version, "1.0");
        assert!(config.name.is_none());
        assert!(config.normalizer().is_ok());
    }

    #[test]
    fn test_threshold_validation() {
        let yaml = r#"
version: "1.0"
normalize:
  scalar_threshold: 100000
"#;

        let result = PathnormConfig::from_yaml(yaml);
        assert!(matches!(result, Err(ConfigLoadError::Validation(_))));
        assert!(result.unwrap_err().to_string().contains("scalar_threshold"));
    }

    #[test]
    fn test_unsupported_version() {
        let result = PathnormConfig::from_yaml("version: \"2.0\"\n");
        assert!(matches!(result, Err(ConfigLoadError::UnsupportedVersion(v)) if v == "2.0"));
    }

    #[test]
    fn test_bad_batch_width_is_parse_error() {
        let result = PathnormConfig::from_yaml("version: \"1.0\"\nnormalize:\n  batch_width: 48\n");
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigLoadError::YamlParse(_)));
        assert!(err.to_string().contains("batch_width must be 32 or 64"));
    }

    #[test]
    fn test_missing_file() {
        let result = PathnormConfig::from_file("/definitely/not/here/pathnorm.yaml");
        assert!(matches!(result, Err(ConfigLoadError::FileRead(_))));
    }
}
