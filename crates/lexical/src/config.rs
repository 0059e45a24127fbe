//! Configuration types for the normalization engine.
//!
//! This module defines [`NormalizeConfig`], which selects the dialect and
//! tunes how the backward scan is carried out.
//!
//! # Output stability
//!
//! None of the tuning knobs change *what* a path normalizes to. The scalar
//! automaton, the single-word scan and the multi-word batch loop produce the
//! same plan for every input; the knobs only move the crossover points and
//! pick the classifier implementation. Only `dialect` affects output.
//!
//! # Examples
//!
//! ## Default Configuration
//!
//! ```rust
//! use lexical::{BatchWidth, ClassifierKind, Dialect, NormalizeConfig};
//!
//! let config = NormalizeConfig::default();
//! assert_eq!(config.dialect, Dialect::Unix);
//! assert_eq!(config.scalar_threshold, 16);
//! assert_eq!(config.batch_width, BatchWidth::W64);
//! assert_eq!(config.classifier, ClassifierKind::Auto);
//! ```
//!
//! ## Windows paths
//!
//! ```rust
//! use lexical::{Dialect, NormalizeConfig};
//!
//! let config = NormalizeConfig::for_dialect(Dialect::Windows);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;
use crate::error::ConfigError;

/// Upper bound for [`NormalizeConfig::scalar_threshold`].
///
/// The scalar automaton visits every character; past a few KiB the batch
/// engine's clean-window skip always wins.
pub const MAX_SCALAR_THRESHOLD: usize = 4096;

/// Word size of the bit-parallel engine.
///
/// Serialized as the plain number of characters per batch (`32` or `64`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum BatchWidth {
    W32,
    #[default]
    W64,
}

impl BatchWidth {
    /// Characters covered by one batch.
    pub const fn bits(self) -> usize {
        match self {
            BatchWidth::W32 => 32,
            BatchWidth::W64 => 64,
        }
    }
}

impl TryFrom<u32> for BatchWidth {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            32 => Ok(BatchWidth::W32),
            64 => Ok(BatchWidth::W64),
            other => Err(ConfigError::InvalidConfig(format!(
                "batch_width must be 32 or 64, got {other}"
            ))),
        }
    }
}

impl From<BatchWidth> for u32 {
    fn from(value: BatchWidth) -> Self {
        value.bits() as u32
    }
}

/// Which character classifier the batch engine uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierKind {
    /// Vectorized compare+pack when the CPU supports it, scalar otherwise.
    #[default]
    Auto,
    /// Always classify one character at a time.
    Scalar,
}

/// Configuration for a [`Normalizer`](crate::Normalizer).
///
/// `NormalizeConfig` is cheap to clone and serializable, mirroring how the
/// rest of the workspace passes configuration around:
///
/// ```json
/// {
///   "dialect": "windows",
///   "scalar_threshold": 16,
///   "batch_width": 64,
///   "classifier": "auto"
/// }
/// ```
///
/// Missing fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Path syntax to normalize. Default: [`Dialect::Unix`].
    pub dialect: Dialect,

    /// Bodies shorter than this many bytes are reduced by the scalar
    /// automaton instead of the bit-parallel engine.
    ///
    /// `0` forces the batch engine for every input. Must not exceed
    /// [`MAX_SCALAR_THRESHOLD`]. Default: `16`.
    pub scalar_threshold: usize,

    /// Batch width of the bit-parallel engine. Default: [`BatchWidth::W64`].
    pub batch_width: BatchWidth,

    /// Classifier implementation. Default: [`ClassifierKind::Auto`].
    pub classifier: ClassifierKind,
}

impl NormalizeConfig {
    /// Default tuning for the given dialect.
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    /// Checks the tuning values.
    ///
    /// ```rust
    /// use lexical::{ConfigError, NormalizeConfig};
    ///
    /// let cfg = NormalizeConfig {
    ///     scalar_threshold: 1 << 20,
    ///     ..Default::default()
    /// };
    /// assert!(matches!(cfg.validate(), Err(ConfigError::InvalidConfig(_))));
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scalar_threshold > MAX_SCALAR_THRESHOLD {
            return Err(ConfigError::InvalidConfig(format!(
                "scalar_threshold must be <= {MAX_SCALAR_THRESHOLD}, got {}",
                self.scalar_threshold
            )));
        }
        Ok(())
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Unix,
            scalar_threshold: 16,
            batch_width: BatchWidth::W64,
            classifier: ClassifierKind::Auto,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(NormalizeConfig::default().validate().is_ok());
    }

    #[test]
    fn threshold_limit_enforced() {
        let cfg = NormalizeConfig {
            scalar_threshold: MAX_SCALAR_THRESHOLD + 1,
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("scalar_threshold"));

        let at_limit = NormalizeConfig {
            scalar_threshold: MAX_SCALAR_THRESHOLD,
            ..Default::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn batch_width_serializes_as_number() {
        let cfg = NormalizeConfig {
            batch_width: BatchWidth::W32,
            ..Default::default()
        };
        let json = serde_json::to_value(&cfg).expect("serialize");
        assert_eq!(json["batch_width"], 32);
        assert_eq!(json["dialect"], "unix");
        assert_eq!(json["classifier"], "auto");
    }

    #[test]
    fn partial_json_uses_defaults() {
        let cfg: NormalizeConfig =
            serde_json::from_str(r#"{"dialect":"windows"}"#).expect("deserialize");
        assert_eq!(cfg.dialect, Dialect::Windows);
        assert_eq!(cfg.scalar_threshold, 16);
        assert_eq!(cfg.batch_width, BatchWidth::W64);
    }

    #[test]
    fn unknown_batch_width_rejected() {
        let res: Result<NormalizeConfig, _> = serde_json::from_str(r#"{"batch_width":48}"#);
        let err = res.unwrap_err().to_string();
        assert!(err.contains("batch_width must be 32 or 64"));
    }
}
