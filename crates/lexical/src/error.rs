use thiserror::Error;

/// Errors raised while validating a [`NormalizeConfig`](crate::NormalizeConfig).
///
/// Normalization itself never fails; only configuration can be rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
