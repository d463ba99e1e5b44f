use std::path::PathBuf;

use thiserror::Error;

/// Errors emitted while reading or writing the settings document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No settings document has been written yet.
    #[error("settings document not found at {0:?}")]
    Missing(PathBuf),
    /// Filesystem operation failed.
    #[error("settings IO failed: {0}")]
    Io(#[from] std::io::Error),
    /// YAML serialization or deserialization failed.
    #[error("settings YAML invalid: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
