use thiserror::Error;

/// Errors raised while overlaying, validating or shipping an `ExecutionConfig`.
///
/// Setters never produce these; range and consistency problems surface only when the
/// config is validated at the submission boundary.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration for '{key}': {reason}")]
    InvalidConfiguration { key: String, reason: String },

    #[error("failed to parse settings file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode submission payload: {0}")]
    Encode(#[from] bincode::Error),

    #[error("settings adapter failed: {0}")]
    Adapter(#[from] anyhow::Error),
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidConfiguration {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
