//! Site-level errors.

use std::path::PathBuf;

/// Errors raised while loading or validating the site configuration.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("failed to serialize config: {0}")]
    Serialize(String),

    #[error("invalid config: {field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("invalid value for variable {name}: {value:?}")]
    Variable { name: String, value: String },
}

impl SiteError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
