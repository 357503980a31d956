//! Page store error types.

use thiserror::Error;

/// Errors that can occur when using the page store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Failed to open the store.
    #[error("Failed to open store: {0}")]
    Open(String),

    /// A stored page could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Failed to perform store operation.
    #[error("Store operation failed: {0}")]
    Store(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(e: serde_json::Error) -> Self {
        CacheError::Serialize(e.to_string())
    }
}
