//! Commerce error types.

use shop_data::FetchError;
use thiserror::Error;

/// Errors that can occur talking to the commerce API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The commerce API could not be reached or answered with an error.
    #[error("Commerce API error: {0}")]
    Upstream(FetchError),

    /// The commerce API answered with a body we could not use.
    #[error("Invalid catalog data: {0}")]
    InvalidData(String),
}

impl CommerceError {
    /// Whether this error means the product does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ProductNotFound(_))
    }
}

impl From<FetchError> for CommerceError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Parse(msg) | FetchError::Json(msg) => CommerceError::InvalidData(msg),
            other => CommerceError::Upstream(other),
        }
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::InvalidData(e.to_string())
    }
}
