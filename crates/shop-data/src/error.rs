//! HTTP client error types.

use thiserror::Error;

/// Errors that can occur when making outbound requests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The host failed to send the request or receive a response.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The request could not be built.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// HTTP error response.
    #[error("HTTP {status} for {url}")]
    Http { status: u16, url: String, body: String },

    /// Failed to parse response body.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(String),
}

impl FetchError {
    /// HTTP status, if this is an HTTP error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the upstream reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Json(e.to_string())
    }
}
