//! Checkout error types.

use shop_data::FetchError;
use thiserror::Error;

/// Errors from the buy action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// The checkout endpoint could not be reached or returned an error status.
    #[error("Checkout endpoint error: {0}")]
    Endpoint(FetchError),

    /// The endpoint answered without a usable checkout URL.
    #[error("Invalid checkout session: {0}")]
    InvalidSession(String),

    /// The price ID is not acceptable.
    #[error("Invalid price: {0:?}")]
    InvalidPrice(String),

    /// A checkout request is already in flight.
    #[error("Checkout already in progress")]
    InFlight,

    /// The browser has already been sent to checkout.
    #[error("Checkout already redirected")]
    AlreadyRedirected,
}

impl From<FetchError> for CheckoutError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Parse(msg) | FetchError::Json(msg) => CheckoutError::InvalidSession(msg),
            other => CheckoutError::Endpoint(other),
        }
    }
}
