//! Checkout module.
//!
//! The buy action is a small state machine ([`CheckoutInitiator`]) in
//! front of an external endpoint that opens a hosted checkout session.

mod endpoint;
mod error;
mod state;

pub use endpoint::{CheckoutEndpoint, CheckoutSession, HttpCheckoutEndpoint};
pub use error::CheckoutError;
pub use state::{
    CheckoutInitiator, CheckoutState, Navigator, RecordingNavigator, DEFAULT_FAILURE_MESSAGE,
};
