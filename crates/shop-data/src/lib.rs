//! Data access layer for the storefront.
//!
//! This crate provides:
//! - `FetchClient` - Outbound requests with retry and JSON helpers
//! - `HttpTransport` - The seam between the client and the host (Spin)
//! - `DependencyTag` - Semantic dependency categories with default policies
//! - `RetryPolicy` - When outbound calls are repeated

mod client;
mod dependency;
mod error;
mod request;
mod response;
mod retry;
mod transport;

pub use client::*;
pub use dependency::*;
pub use error::FetchError;
pub use request::*;
pub use response::Response;
pub use retry::*;
pub use transport::*;
