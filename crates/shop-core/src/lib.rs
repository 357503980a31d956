//! Core abstractions for the storefront.
//!
//! This crate provides the fundamental request-side types:
//! - `RequestContext` - Typed request parameters
//! - `RequestId` - Unique request identifier for log correlation
//! - `TimingContext` - Request lifecycle timing
//! - `Route` - The storefront route table

mod context;
mod lifecycle;
mod route;

pub use context::*;
pub use lifecycle::*;
pub use route::*;
