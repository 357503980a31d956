//! Observability for the storefront.
//!
//! This crate provides:
//! - `StructuredLogger` - Structured logging with request context
//! - `MetricsCollector` - Per-request page and fetch timings

mod logging;
mod metrics;

pub use logging::*;
pub use metrics::*;

// Re-export RequestId from shop-core for convenience
pub use shop_core::RequestId;
