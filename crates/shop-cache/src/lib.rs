//! Revalidating page store for the storefront.
//!
//! Pages are generated once, stored, and served from the store until their
//! revalidation interval passes; the next request after that regenerates
//! them inline and keeps the old page if regeneration fails.
//!
//! This crate provides:
//! - `IncrementalCache` - Serve-or-generate over a page store
//! - `PageStore` - Storage backends (Spin key-value, in-memory)
//! - `RevalidatePolicy` - Revalidation interval and `Cache-Control`
//! - `StaticPaths` - Pre-declared product pages and the fallback policy
//! - `PageHeadersBuilder` - Response headers for stored pages
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use shop_cache::{IncrementalCache, InMemoryPageStore, PageKey, RevalidatePolicy};
//!
//! let cache = IncrementalCache::new(InMemoryPageStore::new());
//! let policy = RevalidatePolicy::every(Duration::from_secs(3600));
//! let served = cache
//!     .serve(&PageKey::product("prod_1"), &policy, || async { render().await })
//!     .await?;
//! ```

mod clock;
mod error;
mod headers;
mod incremental;
mod page;
mod paths;
mod policy;
mod store;

pub use clock::*;
pub use error::CacheError;
pub use headers::*;
pub use incremental::*;
pub use page::*;
pub use paths::*;
pub use policy::*;
pub use store::*;
