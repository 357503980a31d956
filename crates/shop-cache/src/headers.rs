//! Response headers for stored pages.

use crate::page::StaticPage;
use crate::policy::{CacheStatus, RevalidatePolicy};

/// Header names used by the storefront.
pub mod header_names {
    /// How the page was obtained (HIT, MISS, STALE, ...).
    pub const X_SHOP_CACHE: &str = "X-Shop-Cache";
    /// Request ID for tracing.
    pub const X_REQUEST_ID: &str = "X-Request-Id";
}

/// Builder for page response headers.
#[derive(Debug, Default)]
pub struct PageHeadersBuilder {
    cache_control: Option<String>,
    etag: Option<String>,
    age: Option<u64>,
    status: Option<CacheStatus>,
}

impl PageHeadersBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Headers for a page served from the store or just generated.
    pub fn for_page(page: &StaticPage, status: CacheStatus, policy: &RevalidatePolicy, now: u64) -> Self {
        Self::new()
            .cache_control(policy.cache_control_header())
            .etag(page.etag_header())
            .age(page.age(now))
            .status(status)
    }

    /// Headers for a response that must not be stored.
    pub fn no_store() -> Self {
        Self::new()
            .cache_control(RevalidatePolicy::no_store_header())
            .status(CacheStatus::Bypass)
    }

    /// Set Cache-Control header.
    pub fn cache_control(mut self, value: impl Into<String>) -> Self {
        self.cache_control = Some(value.into());
        self
    }

    /// Set ETag header (already quoted).
    pub fn etag(mut self, value: impl Into<String>) -> Self {
        self.etag = Some(value.into());
        self
    }

    /// Set Age header.
    pub fn age(mut self, seconds: u64) -> Self {
        self.age = Some(seconds);
        self
    }

    /// Set the cache status header.
    pub fn status(mut self, status: CacheStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Build the headers.
    pub fn build(self) -> Vec<(String, String)> {
        let mut headers = Vec::new();

        if let Some(cc) = self.cache_control {
            headers.push(("Cache-Control".to_string(), cc));
        }

        if let Some(etag) = self.etag {
            headers.push(("ETag".to_string(), etag));
        }

        if let Some(age) = self.age {
            headers.push(("Age".to_string(), age.to_string()));
        }

        if let Some(status) = self.status {
            headers.push((header_names::X_SHOP_CACHE.to_string(), status.to_string()));
        }

        headers
    }
}
