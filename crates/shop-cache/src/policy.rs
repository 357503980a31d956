//! Revalidation policy and cache status.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How long a stored page is served before it is regenerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevalidatePolicy {
    /// Age after which the page is regenerated.
    pub revalidate: Duration,
    /// Whether shared caches may serve the page while they revalidate.
    pub stale_while_revalidate: bool,
}

impl RevalidatePolicy {
    /// Regenerate pages older than `revalidate`.
    pub fn every(revalidate: Duration) -> Self {
        Self {
            revalidate,
            stale_while_revalidate: true,
        }
    }

    /// Disable the `stale-while-revalidate` directive.
    pub fn without_swr(mut self) -> Self {
        self.stale_while_revalidate = false;
        self
    }

    /// Revalidation interval in seconds.
    pub fn revalidate_secs(&self) -> u64 {
        self.revalidate.as_secs()
    }

    /// Generate the `Cache-Control` header value.
    pub fn cache_control_header(&self) -> String {
        let mut value = format!("public, s-maxage={}", self.revalidate_secs());
        if self.stale_while_revalidate {
            value.push_str(", stale-while-revalidate");
        }
        value
    }

    /// `Cache-Control` for responses that must never be stored.
    pub fn no_store_header() -> &'static str {
        "no-store"
    }
}

/// How a page request was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    /// Fresh page from the store.
    Hit,
    /// No stored page; generated for this request.
    Miss,
    /// Stored page was old; regenerated for this request.
    Revalidated,
    /// Stored page was old and regeneration failed; old page served.
    Stale,
    /// Loading placeholder served instead of the page.
    Fallback,
    /// Response was not stored (not-found and error pages, redirects).
    Bypass,
}

impl CacheStatus {
    /// Whether the page came out of the store without being regenerated.
    pub fn from_store(&self) -> bool {
        matches!(self, Self::Hit | Self::Stale)
    }
}

impl std::fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hit => write!(f, "HIT"),
            Self::Miss => write!(f, "MISS"),
            Self::Revalidated => write!(f, "REVALIDATED"),
            Self::Stale => write!(f, "STALE"),
            Self::Fallback => write!(f, "FALLBACK"),
            Self::Bypass => write!(f, "BYPASS"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_control_header() {
        let policy = RevalidatePolicy::every(Duration::from_secs(7200));
        assert_eq!(
            policy.cache_control_header(),
            "public, s-maxage=7200, stale-while-revalidate"
        );
        assert_eq!(policy.without_swr().cache_control_header(), "public, s-maxage=7200");
    }

    #[test]
    fn test_status_display() {
        assert_eq!(CacheStatus::Revalidated.to_string(), "REVALIDATED");
        assert!(CacheStatus::Stale.from_store());
        assert!(!CacheStatus::Miss.from_store());
    }
}
