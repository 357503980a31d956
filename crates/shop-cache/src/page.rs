//! Stored pages and their keys.

use serde::{Deserialize, Serialize};

use crate::policy::RevalidatePolicy;

/// Store key for a page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageKey(String);

impl PageKey {
    /// Prefix shared by all page keys.
    pub const PREFIX: &'static str = "page:";

    /// Key for a request path.
    pub fn for_path(path: &str) -> Self {
        Self(format!("{}{}", Self::PREFIX, path))
    }

    /// Key for the listing page.
    pub fn listing() -> Self {
        Self::for_path("/")
    }

    /// Key for a product detail page.
    pub fn product(id: &str) -> Self {
        Self::for_path(&shop_core::product_path(id))
    }

    /// Parse a raw store key; non-page keys are rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.starts_with(Self::PREFIX).then(|| Self(raw.to_string()))
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The request path this key stores.
    pub fn path(&self) -> &str {
        &self.0[Self::PREFIX.len()..]
    }
}

impl std::fmt::Display for PageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Output of one generation pass, before it is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    /// Full HTML document.
    pub html: String,
    /// The view model(s) the page was rendered from.
    pub props: serde_json::Value,
}

impl RenderedPage {
    /// Create a rendered page.
    pub fn new(html: impl Into<String>, props: serde_json::Value) -> Self {
        Self {
            html: html.into(),
            props,
        }
    }
}

/// A generated page as kept in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticPage {
    /// Full HTML document.
    pub html: String,
    /// The view model(s) the page was rendered from.
    pub props: serde_json::Value,
    /// Unix seconds when the page was generated.
    pub generated_at: u64,
    /// Revalidation interval the page was stored with.
    pub revalidate_secs: u64,
    /// Content hash, unquoted.
    pub etag: String,
}

impl StaticPage {
    /// Stamp a rendered page for storage.
    pub fn from_rendered(rendered: RenderedPage, policy: &RevalidatePolicy, now: u64) -> Self {
        let etag = generate_etag(&rendered.html);
        Self {
            html: rendered.html,
            props: rendered.props,
            generated_at: now,
            revalidate_secs: policy.revalidate_secs(),
            etag,
        }
    }

    /// Age in seconds at `now`.
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.generated_at)
    }

    /// Whether the page is still within its revalidation interval.
    pub fn is_fresh(&self, now: u64) -> bool {
        self.age(now) < self.revalidate_secs
    }

    /// The `ETag` header value (quoted).
    pub fn etag_header(&self) -> String {
        format!("\"{}\"", self.etag)
    }

    /// Whether an `If-None-Match` value matches this page.
    pub fn matches_etag(&self, if_none_match: &str) -> bool {
        let quoted = self.etag_header();
        if_none_match
            .split(',')
            .map(|tag| tag.trim().trim_start_matches("W/"))
            .any(|tag| tag == "*" || tag == quoted)
    }
}

/// Generate a simple ETag from content.
pub fn generate_etag(content: &str) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("{:x}", hasher.finish())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn page(now: u64) -> StaticPage {
        StaticPage::from_rendered(
            RenderedPage::new("<html></html>", serde_json::json!({"products": []})),
            &RevalidatePolicy::every(Duration::from_secs(3600)),
            now,
        )
    }

    #[test]
    fn test_page_keys() {
        assert_eq!(PageKey::listing().as_str(), "page:/");
        assert_eq!(PageKey::product("prod_1").as_str(), "page:/product/prod_1");
        assert_eq!(PageKey::product("prod_1").path(), "/product/prod_1");
        assert_eq!(PageKey::parse("session:1"), None);
    }

    #[test]
    fn test_freshness_boundary() {
        let page = page(1_000);
        assert!(page.is_fresh(1_000));
        assert!(page.is_fresh(4_599));
        assert!(!page.is_fresh(4_600));
        assert_eq!(page.age(900), 0);
    }

    #[test]
    fn test_etag_matching() {
        let page = page(0);
        assert_eq!(page.etag, generate_etag("<html></html>"));
        assert!(page.matches_etag(&page.etag_header()));
        assert!(page.matches_etag(&format!("W/{}", page.etag_header())));
        assert!(page.matches_etag("\"other\", *"));
        assert!(!page.matches_etag("\"other\""));
    }
}
