//! Pre-declared product pages and the policy for everything else.

use serde::{Deserialize, Serialize};

/// What to do for a product page that was not declared up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Generate the page during the request; never show a placeholder.
    #[default]
    Blocking,
    /// Undeclared pages do not exist.
    Disabled,
    /// Show a loading placeholder; the page is generated on its follow-up request.
    Placeholder,
}

impl FallbackPolicy {
    /// Parse a policy name.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "blocking" => Some(Self::Blocking),
            "disabled" | "false" => Some(Self::Disabled),
            "placeholder" | "true" => Some(Self::Placeholder),
            _ => None,
        }
    }

    /// Policy name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blocking => "blocking",
            Self::Disabled => "disabled",
            Self::Placeholder => "placeholder",
        }
    }
}

impl std::fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How to answer a request for a product page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathDecision {
    /// Serve from the store, generating inline if needed.
    Serve,
    /// Answer with the loading placeholder.
    Placeholder,
    /// Answer 404 without touching the commerce API.
    NotFound,
}

/// The static allow-list of product pages.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StaticPaths {
    /// Product IDs generated ahead of demand.
    pub ids: Vec<String>,
    /// Policy for every other ID.
    pub fallback: FallbackPolicy,
}

impl StaticPaths {
    /// Create an allow-list.
    pub fn new(ids: Vec<String>, fallback: FallbackPolicy) -> Self {
        Self { ids, fallback }
    }

    /// Whether `id` is on the allow-list.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|known| known == id)
    }

    /// Decide how to answer a request for `id`.
    ///
    /// `stored` says whether a page for `id` is already in the store;
    /// `follow_up` marks the request a placeholder sends once loaded.
    pub fn decide(&self, id: &str, stored: bool, follow_up: bool) -> PathDecision {
        if self.contains(id) {
            return PathDecision::Serve;
        }

        match self.fallback {
            FallbackPolicy::Blocking => PathDecision::Serve,
            FallbackPolicy::Disabled => PathDecision::NotFound,
            FallbackPolicy::Placeholder if stored || follow_up => PathDecision::Serve,
            FallbackPolicy::Placeholder => PathDecision::Placeholder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(fallback: FallbackPolicy) -> StaticPaths {
        StaticPaths::new(vec!["prod_QMQ4s1QYK352Ae".to_string()], fallback)
    }

    #[test]
    fn test_listed_ids_are_always_served() {
        for fallback in [FallbackPolicy::Blocking, FallbackPolicy::Disabled, FallbackPolicy::Placeholder] {
            assert_eq!(
                paths(fallback).decide("prod_QMQ4s1QYK352Ae", false, false),
                PathDecision::Serve
            );
        }
    }

    #[test]
    fn test_blocking_never_shows_placeholder() {
        assert_eq!(paths(FallbackPolicy::Blocking).decide("prod_new", false, false), PathDecision::Serve);
    }

    #[test]
    fn test_disabled_rejects_unlisted() {
        assert_eq!(paths(FallbackPolicy::Disabled).decide("prod_new", true, false), PathDecision::NotFound);
    }

    #[test]
    fn test_placeholder_until_generated() {
        let paths = paths(FallbackPolicy::Placeholder);
        assert_eq!(paths.decide("prod_new", false, false), PathDecision::Placeholder);
        assert_eq!(paths.decide("prod_new", false, true), PathDecision::Serve);
        assert_eq!(paths.decide("prod_new", true, false), PathDecision::Serve);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(FallbackPolicy::parse("BLOCKING"), Some(FallbackPolicy::Blocking));
        assert_eq!(FallbackPolicy::parse("false"), Some(FallbackPolicy::Disabled));
        assert_eq!(FallbackPolicy::parse("sometimes"), None);
        assert_eq!(FallbackPolicy::default().to_string(), "blocking");
    }
}
