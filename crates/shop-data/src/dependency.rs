//! Dependency tagging for semantic categorization.

use crate::retry::RetryPolicy;

/// Well-known dependency categories with semantic meaning.
///
/// Each tag carries a default retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyTag {
    /// Commerce catalog API (products and prices).
    Commerce,
    /// Checkout-session endpoint.
    Checkout,
    /// Custom dependency with name.
    Custom(&'static str),
}

impl DependencyTag {
    /// Get the default max retries for this dependency type.
    pub fn default_max_retries(&self) -> u32 {
        match self {
            // Catalog reads are idempotent
            Self::Commerce => 1,
            // A retried POST could open two sessions; the user retries instead
            Self::Checkout => 0,
            Self::Custom(_) => 0,
        }
    }

    /// Default retry policy for this dependency.
    pub fn default_retry_policy(&self) -> RetryPolicy {
        match self.default_max_retries() {
            0 => RetryPolicy::never(),
            n => RetryPolicy::reads(n),
        }
    }

    /// Whether a failure of this dependency fails page generation.
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Commerce)
    }

    /// Get the name of this dependency.
    pub fn name(&self) -> &str {
        match self {
            Self::Commerce => "commerce",
            Self::Checkout => "checkout",
            Self::Custom(name) => name,
        }
    }
}

impl std::fmt::Display for DependencyTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_is_never_retried() {
        let policy = DependencyTag::Checkout.default_retry_policy();
        assert_eq!(policy.max_retries, 0);
        assert!(!policy.should_retry_status(503, 0));
        assert!(!policy.should_retry_connection(0));
    }

    #[test]
    fn test_commerce_retries_server_errors_once() {
        let policy = DependencyTag::Commerce.default_retry_policy();
        assert!(policy.should_retry_status(502, 0));
        assert!(!policy.should_retry_status(502, 1));
        assert!(!policy.should_retry_status(404, 0));
        assert!(DependencyTag::Commerce.is_critical());
    }
}
