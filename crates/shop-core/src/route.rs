//! Storefront route table.

use serde::{Deserialize, Serialize};

use crate::context::Method;

/// Maximum accepted length of a product identifier in a path.
pub const MAX_ID_LEN: usize = 255;

/// Configuration for a single route, as listed by tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Route pattern (e.g., "/product/:id").
    pub pattern: String,
    /// Handler name.
    pub handler: String,
    /// HTTP methods this route accepts.
    pub methods: Vec<String>,
}

impl RouteConfig {
    /// Create a new route configuration.
    pub fn new(pattern: impl Into<String>, handler: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            handler: handler.into(),
            methods: vec!["GET".to_string(), "HEAD".to_string()],
        }
    }

    /// Set allowed HTTP methods.
    pub fn with_methods(mut self, methods: Vec<&str>) -> Self {
        self.methods = methods.into_iter().map(String::from).collect();
        self
    }
}

/// The routes served by the storefront.
pub fn route_table() -> Vec<RouteConfig> {
    vec![
        RouteConfig::new("/", "listing"),
        RouteConfig::new("/product/:id", "detail"),
        RouteConfig::new("/product/:id/checkout", "checkout").with_methods(vec!["POST"]),
    ]
}

/// A resolved storefront route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/` - product carousel.
    Listing,
    /// `/product/{id}` - product detail page.
    Product { id: String },
    /// `/product/{id}/checkout` - buy action.
    Checkout { id: String },
}

/// Route resolution failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("no route for {0}")]
    NotFound(String),

    #[error("method {method} not allowed for {path}")]
    MethodNotAllowed { method: Method, path: String },
}

impl Route {
    /// Resolve a method and path to a route.
    ///
    /// A single trailing slash is ignored. Product identifiers must be
    /// non-empty and consist of ASCII alphanumerics, `_` or `-`.
    pub fn resolve(method: Method, path: &str) -> Result<Self, RouteError> {
        let trimmed = if path.len() > 1 {
            path.strip_suffix('/').unwrap_or(path)
        } else {
            path
        };

        let route = if trimmed == "/" || trimmed.is_empty() {
            Route::Listing
        } else {
            let rest = trimmed
                .strip_prefix("/product/")
                .ok_or_else(|| RouteError::NotFound(path.to_string()))?;

            match rest.split_once('/') {
                None if is_valid_id(rest) => Route::Product { id: rest.to_string() },
                Some((id, "checkout")) if is_valid_id(id) => Route::Checkout { id: id.to_string() },
                _ => return Err(RouteError::NotFound(path.to_string())),
            }
        };

        let allowed = match route {
            Route::Listing | Route::Product { .. } => method.is_read(),
            Route::Checkout { .. } => method == Method::Post,
        };

        if allowed {
            Ok(route)
        } else {
            Err(RouteError::MethodNotAllowed {
                method,
                path: path.to_string(),
            })
        }
    }

    /// Canonical path for this route.
    pub fn path(&self) -> String {
        match self {
            Route::Listing => "/".to_string(),
            Route::Product { id } => product_path(id),
            Route::Checkout { id } => format!("{}/checkout", product_path(id)),
        }
    }

    /// The `Allow` header value for this route.
    pub fn allow_header(&self) -> &'static str {
        match self {
            Route::Listing | Route::Product { .. } => "GET, HEAD",
            Route::Checkout { .. } => "POST",
        }
    }
}

/// Path of a product detail page.
pub fn product_path(id: &str) -> String {
    format!("/product/{}", id)
}

/// Check that an identifier is a safe path segment.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_listing() {
        assert_eq!(Route::resolve(Method::Get, "/"), Ok(Route::Listing));
        assert_eq!(Route::resolve(Method::Head, ""), Ok(Route::Listing));
    }

    #[test]
    fn test_resolve_product() {
        assert_eq!(
            Route::resolve(Method::Get, "/product/prod_QMQ4s1QYK352Ae"),
            Ok(Route::Product { id: "prod_QMQ4s1QYK352Ae".to_string() })
        );
        assert_eq!(
            Route::resolve(Method::Get, "/product/prod_1/"),
            Ok(Route::Product { id: "prod_1".to_string() })
        );
    }

    #[test]
    fn test_resolve_checkout_requires_post() {
        assert_eq!(
            Route::resolve(Method::Post, "/product/prod_1/checkout"),
            Ok(Route::Checkout { id: "prod_1".to_string() })
        );
        assert!(matches!(
            Route::resolve(Method::Get, "/product/prod_1/checkout"),
            Err(RouteError::MethodNotAllowed { .. })
        ));
        assert!(matches!(
            Route::resolve(Method::Post, "/product/prod_1"),
            Err(RouteError::MethodNotAllowed { .. })
        ));
    }

    #[test]
    fn test_resolve_rejects_unsafe_ids() {
        assert!(Route::resolve(Method::Get, "/product/").is_err());
        assert!(Route::resolve(Method::Get, "/product/..%2Fadmin").is_err());
        assert!(Route::resolve(Method::Get, "/product/a/b").is_err());
        assert!(Route::resolve(Method::Get, "/cart").is_err());
        assert!(Route::resolve(Method::Get, &format!("/product/{}", "a".repeat(300))).is_err());
    }

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Listing.path(), "/");
        assert_eq!(Route::Product { id: "p".into() }.path(), "/product/p");
        assert_eq!(Route::Checkout { id: "p".into() }.path(), "/product/p/checkout");
    }

    #[test]
    fn test_route_table_lists_checkout_as_post() {
        let table = route_table();
        assert_eq!(table.len(), 3);
        assert_eq!(table[2].methods, vec!["POST".to_string()]);
    }
}
