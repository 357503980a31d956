//! Newtype IDs for type-safe identifiers.
//!
//! Checkout takes a [`PriceId`], pages are keyed by [`ProductId`]; keeping
//! them distinct stops a product id from being posted as a price.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($name:ident) => {
        /// An opaque identifier issued by the commerce API.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the ID is safe to use as a path segment or form value.
            pub fn is_valid(&self) -> bool {
                shop_core::is_valid_id(&self.0)
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(PriceId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let id = ProductId::new("prod_QMQ4s1QYK352Ae");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""prod_QMQ4s1QYK352Ae""#);

        let back: PriceId = serde_json::from_str(r#""price_123""#).unwrap();
        assert_eq!(back.as_str(), "price_123");
    }

    #[test]
    fn test_id_validity() {
        assert!(PriceId::from("price_1Mo-x").is_valid());
        assert!(!PriceId::from("").is_valid());
        assert!(!ProductId::from("../etc").is_valid());
    }
}
