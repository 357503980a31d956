//! Commerce domain types and logic for the storefront.
//!
//! - **Catalog**: external products and prices, the view models pages are
//!   rendered from, and the [`CommerceApi`](catalog::CommerceApi) seam
//! - **Money**: minor-unit amounts with localized formatting
//! - **Checkout**: the buy-action state machine and the checkout-session
//!   endpoint it talks to
//!
//! # Example
//!
//! ```rust
//! use shop_commerce::prelude::*;
//!
//! let price = Money::new(7990, Currency::BRL);
//! assert_eq!(price.format(Locale::PtBr), "R$\u{a0}79,90");
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod catalog;
pub mod checkout;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Locale, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Locale, Money};

    // Catalog
    pub use crate::catalog::{
        CommerceApi, Expandable, FixtureCatalog, ListParams, Price, PriceFormatter, Product,
        ProductDetail, ProductList, ProductSummary, StripeCatalog,
    };

    // Checkout
    pub use crate::checkout::{
        CheckoutEndpoint, CheckoutError, CheckoutInitiator, CheckoutSession, CheckoutState,
        HttpCheckoutEndpoint, Navigator, RecordingNavigator,
    };
}
