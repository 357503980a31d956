//! Product catalog module.
//!
//! Contains the commerce API's product and price records, the view models
//! pages are rendered from, and the API clients that produce them.

mod api;
mod fixture;
mod product;
mod view;

pub use api::{CommerceApi, ListParams, StripeCatalog, DEFAULT_PAGE_SIZE};
pub use fixture::FixtureCatalog;
pub use product::{Expandable, Price, Product, ProductList};
pub use view::{PriceFormatter, ProductDetail, ProductSummary};
