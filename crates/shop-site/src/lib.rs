//! The storefront site: configuration, page generation and request handling.
//!
//! This crate wires the platform crates together:
//! - `ShopConfig` - Site configuration (TOML, JSON or Spin variables)
//! - `CatalogFetcher` / `DetailFetcher` - Commerce API to view models
//! - `PageRenderer` - View models to storable pages
//! - `Storefront` - Routes, page store and the buy action
//!
//! The host (the Spin component, tests, the CLI) supplies the commerce
//! API, the checkout endpoint and the page store.

pub mod config;
pub mod error;
pub mod generate;
pub mod storefront;

pub use config::ShopConfig;
pub use error::SiteError;
pub use generate::{CatalogFetcher, DetailFetcher, DetailProps, Listing, ListingProps, PageRenderer};
pub use storefront::{ShopRequest, ShopResponse, Storefront};
