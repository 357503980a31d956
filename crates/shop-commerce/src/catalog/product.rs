//! Product and price records as the commerce API returns them.

use crate::ids::{PriceId, ProductId};
use serde::{Deserialize, Serialize};

/// A field the API returns either as a bare ID or, when `expand[]`
/// names it, as the full object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expandable<T> {
    /// The expanded object.
    Object(Box<T>),
    /// Just the identifier.
    Id(String),
}

impl<T> Expandable<T> {
    /// The expanded object, if the field was expanded.
    pub fn as_object(&self) -> Option<&T> {
        match self {
            Expandable::Object(obj) => Some(obj),
            Expandable::Id(_) => None,
        }
    }
}

/// A price attached to a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    /// Price identifier, posted to the checkout endpoint.
    pub id: PriceId,
    /// Amount in the currency's smallest unit; absent for custom amounts.
    #[serde(default)]
    pub unit_amount: Option<i64>,
    /// Lowercase ISO currency code.
    pub currency: String,
}

impl Price {
    /// Create a price.
    pub fn new(id: impl Into<PriceId>, unit_amount: Option<i64>, currency: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            unit_amount,
            currency: currency.into(),
        }
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Image URLs; the first one is shown.
    #[serde(default)]
    pub images: Vec<String>,
    /// Long description.
    #[serde(default)]
    pub description: Option<String>,
    /// Default price, expanded or as an ID.
    #[serde(default)]
    pub default_price: Option<Expandable<Price>>,
    /// Whether the product is for sale.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Product {
    /// Create an active product with no images, description or price.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            images: Vec::new(),
            description: None,
            default_price: None,
            active: true,
        }
    }

    /// Set the image URLs.
    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach an expanded default price.
    pub fn with_price(mut self, price: Price) -> Self {
        self.default_price = Some(Expandable::Object(Box::new(price)));
        self
    }

    /// The expanded default price, if present.
    pub fn price(&self) -> Option<&Price> {
        self.default_price.as_ref().and_then(Expandable::as_object)
    }

    /// The default price ID, whether or not the price was expanded.
    pub fn default_price_id(&self) -> Option<PriceId> {
        match self.default_price.as_ref()? {
            Expandable::Object(price) => Some(price.id.clone()),
            Expandable::Id(id) => Some(PriceId::new(id.clone())),
        }
    }

    /// The image shown for this product.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// One page of a product listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProductList {
    /// Products in API order.
    pub data: Vec<Product>,
    /// Whether more products follow the last one.
    #[serde(default)]
    pub has_more: bool,
}
