//! In-memory catalog backed by a listing fixture.

use async_trait::async_trait;

use crate::catalog::{CommerceApi, ListParams, Product, ProductList};
use crate::ids::ProductId;
use crate::CommerceError;

/// A catalog served from memory.
///
/// Loaded from a Stripe-format listing (`{"data": [...]}`) so exported
/// API responses can be replayed offline. Inactive products are kept but
/// left out of listings, as the live API does with `active=true`.
#[derive(Debug, Clone, Default)]
pub struct FixtureCatalog {
    products: Vec<Product>,
}

impl FixtureCatalog {
    /// Create a catalog from products in listing order.
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Parse a listing fixture.
    pub fn from_json(json: &str) -> Result<Self, CommerceError> {
        let list: ProductList = serde_json::from_str(json)?;
        Ok(Self::new(list.data))
    }

    /// All products, including inactive ones.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Active products in listing order.
    pub fn active_products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.active)
    }
}

#[async_trait(?Send)]
impl CommerceApi for FixtureCatalog {
    async fn list_products(&self, params: &ListParams) -> Result<ProductList, CommerceError> {
        let active: Vec<&Product> = self.active_products().collect();

        let start = match &params.starting_after {
            Some(cursor) => active
                .iter()
                .position(|p| &p.id == cursor)
                .map(|i| i + 1)
                .ok_or_else(|| {
                    CommerceError::InvalidData(format!("unknown cursor: {}", cursor))
                })?,
            None => 0,
        };

        let limit = params.limit.max(1) as usize;
        let end = (start + limit).min(active.len());

        Ok(ProductList {
            data: active[start..end].iter().map(|p| (*p).clone()).collect(),
            has_more: end < active.len(),
        })
    }

    async fn retrieve_product(&self, id: &ProductId) -> Result<Product, CommerceError> {
        self.products
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    fn catalog() -> FixtureCatalog {
        let mut hidden = Product::new("prod_hidden", "Hidden");
        hidden.active = false;
        FixtureCatalog::new(vec![
            Product::new("prod_a", "A"),
            hidden,
            Product::new("prod_b", "B"),
            Product::new("prod_c", "C"),
        ])
    }

    #[test]
    fn test_pages_skip_inactive_products() {
        let catalog = catalog();
        let first = block_on(catalog.list_products(&ListParams::first(2))).unwrap();
        let ids: Vec<&str> = first.data.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["prod_a", "prod_b"]);
        assert!(first.has_more);

        let next = ListParams::first(2).after(ProductId::new("prod_b"));
        let second = block_on(catalog.list_products(&next)).unwrap();
        assert_eq!(second.data.len(), 1);
        assert!(!second.has_more);
    }

    #[test]
    fn test_retrieve_includes_inactive_and_reports_missing() {
        let catalog = catalog();
        assert!(block_on(catalog.retrieve_product(&ProductId::new("prod_hidden"))).is_ok());
        assert!(block_on(catalog.retrieve_product(&ProductId::new("nope")))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_from_json() {
        let catalog = FixtureCatalog::from_json(
            r#"{"object":"list","data":[{"id":"prod_1","name":"Mug","default_price":"price_1"}],"has_more":false}"#,
        )
        .unwrap();
        assert_eq!(catalog.products().len(), 1);
        assert!(FixtureCatalog::from_json("[]").is_err());
    }
}
