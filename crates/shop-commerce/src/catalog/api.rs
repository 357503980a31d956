//! Commerce API clients.

use async_trait::async_trait;
use shop_data::{DependencyTag, FetchClient, HttpTransport, QueryString};

use crate::catalog::{Product, ProductList};
use crate::ids::ProductId;
use crate::CommerceError;

/// Default page size for listing requests.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Parameters for one listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    /// Maximum products per page (1-100).
    pub limit: u32,
    /// Cursor: list products after this one.
    pub starting_after: Option<ProductId>,
}

impl ListParams {
    /// First page with the given size. The size is clamped to 1-100.
    pub fn first(limit: u32) -> Self {
        Self {
            limit: limit.clamp(1, DEFAULT_PAGE_SIZE),
            starting_after: None,
        }
    }

    /// The page following `last`.
    pub fn after(&self, last: ProductId) -> Self {
        Self {
            limit: self.limit,
            starting_after: Some(last),
        }
    }
}

impl Default for ListParams {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

/// Read access to the product catalog.
///
/// Listings include only active products, each with its default price
/// expanded. Retrieval expands the default price as well.
#[async_trait(?Send)]
pub trait CommerceApi {
    /// Fetch one page of active products.
    async fn list_products(&self, params: &ListParams) -> Result<ProductList, CommerceError>;

    /// Fetch a single product.
    ///
    /// Returns [`CommerceError::ProductNotFound`] when the API has no such product.
    async fn retrieve_product(&self, id: &ProductId) -> Result<Product, CommerceError>;
}

#[async_trait(?Send)]
impl<'a, A: CommerceApi + ?Sized> CommerceApi for &'a A {
    async fn list_products(&self, params: &ListParams) -> Result<ProductList, CommerceError> {
        (**self).list_products(params).await
    }

    async fn retrieve_product(&self, id: &ProductId) -> Result<Product, CommerceError> {
        (**self).retrieve_product(id).await
    }
}

/// Client for a Stripe-compatible products API.
pub struct StripeCatalog<T: HttpTransport> {
    client: FetchClient<T>,
}

impl<T: HttpTransport> StripeCatalog<T> {
    /// Create a catalog client. The secret key is sent as a bearer token.
    pub fn new(transport: T, api_base: impl Into<String>, secret_key: impl AsRef<str>) -> Self {
        Self {
            client: FetchClient::new(transport, api_base).with_bearer_auth(secret_key),
        }
    }

    /// Wrap an already configured fetch client.
    pub fn from_client(client: FetchClient<T>) -> Self {
        Self { client }
    }

    /// The underlying fetch client.
    pub fn client(&self) -> &FetchClient<T> {
        &self.client
    }
}

#[async_trait(?Send)]
impl<T: HttpTransport> CommerceApi for StripeCatalog<T> {
    async fn list_products(&self, params: &ListParams) -> Result<ProductList, CommerceError> {
        let query = QueryString::new()
            .push("active", "true")
            .push("limit", params.limit.to_string())
            .push("expand[]", "data.default_price")
            .push_opt("starting_after", params.starting_after.as_ref().map(|id| id.as_str()));

        let request = self
            .client
            .get("/products")
            .accept("application/json")
            .query(&query)
            .build()?;

        let list: ProductList = self
            .client
            .fetch_json(request, DependencyTag::Commerce)
            .await?;

        tracing::debug!(
            count = list.data.len(),
            has_more = list.has_more,
            "listed products"
        );
        Ok(list)
    }

    async fn retrieve_product(&self, id: &ProductId) -> Result<Product, CommerceError> {
        if !id.is_valid() {
            return Err(CommerceError::ProductNotFound(id.to_string()));
        }

        let request = self
            .client
            .get(&format!("/products/{}", id))
            .accept("application/json")
            .query(&QueryString::new().push("expand[]", "default_price"))
            .build()?;

        match self.client.fetch_json(request, DependencyTag::Commerce).await {
            Ok(product) => Ok(product),
            Err(e) if e.is_not_found() => Err(CommerceError::ProductNotFound(id.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use serde_json::json;
    use shop_data::MockTransport;

    use super::*;

    fn catalog(transport: MockTransport) -> StripeCatalog<MockTransport> {
        StripeCatalog::new(transport, "https://api.stripe.test/v1", "sk_test_abc")
    }

    #[test]
    fn test_list_request_shape() {
        let catalog = catalog(MockTransport::new().reply_json(
            200,
            json!({"object": "list", "data": [], "has_more": false}),
        ));

        let params = ListParams::first(10).after(ProductId::new("prod_9"));
        block_on(catalog.list_products(&params)).unwrap();

        let sent = &catalog.client().transport().requests()[0];
        assert_eq!(
            sent.url,
            "https://api.stripe.test/v1/products?active=true&limit=10&expand%5B%5D=data.default_price&starting_after=prod_9"
        );
        assert_eq!(sent.header("Authorization"), Some("Bearer sk_test_abc"));
    }

    #[test]
    fn test_retrieve_expands_price() {
        let catalog = catalog(MockTransport::new().reply_json(
            200,
            json!({
                "id": "prod_1",
                "name": "Caneca",
                "images": [],
                "default_price": {"id": "price_1", "unit_amount": 4500, "currency": "brl"}
            }),
        ));

        let product = block_on(catalog.retrieve_product(&ProductId::new("prod_1"))).unwrap();
        assert_eq!(product.price().and_then(|p| p.unit_amount), Some(4500));

        let sent = &catalog.client().transport().requests()[0];
        assert!(sent.url.ends_with("/products/prod_1?expand%5B%5D=default_price"));
    }

    #[test]
    fn test_retrieve_maps_404() {
        let catalog = catalog(MockTransport::new().reply_json(
            404,
            json!({"error": {"message": "No such product: 'prod_x'"}}),
        ));

        let err = block_on(catalog.retrieve_product(&ProductId::new("prod_x"))).unwrap_err();
        assert_eq!(err, CommerceError::ProductNotFound("prod_x".to_string()));
    }

    #[test]
    fn test_invalid_ids_never_reach_the_api() {
        let catalog = catalog(MockTransport::new());
        let err = block_on(catalog.retrieve_product(&ProductId::new("a/b"))).unwrap_err();
        assert!(err.is_not_found());
        assert!(catalog.client().transport().requests().is_empty());
    }

    #[test]
    fn test_server_errors_propagate_after_retry() {
        let catalog = catalog(
            MockTransport::new()
                .reply_json(500, json!({}))
                .reply_json(500, json!({})),
        );

        let err = block_on(catalog.list_products(&ListParams::default())).unwrap_err();
        assert!(matches!(err, CommerceError::Upstream(_)));
    }
}
