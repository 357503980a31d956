//! The checkout-session endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shop_data::{DependencyTag, FetchClient, HttpTransport};

use crate::checkout::CheckoutError;
use crate::ids::PriceId;

/// A hosted checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Where to send the browser.
    #[serde(rename = "checkoutUrl")]
    pub checkout_url: String,
}

impl CheckoutSession {
    /// Create a session.
    pub fn new(checkout_url: impl Into<String>) -> Self {
        Self {
            checkout_url: checkout_url.into(),
        }
    }

    /// Reject sessions the browser cannot be redirected to.
    pub fn validate(self) -> Result<Self, CheckoutError> {
        let url = self.checkout_url.trim();
        if url.is_empty() {
            return Err(CheckoutError::InvalidSession("empty checkoutUrl".to_string()));
        }
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(CheckoutError::InvalidSession(format!(
                "checkoutUrl is not an http(s) URL: {}",
                url
            )));
        }
        Ok(Self::new(url))
    }
}

#[derive(Serialize)]
struct CreateSession<'a> {
    #[serde(rename = "priceId")]
    price_id: &'a str,
}

/// Opens checkout sessions.
#[async_trait(?Send)]
pub trait CheckoutEndpoint {
    /// Create a session for one unit of `price_id`.
    async fn create_session(&self, price_id: &PriceId) -> Result<CheckoutSession, CheckoutError>;
}

#[async_trait(?Send)]
impl<'a, E: CheckoutEndpoint + ?Sized> CheckoutEndpoint for &'a E {
    async fn create_session(&self, price_id: &PriceId) -> Result<CheckoutSession, CheckoutError> {
        (**self).create_session(price_id).await
    }
}

/// Checkout endpoint reached over HTTP.
///
/// Posts `{"priceId": ...}` and expects `{"checkoutUrl": ...}` back.
/// Never retried: a repeated POST could open a second session.
pub struct HttpCheckoutEndpoint<T: HttpTransport> {
    client: FetchClient<T>,
    endpoint: String,
}

impl<T: HttpTransport> HttpCheckoutEndpoint<T> {
    /// Create an endpoint client for an absolute URL.
    pub fn new(transport: T, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self {
            client: FetchClient::new(transport, endpoint.clone()),
            endpoint,
        }
    }

    /// Wrap an already configured fetch client.
    pub fn from_client(client: FetchClient<T>, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// The underlying fetch client.
    pub fn client(&self) -> &FetchClient<T> {
        &self.client
    }
}

#[async_trait(?Send)]
impl<T: HttpTransport> CheckoutEndpoint for HttpCheckoutEndpoint<T> {
    async fn create_session(&self, price_id: &PriceId) -> Result<CheckoutSession, CheckoutError> {
        let request = self
            .client
            .post(&self.endpoint)
            .accept("application/json")
            .json(&CreateSession {
                price_id: price_id.as_str(),
            })?
            .build()?;

        let session: CheckoutSession = self
            .client
            .fetch_json(request, DependencyTag::Checkout)
            .await?;

        session.validate()
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use serde_json::json;
    use shop_data::{FetchError, MockTransport};

    use super::*;

    fn endpoint(transport: MockTransport) -> HttpCheckoutEndpoint<MockTransport> {
        HttpCheckoutEndpoint::new(transport, "https://shop.example/api/checkout")
    }

    #[test]
    fn test_posts_price_id() {
        let endpoint = endpoint(
            MockTransport::new()
                .reply_json(200, json!({"checkoutUrl": "https://checkout.example/c/pay/cs_1"})),
        );

        let session = block_on(endpoint.create_session(&PriceId::new("price_123"))).unwrap();
        assert_eq!(session.checkout_url, "https://checkout.example/c/pay/cs_1");

        let sent = &endpoint.client().transport().requests()[0];
        assert_eq!(sent.url, "https://shop.example/api/checkout");
        assert_eq!(sent.body.as_deref(), Some(br#"{"priceId":"price_123"}"#.as_slice()));
    }

    #[test]
    fn test_error_status_is_endpoint_error() {
        let endpoint = endpoint(MockTransport::new().reply_json(500, json!({"error": "boom"})));
        let err = block_on(endpoint.create_session(&PriceId::new("price_1"))).unwrap_err();

        assert!(matches!(err, CheckoutError::Endpoint(FetchError::Http { status: 500, .. })));
        assert_eq!(endpoint.client().transport().requests().len(), 1);
    }

    #[test]
    fn test_malformed_and_empty_sessions_are_rejected() {
        let endpoint = endpoint(
            MockTransport::new()
                .reply_json(200, json!({"url": "https://x"}))
                .reply_json(200, json!({"checkoutUrl": ""}))
                .reply_json(200, json!({"checkoutUrl": "javascript:alert(1)"})),
        );

        for _ in 0..3 {
            let err = block_on(endpoint.create_session(&PriceId::new("price_1"))).unwrap_err();
            assert!(matches!(err, CheckoutError::InvalidSession(_)), "{err:?}");
        }
    }
}
