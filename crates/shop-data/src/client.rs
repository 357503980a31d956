//! Fetch client with dependency tagging and retries.

use serde::de::DeserializeOwned;
use shop_core::{Method, RequestId};

use crate::dependency::DependencyTag;
use crate::request::{OutboundRequest, RequestBuilder};
use crate::retry::RetryPolicy;
use crate::transport::HttpTransport;
use crate::{FetchError, Response};

/// Fetch client bound to one upstream base URL.
///
/// Every request carries the client's default headers and, when set, the
/// inbound request ID as `X-Request-Id`. Retries follow the policy of the
/// dependency tag passed to [`FetchClient::send`].
pub struct FetchClient<T: HttpTransport> {
    transport: T,
    base_url: String,
    default_headers: Vec<(String, String)>,
    request_id: Option<RequestId>,
}

impl<T: HttpTransport> FetchClient<T> {
    /// Create a new client. A trailing slash on `base_url` is ignored.
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            default_headers: Vec::new(),
            request_id: None,
        }
    }

    /// Add a header sent with every request.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((key.into(), value.into()));
        self
    }

    /// Send a bearer token with every request.
    pub fn with_bearer_auth(self, token: impl AsRef<str>) -> Self {
        let value = format!("Bearer {}", token.as_ref());
        self.with_header("Authorization", value)
    }

    /// Propagate the inbound request ID.
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// The base URL requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolve a path against the base URL. Absolute URLs pass through.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Start a request with the client's defaults applied.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = RequestBuilder::new(method, self.url(path));
        for (key, value) in &self.default_headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(id) = &self.request_id {
            builder = builder.header("X-Request-Id", id.as_str());
        }
        builder
    }

    /// Start a GET request.
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::Get, path)
    }

    /// Start a POST request.
    pub fn post(&self, path: &str) -> RequestBuilder {
        self.request(Method::Post, path)
    }

    /// Send with the tag's default retry policy.
    ///
    /// Non-2xx responses that are not retried become [`FetchError::Http`].
    pub async fn send(
        &self,
        request: OutboundRequest,
        tag: DependencyTag,
    ) -> Result<Response, FetchError> {
        self.send_with_policy(request, tag, &tag.default_retry_policy())
            .await
    }

    /// Send with an explicit retry policy.
    pub async fn send_with_policy(
        &self,
        request: OutboundRequest,
        tag: DependencyTag,
        policy: &RetryPolicy,
    ) -> Result<Response, FetchError> {
        let url = request.url.clone();
        let mut attempt = 0;

        loop {
            tracing::debug!(
                dependency = %tag,
                method = %request.method,
                url = %url,
                attempt,
                "outbound request"
            );

            match self.transport.send(request.clone()).await {
                Ok(resp) if resp.is_success() => return Ok(resp),
                Ok(resp) => {
                    if !policy.should_retry_status(resp.status, attempt) {
                        return resp.error_for_status(&url);
                    }
                    tracing::warn!(
                        dependency = %tag,
                        status = resp.status,
                        attempt,
                        "retrying after upstream status"
                    );
                }
                Err(FetchError::Connection(message)) => {
                    if !policy.should_retry_connection(attempt) {
                        return Err(FetchError::Connection(message));
                    }
                    tracing::warn!(
                        dependency = %tag,
                        error = %message,
                        attempt,
                        "retrying after connection error"
                    );
                }
                Err(e) => return Err(e),
            }

            self.transport.pause(policy.delay(attempt));
            attempt += 1;
        }
    }

    /// Send and decode a JSON body.
    pub async fn fetch_json<D: DeserializeOwned>(
        &self,
        request: OutboundRequest,
        tag: DependencyTag,
    ) -> Result<D, FetchError> {
        self.send(request, tag).await?.json()
    }
}
