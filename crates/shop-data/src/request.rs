//! Outbound request construction.

use serde::Serialize;
use shop_core::Method;

use crate::FetchError;

/// A fully built outbound request, handed to an [`HttpTransport`](crate::HttpTransport).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl OutboundRequest {
    /// Get a header value (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A builder for constructing outbound requests.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: String,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl RequestBuilder {
    /// Create a new request builder.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Set a header, replacing any previous value with the same name.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&key));
        self.headers.push((key, value.into()));
        self
    }

    /// Append a query string to the URL.
    pub fn query(mut self, query: &QueryString) -> Self {
        if !query.is_empty() {
            let sep = if self.url.contains('?') { '&' } else { '?' };
            self.url = format!("{}{}{}", self.url, sep, query.encode());
        }
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: Serialize>(self, value: &T) -> Result<Self, FetchError> {
        let json = serde_json::to_vec(value)?;
        let mut builder = self.header("Content-Type", "application/json");
        builder.body = Some(json);
        Ok(builder)
    }

    /// Add a bearer token authorization header.
    pub fn bearer_auth(self, token: impl AsRef<str>) -> Self {
        self.header("Authorization", format!("Bearer {}", token.as_ref()))
    }

    /// Set the Accept header.
    pub fn accept(self, content_type: impl Into<String>) -> Self {
        self.header("Accept", content_type)
    }

    /// Finish the request.
    pub fn build(self) -> Result<OutboundRequest, FetchError> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(FetchError::InvalidRequest(format!(
                "URL must be absolute: {}",
                self.url
            )));
        }

        Ok(OutboundRequest {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        })
    }
}

/// Ordered, percent-encoded query string.
///
/// Order is kept because repeated keys such as `expand[]` are meaningful.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    pairs: Vec<(String, String)>,
}

impl QueryString {
    /// Create an empty query string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key/value pair.
    pub fn push(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    /// Append a pair only when the value is present.
    pub fn push_opt(self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => self.push(key, v),
            None => self,
        }
    }

    /// Whether no pairs were added.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Encode as `k=v&k=v`.
    pub fn encode(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for b in input.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}
