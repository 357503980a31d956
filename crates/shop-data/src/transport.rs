//! The seam between the fetch client and the host runtime.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use shop_core::Method;

use crate::{FetchError, OutboundRequest, Response};

/// Sends built requests.
///
/// Spin futures are not `Send`, so neither is this trait.
#[async_trait(?Send)]
pub trait HttpTransport {
    /// Send one request and return the raw response.
    ///
    /// Non-2xx responses are returned as `Ok`; only failures to reach the
    /// upstream are errors.
    async fn send(&self, request: OutboundRequest) -> Result<Response, FetchError>;

    /// Wait between retry attempts.
    fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Transport backed by Spin's outbound HTTP.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpinTransport;

impl SpinTransport {
    fn spin_method(method: Method) -> spin_sdk::http::Method {
        use spin_sdk::http::Method as SpinMethod;

        match method {
            Method::Get => SpinMethod::Get,
            Method::Head => SpinMethod::Head,
            Method::Post => SpinMethod::Post,
            Method::Put => SpinMethod::Put,
            Method::Delete => SpinMethod::Delete,
            Method::Patch => SpinMethod::Patch,
            Method::Options => SpinMethod::Options,
        }
    }
}

#[async_trait(?Send)]
impl HttpTransport for SpinTransport {
    async fn send(&self, request: OutboundRequest) -> Result<Response, FetchError> {
        let mut builder = spin_sdk::http::Request::builder();
        builder
            .method(Self::spin_method(request.method))
            .uri(request.url.as_str());

        for (key, value) in &request.headers {
            builder.header(key.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            builder.body(body);
        }

        let resp: spin_sdk::http::Response = spin_sdk::http::send(builder.build())
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        let status = *resp.status();
        let headers: HashMap<String, String> = resp
            .headers()
            .filter_map(|(k, v)| v.as_str().map(|v| (k.to_string(), v.to_string())))
            .collect();

        Ok(Response::new(status, headers, resp.into_body()))
    }
}

/// Scripted transport for tests and offline tooling.
///
/// Replies are handed out in order; every request is recorded. Running out
/// of replies is reported as a connection error.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: std::cell::RefCell<std::collections::VecDeque<Result<Response, FetchError>>>,
    requests: std::cell::RefCell<Vec<OutboundRequest>>,
    pauses: std::cell::RefCell<Vec<Duration>>,
}

impl MockTransport {
    /// Create a transport with no scripted replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply.
    pub fn reply(self, reply: Result<Response, FetchError>) -> Self {
        self.replies.borrow_mut().push_back(reply);
        self
    }

    /// Queue a JSON reply with the given status.
    pub fn reply_json(self, status: u16, body: serde_json::Value) -> Self {
        self.reply(Ok(Response::json_body(status, &body)))
    }

    /// Requests sent so far.
    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.borrow().clone()
    }

    /// Backoff pauses taken so far.
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.borrow().clone()
    }
}

#[async_trait(?Send)]
impl HttpTransport for MockTransport {
    async fn send(&self, request: OutboundRequest) -> Result<Response, FetchError> {
        self.requests.borrow_mut().push(request);
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Connection("no scripted reply".to_string())))
    }

    fn pause(&self, duration: Duration) {
        self.pauses.borrow_mut().push(duration);
    }
}
