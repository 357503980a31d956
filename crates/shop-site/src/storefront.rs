//! Storefront request handling.
//!
//! One [`Storefront`] answers every route:
//! - `GET /` serves the listing from the page store
//! - `GET /product/{id}` serves a product page, applying the static
//!   allow-list and its fallback policy
//! - `POST /product/{id}/checkout` runs the buy action and redirects to
//!   the hosted checkout, or re-renders the product page with the failure

use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::time::{Duration, Instant};

use http::StatusCode;
use shop_cache::header_names::X_REQUEST_ID;
use shop_cache::{
    CacheStatus, Clock, FallbackPolicy, IncrementalCache, Lookup, PageHeadersBuilder, PageKey,
    PageStore, PathDecision, RevalidatePolicy, ServedPage, StaticPaths, SystemClock,
};
use shop_commerce::catalog::{CommerceApi, PriceFormatter, ProductDetail};
use shop_commerce::checkout::{
    CheckoutEndpoint, CheckoutInitiator, CheckoutState, RecordingNavigator,
};
use shop_commerce::{CommerceError, PriceId, ProductId};
use shop_core::{parse_query, Method, RequestContext, RequestId, Route, RouteError};
use shop_observability::{MetricsCollector, StructuredLogger};
use shop_pages::{render_error, render_not_found, render_placeholder, FOLLOW_UP_PARAM};

use crate::config::ShopConfig;
use crate::generate::{CatalogFetcher, DetailFetcher, DetailProps, PageRenderer};

const HTML: &str = "text/html; charset=utf-8";

/// An incoming request, independent of the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopRequest {
    pub method: Method,
    /// Path with optional query string.
    pub uri: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ShopRequest {
    /// Create a request without headers or body.
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// A `GET` request.
    pub fn get(uri: impl Into<String>) -> Self {
        Self::new(Method::Get, uri)
    }

    /// A `POST` of an url-encoded form.
    pub fn post_form(uri: impl Into<String>, fields: &[(&str, &str)]) -> Self {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", shop_data::percent_encode(k), shop_data::percent_encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        Self::new(Method::Post, uri)
            .with_header("Content-Type", "application/x-www-form-urlencoded")
            .with_body(body.into_bytes())
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the body.
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }
}

/// A response ready to be handed to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopResponse {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ShopResponse {
    /// An empty response.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// An HTML response.
    pub fn html(status: StatusCode, html: impl Into<String>) -> Self {
        Self::new(status)
            .with_header("Content-Type", HTML)
            .with_body(html.into().into_bytes())
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add several headers.
    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body as text.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Duration and error of the generation pass run for a request, if any.
type GenerationRecord = RefCell<Option<(Duration, Option<String>)>>;

/// The storefront: routes, page store and buy action.
pub struct Storefront<A, E, S, C = SystemClock>
where
    A: CommerceApi,
    E: CheckoutEndpoint,
    S: PageStore,
    C: Clock,
{
    config: ShopConfig,
    catalog: A,
    checkout: E,
    cache: IncrementalCache<S, C>,
    renderer: PageRenderer,
    formatter: PriceFormatter,
    paths: StaticPaths,
    listing_policy: RevalidatePolicy,
    detail_policy: RevalidatePolicy,
    failure_message: String,
}

impl<A, E, S> Storefront<A, E, S>
where
    A: CommerceApi,
    E: CheckoutEndpoint,
    S: PageStore,
{
    /// Create a storefront using wall-clock time.
    pub fn new(config: ShopConfig, catalog: A, checkout: E, store: S) -> Self {
        Self::with_clock(config, catalog, checkout, store, SystemClock)
    }
}

impl<A, E, S, C> Storefront<A, E, S, C>
where
    A: CommerceApi,
    E: CheckoutEndpoint,
    S: PageStore,
    C: Clock,
{
    /// Create a storefront with an explicit clock.
    pub fn with_clock(config: ShopConfig, catalog: A, checkout: E, store: S, clock: C) -> Self {
        Self {
            renderer: PageRenderer::new(config.layout(), config.carousel.clone()),
            formatter: config.formatter(),
            paths: config.static_paths(),
            listing_policy: config.listing_policy(),
            detail_policy: config.detail_policy(),
            failure_message: config.checkout_failure_message(),
            cache: IncrementalCache::with_clock(store, clock),
            config,
            catalog,
            checkout,
        }
    }

    /// The configuration the storefront was built from.
    pub fn config(&self) -> &ShopConfig {
        &self.config
    }

    /// The page store.
    pub fn cache(&self) -> &IncrementalCache<S, C> {
        &self.cache
    }

    /// Fetcher for the listing.
    pub fn catalog_fetcher(&self) -> CatalogFetcher<'_, A> {
        CatalogFetcher::new(&self.catalog, self.formatter, self.listing_policy.revalidate)
            .with_page_size(self.config.commerce.page_size)
    }

    /// Fetcher for product pages.
    pub fn detail_fetcher(&self) -> DetailFetcher<'_, A> {
        DetailFetcher::new(
            &self.catalog,
            self.formatter,
            self.paths.clone(),
            self.detail_policy.revalidate,
        )
    }

    /// Answer one request.
    pub async fn handle(&self, request: ShopRequest) -> ShopResponse {
        let mut ctx = RequestContext::new(request.method, request.uri);
        for (name, value) in request.headers {
            ctx = ctx.with_header(name, value);
        }
        let upstream_id = ctx
            .header(X_REQUEST_ID)
            .filter(|id| shop_core::is_valid_id(id))
            .map(RequestId::from_string);
        if let Some(id) = upstream_id {
            ctx = ctx.with_request_id(id);
        }

        let logger = StructuredLogger::new(ctx.request_id.clone())
            .with_component("storefront")
            .with_route(&ctx.path)
            .with_min_level(self.config.log_level())
            .with_format(self.config.log_format());
        let mut metrics = MetricsCollector::new(ctx.request_id.clone());
        metrics.set_route(&ctx.path);

        let mut response = match Route::resolve(ctx.method, &ctx.path) {
            Ok(Route::Listing) => self.listing(&ctx, &logger, &mut metrics).await,
            Ok(Route::Product { id }) => self.product(&id, &ctx, &logger, &mut metrics).await,
            Ok(Route::Checkout { id }) => {
                self.buy(&id, &request.body, &logger, &mut metrics).await
            }
            Err(RouteError::NotFound(_)) => self.not_found(&mut metrics),
            Err(RouteError::MethodNotAllowed { .. }) => {
                metrics.set_cache_status(CacheStatus::Bypass.to_string());
                ShopResponse::new(StatusCode::METHOD_NOT_ALLOWED)
                    .with_header("Allow", allowed_methods(&ctx.path))
                    .with_headers(PageHeadersBuilder::no_store().build())
            }
        };

        if ctx.method == Method::Head {
            response.body.clear();
        }
        response
            .headers
            .push((X_REQUEST_ID.to_string(), ctx.request_id.to_string()));

        let summary = metrics.finalize(Some(response.status.as_u16()));
        logger
            .info_builder("request completed")
            .field("method", ctx.method.as_str())
            .field_i64("status", i64::from(response.status.as_u16()))
            .field("cache", summary.cache_status.clone().unwrap_or_else(|| "-".to_string()))
            .duration_ms("duration_ms", ctx.timing.elapsed())
            .emit();
        logger.debug(&summary.to_summary());

        response
    }

    async fn listing(
        &self,
        ctx: &RequestContext,
        logger: &StructuredLogger,
        metrics: &mut MetricsCollector,
    ) -> ShopResponse {
        let key = PageKey::listing();
        let record = GenerationRecord::default();

        let served = self
            .cache
            .serve(&key, &self.listing_policy, || async {
                let started = Instant::now();
                let result = self
                    .catalog_fetcher()
                    .fetch()
                    .await
                    .map(|listing| self.renderer.listing(&listing.products));
                *record.borrow_mut() = Some((started.elapsed(), error_text(&result)));
                result
            })
            .await;

        record_generation(metrics, &key, record);

        match served {
            Ok(served) => self.page_response(ctx, &served, &self.listing_policy, metrics),
            Err(e) => {
                logger
                    .error_builder("listing generation failed")
                    .field("error", e.to_string())
                    .emit();
                self.error_page(metrics)
            }
        }
    }

    async fn product(
        &self,
        id: &str,
        ctx: &RequestContext,
        logger: &StructuredLogger,
        metrics: &mut MetricsCollector,
    ) -> ShopResponse {
        let key = PageKey::product(id);
        let follow_up = ctx.query_param(FOLLOW_UP_PARAM) == Some(FallbackPolicy::Blocking.as_str());
        let stored = self.paths.fallback == FallbackPolicy::Placeholder
            && !self.paths.contains(id)
            && !matches!(self.cache.lookup(&key), Lookup::Missing);

        match self.paths.decide(id, stored, follow_up) {
            PathDecision::Serve => {}
            PathDecision::NotFound => {
                logger
                    .debug_builder("product not on the static list")
                    .field("product_id", id)
                    .emit();
                return self.not_found(metrics);
            }
            PathDecision::Placeholder => {
                metrics.set_cache_status(CacheStatus::Fallback.to_string());
                let html = render_placeholder(self.renderer.layout(), id);
                return ShopResponse::html(StatusCode::OK, html).with_headers(
                    PageHeadersBuilder::no_store()
                        .status(CacheStatus::Fallback)
                        .build(),
                );
            }
        }

        let product_id = ProductId::new(id);
        let gone = Cell::new(false);
        let record = GenerationRecord::default();

        let served = self
            .cache
            .serve(&key, &self.detail_policy, || async {
                let started = Instant::now();
                let result = self
                    .detail_fetcher()
                    .fetch(&product_id)
                    .await
                    .map(|detail| self.renderer.detail(&detail));
                if result.as_ref().is_err_and(CommerceError::is_not_found) {
                    gone.set(true);
                }
                *record.borrow_mut() = Some((started.elapsed(), error_text(&result)));
                result
            })
            .await;

        record_generation(metrics, &key, record);

        match served {
            Ok(_) if gone.get() => {
                logger
                    .info_builder("stored product no longer exists")
                    .field("product_id", id)
                    .emit();
                self.cache.invalidate(&key);
                self.not_found(metrics)
            }
            Ok(served) => self.page_response(ctx, &served, &self.detail_policy, metrics),
            Err(e) if e.is_not_found() => self.not_found(metrics),
            Err(e) => {
                logger
                    .error_builder("product page generation failed")
                    .field("product_id", id)
                    .field("error", e.to_string())
                    .emit();
                self.error_page(metrics)
            }
        }
    }

    async fn buy(
        &self,
        id: &str,
        body: &[u8],
        logger: &StructuredLogger,
        metrics: &mut MetricsCollector,
    ) -> ShopResponse {
        metrics.set_cache_status(CacheStatus::Bypass.to_string());

        // A product whose page cannot be served cannot be bought either.
        if self.paths.decide(id, true, true) == PathDecision::NotFound {
            logger
                .debug_builder("checkout for product not on the static list")
                .field("product_id", id)
                .emit();
            return self.not_found(metrics);
        }

        let detail = match self.checkout_product(id).await {
            Ok(detail) => detail,
            Err(e) if e.is_not_found() => return self.not_found(metrics),
            Err(e) => {
                logger
                    .error_builder("product lookup for checkout failed")
                    .field("product_id", id)
                    .field("error", e.to_string())
                    .emit();
                return self.error_page(metrics);
            }
        };

        let form = parse_query(&String::from_utf8_lossy(body));
        let price_id = match checkout_price(detail.default_price_id.as_ref(), form.get("priceId")) {
            Ok(price_id) => price_id,
            Err(requested) => {
                logger
                    .warn_builder("checkout price does not belong to product")
                    .field("product_id", id)
                    .field("price_id", requested)
                    .emit();
                let state = CheckoutState::Failed {
                    message: self.failure_message.clone(),
                };
                return ShopResponse::html(StatusCode::BAD_REQUEST, self.renderer.detail_html(&detail, &state))
                    .with_headers(PageHeadersBuilder::no_store().build());
            }
        };

        let mut initiator =
            CheckoutInitiator::new(&self.checkout).with_failure_message(self.failure_message.clone());
        let mut navigator = RecordingNavigator::new();
        let started = Instant::now();

        let state = match initiator.buy(&price_id, &mut navigator).await {
            Ok(state) => state.clone(),
            Err(e) => {
                logger
                    .warn_builder("checkout rejected")
                    .field("price_id", price_id.as_str())
                    .field("error", e.to_string())
                    .emit();
                CheckoutState::Failed {
                    message: self.failure_message.clone(),
                }
            }
        };
        metrics.record_checkout(price_id.as_str(), started.elapsed(), navigator.location().is_some());

        if let (CheckoutState::Redirecting { .. }, Some(location)) = (&state, navigator.location()) {
            logger
                .info_builder("redirecting to checkout")
                .field("price_id", price_id.as_str())
                .emit();
            return ShopResponse::new(StatusCode::SEE_OTHER)
                .with_header("Location", location)
                .with_headers(PageHeadersBuilder::no_store().build());
        }

        logger
            .warn_builder("checkout failed")
            .field("price_id", price_id.as_str())
            .field("state", state.name())
            .emit();
        ShopResponse::html(StatusCode::OK, self.renderer.detail_html(&detail, &state))
            .with_headers(PageHeadersBuilder::no_store().build())
    }

    /// The product a buy action is for: from the stored page when there
    /// is one, otherwise fetched without storing.
    async fn checkout_product(&self, id: &str) -> Result<ProductDetail, CommerceError> {
        let stored = match self.cache.lookup(&PageKey::product(id)) {
            Lookup::Fresh(page) | Lookup::Stale(page) => DetailProps::from_page(&page),
            Lookup::Missing => None,
        };

        match stored {
            Some(props) => Ok(props.product),
            None => self.detail_fetcher().fetch(&ProductId::new(id)).await,
        }
    }

    fn page_response(
        &self,
        ctx: &RequestContext,
        served: &ServedPage,
        policy: &RevalidatePolicy,
        metrics: &mut MetricsCollector,
    ) -> ShopResponse {
        metrics.set_cache_status(served.status.to_string());
        let headers =
            PageHeadersBuilder::for_page(&served.page, served.status, policy, self.cache.clock().now_secs())
                .build();

        let not_modified = ctx
            .header("If-None-Match")
            .is_some_and(|value| served.page.matches_etag(value));
        if not_modified {
            return ShopResponse::new(StatusCode::NOT_MODIFIED).with_headers(headers);
        }

        ShopResponse::html(StatusCode::OK, served.page.html.clone()).with_headers(headers)
    }

    fn not_found(&self, metrics: &mut MetricsCollector) -> ShopResponse {
        metrics.set_cache_status(CacheStatus::Bypass.to_string());
        ShopResponse::html(StatusCode::NOT_FOUND, render_not_found(self.renderer.layout()))
            .with_headers(PageHeadersBuilder::no_store().build())
    }

    fn error_page(&self, metrics: &mut MetricsCollector) -> ShopResponse {
        metrics.set_cache_status(CacheStatus::Bypass.to_string());
        ShopResponse::html(StatusCode::BAD_GATEWAY, render_error(self.renderer.layout()))
            .with_headers(PageHeadersBuilder::no_store().build())
    }
}

/// The price a buy action checks out: always the product's own.
///
/// A submitted `priceId` naming a different price is returned as `Err`.
/// A product without a price yields an empty id, which the initiator rejects.
fn checkout_price(product_price: Option<&PriceId>, submitted: Option<&String>) -> Result<PriceId, String> {
    let submitted = submitted.map(|p| p.trim()).filter(|p| !p.is_empty());

    match (product_price, submitted) {
        (Some(own), Some(requested)) if own.as_str() != requested => Err(requested.to_string()),
        (None, Some(requested)) => Err(requested.to_string()),
        (Some(own), _) => Ok(own.clone()),
        (None, None) => Ok(PriceId::new("")),
    }
}

fn error_text<T>(result: &Result<T, CommerceError>) -> Option<String> {
    result.as_ref().err().map(ToString::to_string)
}

fn record_generation(metrics: &mut MetricsCollector, key: &PageKey, record: GenerationRecord) {
    if let Some((duration, error)) = record.into_inner() {
        metrics.record_generation(key.as_str(), duration, error);
    }
}

/// `Allow` header for a path whose route exists under another method.
fn allowed_methods(path: &str) -> &'static str {
    Route::resolve(Method::Get, path)
        .or_else(|_| Route::resolve(Method::Post, path))
        .map(|route| route.allow_header())
        .unwrap_or("GET, HEAD")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_methods() {
        assert_eq!(allowed_methods("/"), "GET, HEAD");
        assert_eq!(allowed_methods("/product/prod_1"), "GET, HEAD");
        assert_eq!(allowed_methods("/product/prod_1/checkout"), "POST");
    }

    #[test]
    fn test_form_request_encoding() {
        let request = ShopRequest::post_form("/product/p/checkout", &[("priceId", "price 1&x")]);
        assert_eq!(request.body, b"priceId=price%201%26x".to_vec());
        let form = parse_query(&String::from_utf8_lossy(&request.body));
        assert_eq!(form.get("priceId").map(String::as_str), Some("price 1&x"));
    }

    #[test]
    fn test_checkout_price_is_the_products_own() {
        let own = PriceId::new("price_1");
        let same = "price_1".to_string();
        let other = "price_9".to_string();
        let blank = "  ".to_string();

        assert_eq!(checkout_price(Some(&own), None), Ok(own.clone()));
        assert_eq!(checkout_price(Some(&own), Some(&same)), Ok(own.clone()));
        assert_eq!(checkout_price(Some(&own), Some(&blank)), Ok(own.clone()));
        assert_eq!(checkout_price(Some(&own), Some(&other)), Err("price_9".to_string()));
        assert_eq!(checkout_price(None, Some(&other)), Err("price_9".to_string()));
        assert_eq!(checkout_price(None, None), Ok(PriceId::new("")));
    }

    #[test]
    fn test_response_header_lookup() {
        let response = ShopResponse::html(StatusCode::OK, "<p>hi</p>");
        assert_eq!(response.header("content-type"), Some(HTML));
        assert_eq!(response.text(), "<p>hi</p>");
    }
}
