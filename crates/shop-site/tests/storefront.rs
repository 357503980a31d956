//! End-to-end tests for the storefront handler over in-memory fakes.

use std::cell::{Cell, RefCell};

use async_trait::async_trait;
use futures::executor::block_on;
use http::StatusCode;
use shop_cache::{FallbackPolicy, InMemoryPageStore, ManualClock, PageKey, PageStore};
use shop_commerce::catalog::{CommerceApi, FixtureCatalog, ListParams, Price, Product, ProductList};
use shop_commerce::checkout::{CheckoutEndpoint, CheckoutError, CheckoutSession};
use shop_commerce::{CommerceError, PriceId, ProductId};
use shop_core::Method;
use shop_data::FetchError;
use shop_site::{ShopConfig, ShopRequest, ShopResponse, Storefront};

const LISTED: &str = "prod_QMQ4s1QYK352Ae";
const UNLISTED: &str = "prod_explorer";

/// Fixture catalog that counts calls, can be switched off and can lose products.
struct FlakyCatalog {
    inner: FixtureCatalog,
    calls: Cell<usize>,
    down: Cell<bool>,
    removed: RefCell<Vec<String>>,
}

impl FlakyCatalog {
    fn new() -> Self {
        Self {
            inner: FixtureCatalog::new(vec![
                Product::new(LISTED, "Camiseta Beyond the Limits")
                    .with_images(vec!["https://files.example/beyond.png".to_string()])
                    .with_description("Camiseta leve")
                    .with_price(Price::new("price_1", Some(7990), "brl")),
                Product::new(UNLISTED, "Camiseta Explorer")
                    .with_price(Price::new("price_2", Some(7990), "brl")),
            ]),
            calls: Cell::new(0),
            down: Cell::new(false),
            removed: RefCell::new(Vec::new()),
        }
    }

    fn check(&self) -> Result<(), CommerceError> {
        self.calls.set(self.calls.get() + 1);
        if self.down.get() {
            Err(CommerceError::Upstream(FetchError::Connection("refused".to_string())))
        } else {
            Ok(())
        }
    }
}

#[async_trait(?Send)]
impl CommerceApi for FlakyCatalog {
    async fn list_products(&self, params: &ListParams) -> Result<ProductList, CommerceError> {
        self.check()?;
        self.inner.list_products(params).await
    }

    async fn retrieve_product(&self, id: &ProductId) -> Result<Product, CommerceError> {
        self.check()?;
        if self.removed.borrow().iter().any(|r| r == id.as_str()) {
            return Err(CommerceError::ProductNotFound(id.to_string()));
        }
        self.inner.retrieve_product(id).await
    }
}

/// Checkout endpoint that replays scripted outcomes.
#[derive(Default)]
struct ScriptedCheckout {
    outcomes: RefCell<Vec<Result<CheckoutSession, CheckoutError>>>,
    requested: RefCell<Vec<String>>,
}

impl ScriptedCheckout {
    fn then(self, outcome: Result<CheckoutSession, CheckoutError>) -> Self {
        self.outcomes.borrow_mut().push(outcome);
        self
    }
}

#[async_trait(?Send)]
impl CheckoutEndpoint for ScriptedCheckout {
    async fn create_session(&self, price_id: &PriceId) -> Result<CheckoutSession, CheckoutError> {
        self.requested.borrow_mut().push(price_id.to_string());
        let mut outcomes = self.outcomes.borrow_mut();
        if outcomes.is_empty() {
            return Err(CheckoutError::Endpoint(FetchError::Connection("no script".to_string())));
        }
        outcomes.remove(0)
    }
}

struct Harness {
    catalog: FlakyCatalog,
    checkout: ScriptedCheckout,
    store: InMemoryPageStore,
    clock: ManualClock,
    config: ShopConfig,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(ShopConfig::default())
    }

    fn with_config(config: ShopConfig) -> Self {
        Self {
            catalog: FlakyCatalog::new(),
            checkout: ScriptedCheckout::default(),
            store: InMemoryPageStore::new(),
            clock: ManualClock::at(1_700_000_000),
            config,
        }
    }

    fn send(&self, request: ShopRequest) -> ShopResponse {
        let storefront = Storefront::with_clock(
            self.config.clone(),
            &self.catalog,
            &self.checkout,
            &self.store,
            &self.clock,
        );
        block_on(storefront.handle(request))
    }

    fn get(&self, uri: &str) -> ShopResponse {
        self.send(ShopRequest::get(uri))
    }
}

#[test]
fn test_listing_is_generated_once_then_served_from_store() {
    let harness = Harness::new();

    let first = harness.get("/");
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.header("X-Shop-Cache"), Some("MISS"));
    assert_eq!(
        first.header("Cache-Control"),
        Some("public, s-maxage=7200, stale-while-revalidate")
    );

    let body = first.text();
    assert_eq!(body.matches("carousel-slide product").count(), 2);
    assert_eq!(body.matches("R$\u{a0}79,90").count(), 2);
    let beyond = body.find("Camiseta Beyond the Limits").unwrap();
    let explorer = body.find("Camiseta Explorer").unwrap();
    assert!(beyond < explorer);
    assert!(body.contains(r#"href="/product/prod_QMQ4s1QYK352Ae" data-prefetch="false""#));
    assert!(!body.contains("rel=\"prefetch\""));

    harness.clock.advance(7_199);
    let second = harness.get("/");
    assert_eq!(second.header("X-Shop-Cache"), Some("HIT"));
    assert_eq!(second.body, first.body);
    assert_eq!(harness.catalog.calls.get(), 1);
}

#[test]
fn test_stale_listing_survives_failed_regeneration() {
    let harness = Harness::new();
    let first = harness.get("/");

    harness.clock.advance(7_200);
    harness.catalog.down.set(true);

    let stale = harness.get("/");
    assert_eq!(stale.status, StatusCode::OK);
    assert_eq!(stale.header("X-Shop-Cache"), Some("STALE"));
    assert_eq!(stale.body, first.body);

    harness.catalog.down.set(false);
    let fresh = harness.get("/");
    assert_eq!(fresh.header("X-Shop-Cache"), Some("REVALIDATED"));
}

#[test]
fn test_failed_first_generation_stores_nothing() {
    let harness = Harness::new();
    harness.catalog.down.set(true);

    let response = harness.get("/");
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.header("Cache-Control"), Some("no-store"));
    assert!(harness.store.is_empty());
}

#[test]
fn test_listed_product_renders_without_loading_state() {
    let harness = Harness::new();

    let response = harness.get("/product/prod_QMQ4s1QYK352Ae");
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.header("Cache-Control"),
        Some("public, s-maxage=3600, stale-while-revalidate")
    );

    let body = response.text();
    assert!(body.contains("<h1>Camiseta Beyond the Limits</h1>"));
    assert!(body.contains(r#"alt="Camiseta leve" width="520" height="480""#));
    assert!(body.contains(">Comprar agora</button>"));
    assert!(!body.contains("Carregando produto"));
    assert!(harness.store.get(&PageKey::product(LISTED)).unwrap().is_some());
}

#[test]
fn test_blocking_fallback_waits_for_the_page() {
    let harness = Harness::new();

    let response = harness.get("/product/prod_explorer");
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("X-Shop-Cache"), Some("MISS"));
    assert!(response.text().contains("<h1>Camiseta Explorer</h1>"));
    assert!(!response.text().contains("Carregando produto"));
}

#[test]
fn test_disabled_fallback_rejects_unlisted_products() {
    let mut config = ShopConfig::default();
    config.pages.fallback = FallbackPolicy::Disabled;
    let harness = Harness::with_config(config);

    let response = harness.get("/product/prod_explorer");
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(harness.catalog.calls.get(), 0);

    let listed = harness.get("/product/prod_QMQ4s1QYK352Ae");
    assert_eq!(listed.status, StatusCode::OK);
}

#[test]
fn test_disabled_fallback_rejects_checkout_for_unlisted_products() {
    let mut config = ShopConfig::default();
    config.pages.fallback = FallbackPolicy::Disabled;
    let mut harness = Harness::with_config(config);
    harness.checkout = ScriptedCheckout::default()
        .then(Ok(CheckoutSession::new("https://checkout.example/c/pay/cs_9")));

    let response = harness.send(ShopRequest::post_form(
        "/product/prod_explorer/checkout",
        &[("priceId", "price_2")],
    ));

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(harness.catalog.calls.get(), 0);
    assert!(harness.checkout.requested.borrow().is_empty());

    let listed = harness.send(ShopRequest::post_form("/product/prod_QMQ4s1QYK352Ae/checkout", &[]));
    assert_eq!(listed.status, StatusCode::SEE_OTHER);
}

#[test]
fn test_vanished_product_is_dropped_on_regeneration() {
    let harness = Harness::new();

    let first = harness.get("/product/prod_explorer");
    assert_eq!(first.status, StatusCode::OK);
    assert!(harness.store.get(&PageKey::product(UNLISTED)).unwrap().is_some());

    harness.catalog.removed.borrow_mut().push(UNLISTED.to_string());
    harness.clock.advance(3_600);

    let gone = harness.get("/product/prod_explorer");
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.header("Cache-Control"), Some("no-store"));
    assert!(gone.text().contains("Produto não encontrado"));
    assert!(harness.store.get(&PageKey::product(UNLISTED)).unwrap().is_none());
}

#[test]
fn test_placeholder_fallback_generates_on_follow_up() {
    let mut config = ShopConfig::default();
    config.pages.fallback = FallbackPolicy::Placeholder;
    let harness = Harness::with_config(config);

    let placeholder = harness.get("/product/prod_explorer");
    assert_eq!(placeholder.status, StatusCode::OK);
    assert_eq!(placeholder.header("X-Shop-Cache"), Some("FALLBACK"));
    assert_eq!(placeholder.header("Cache-Control"), Some("no-store"));
    assert!(placeholder.text().contains("0;url=/product/prod_explorer?fallback=blocking"));
    assert_eq!(harness.catalog.calls.get(), 0);

    let generated = harness.get("/product/prod_explorer?fallback=blocking");
    assert_eq!(generated.header("X-Shop-Cache"), Some("MISS"));
    assert!(generated.text().contains("<h1>Camiseta Explorer</h1>"));

    let stored = harness.get("/product/prod_explorer");
    assert_eq!(stored.header("X-Shop-Cache"), Some("HIT"));
}

#[test]
fn test_unknown_product_is_not_stored() {
    let harness = Harness::new();

    let response = harness.get("/product/prod_missing");
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.header("Cache-Control"), Some("no-store"));
    assert!(response.text().contains("Produto não encontrado"));
    assert!(harness.store.get(&PageKey::product("prod_missing")).unwrap().is_none());
}

#[test]
fn test_buy_redirects_to_checkout() {
    let mut harness = Harness::new();
    harness.checkout = ScriptedCheckout::default()
        .then(Ok(CheckoutSession::new("https://checkout.example/c/pay/cs_1")));

    let response = harness.send(ShopRequest::post_form(
        "/product/prod_QMQ4s1QYK352Ae/checkout",
        &[("priceId", "price_1")],
    ));

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.header("Location"), Some("https://checkout.example/c/pay/cs_1"));
    assert_eq!(*harness.checkout.requested.borrow(), vec!["price_1".to_string()]);
}

#[test]
fn test_failed_buy_rerenders_with_message_and_can_retry() {
    let mut harness = Harness::new();
    harness.checkout = ScriptedCheckout::default()
        .then(Err(CheckoutError::InvalidSession("empty checkoutUrl".to_string())))
        .then(Ok(CheckoutSession::new("https://checkout.example/c/pay/cs_2")));

    harness.get("/product/prod_QMQ4s1QYK352Ae");
    let calls_after_render = harness.catalog.calls.get();

    let failed = harness.send(ShopRequest::post_form(
        "/product/prod_QMQ4s1QYK352Ae/checkout",
        &[("priceId", "price_1")],
    ));
    assert_eq!(failed.status, StatusCode::OK);
    assert_eq!(failed.header("Cache-Control"), Some("no-store"));
    let body = failed.text();
    assert!(body.contains("Falha ao redirecionar para o checkout. Tente novamente."));
    assert!(body.contains(">Comprar agora</button>"));
    assert_eq!(harness.catalog.calls.get(), calls_after_render);

    let retried = harness.send(ShopRequest::post_form(
        "/product/prod_QMQ4s1QYK352Ae/checkout",
        &[("priceId", "price_1")],
    ));
    assert_eq!(retried.status, StatusCode::SEE_OTHER);
    assert_eq!(harness.checkout.requested.borrow().len(), 2);
}

#[test]
fn test_buy_without_price_field_uses_default_price() {
    let mut harness = Harness::new();
    harness.checkout = ScriptedCheckout::default()
        .then(Ok(CheckoutSession::new("https://checkout.example/c/pay/cs_3")));

    let response = harness.send(ShopRequest::post_form("/product/prod_explorer/checkout", &[]));
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(*harness.checkout.requested.borrow(), vec!["price_2".to_string()]);
}

#[test]
fn test_buy_rejects_a_price_from_another_product() {
    let mut harness = Harness::new();
    harness.checkout = ScriptedCheckout::default()
        .then(Ok(CheckoutSession::new("https://checkout.example/c/pay/cs_4")));

    let response = harness.send(ShopRequest::post_form(
        "/product/prod_QMQ4s1QYK352Ae/checkout",
        &[("priceId", "price_2")],
    ));

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.header("Cache-Control"), Some("no-store"));
    assert!(response.header("Location").is_none());
    assert!(response.text().contains("Falha ao redirecionar para o checkout. Tente novamente."));
    assert!(harness.checkout.requested.borrow().is_empty());
}

#[test]
fn test_routing_errors() {
    let harness = Harness::new();

    assert_eq!(harness.get("/cart").status, StatusCode::NOT_FOUND);
    assert_eq!(harness.get("/product/bad%20id").status, StatusCode::NOT_FOUND);

    let wrong = harness.get("/product/prod_1/checkout");
    assert_eq!(wrong.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(wrong.header("Allow"), Some("POST"));

    let post = harness.send(ShopRequest::new(Method::Post, "/"));
    assert_eq!(post.header("Allow"), Some("GET, HEAD"));
}

#[test]
fn test_request_id_is_echoed() {
    let harness = Harness::new();

    let response = harness.send(ShopRequest::get("/").with_header("x-request-id", "upstream-42"));
    assert_eq!(response.header("X-Request-Id"), Some("upstream-42"));

    let generated = harness.get("/cart");
    assert!(generated.header("X-Request-Id").is_some_and(|id| !id.is_empty()));
}

#[test]
fn test_head_and_conditional_requests() {
    let harness = Harness::new();
    let first = harness.get("/");
    let etag = first.header("ETag").unwrap().to_string();

    let head = harness.send(ShopRequest::new(Method::Head, "/"));
    assert_eq!(head.status, StatusCode::OK);
    assert!(head.body.is_empty());

    let conditional = harness.send(ShopRequest::get("/").with_header("If-None-Match", etag));
    assert_eq!(conditional.status, StatusCode::NOT_MODIFIED);
    assert!(conditional.body.is_empty());
}
