//! Storefront Spin component.
//!
//! Builds the site configuration from Spin variables, then answers every
//! request through [`Storefront`] with:
//! - the commerce API over Spin outbound HTTP
//! - the checkout-session endpoint over Spin outbound HTTP
//! - generated pages kept in the default key-value store

use anyhow::{anyhow, Context, Result};
use futures::SinkExt;
use http::StatusCode;
use spin_sdk::http::{Fields, IncomingRequest, OutgoingResponse, ResponseOutparam};
use spin_sdk::http_component;

use shop_cache::KvPageStore;
use shop_commerce::catalog::StripeCatalog;
use shop_commerce::checkout::HttpCheckoutEndpoint;
use shop_core::{Method, RequestId};
use shop_data::SpinTransport;
use shop_observability::StructuredLogger;
use shop_site::{ShopConfig, ShopRequest, ShopResponse, Storefront};

/// Main HTTP handler.
#[http_component]
async fn handle_storefront(req: IncomingRequest, response_out: ResponseOutparam) {
    let logger = StructuredLogger::new(RequestId::generate()).with_component("storefront");

    let response = match serve(req).await {
        Ok(response) => response,
        Err(e) => {
            logger
                .error_builder("request failed")
                .field("error", format!("{:#}", e))
                .emit();
            ShopResponse::new(StatusCode::INTERNAL_SERVER_ERROR)
        }
    };

    if let Err(e) = write_response(response, response_out).await {
        logger
            .error_builder("failed to write response")
            .field("error", format!("{:#}", e))
            .emit();
    }
}

async fn serve(req: IncomingRequest) -> Result<ShopResponse> {
    let Some(method) = to_method(&req.method()) else {
        return Ok(ShopResponse::new(StatusCode::METHOD_NOT_ALLOWED).with_header("Allow", "GET, HEAD, POST"));
    };

    let config = load_config()?;
    let uri = req.path_with_query().unwrap_or_else(|| "/".to_string());
    let headers = req
        .headers()
        .entries()
        .into_iter()
        .map(|(name, value)| (name, String::from_utf8_lossy(&value).into_owned()))
        .collect();
    let body = req
        .into_body()
        .await
        .map_err(|e| anyhow!("failed to read request body: {}", e))?;

    let store = KvPageStore::open_default().context("failed to open page store")?;
    let catalog = StripeCatalog::new(SpinTransport, &config.commerce.api_base, &config.commerce.secret_key);
    let checkout = HttpCheckoutEndpoint::new(SpinTransport, &config.checkout.endpoint);
    let storefront = Storefront::new(config, catalog, checkout, store);

    let request = ShopRequest {
        method,
        uri,
        headers,
        body,
    };
    Ok(storefront.handle(request).await)
}

/// Defaults overridden by Spin variables, then validated.
fn load_config() -> Result<ShopConfig> {
    let mut config = ShopConfig::default();
    config.apply_overrides(|name| spin_sdk::variables::get(name).ok())?;
    config.validate()?;
    Ok(config)
}

fn to_method(method: &spin_sdk::http::Method) -> Option<Method> {
    use spin_sdk::http::Method as SpinMethod;

    match method {
        SpinMethod::Get => Some(Method::Get),
        SpinMethod::Head => Some(Method::Head),
        SpinMethod::Post => Some(Method::Post),
        SpinMethod::Put => Some(Method::Put),
        SpinMethod::Delete => Some(Method::Delete),
        SpinMethod::Patch => Some(Method::Patch),
        SpinMethod::Options => Some(Method::Options),
        _ => None,
    }
}

async fn write_response(response: ShopResponse, response_out: ResponseOutparam) -> Result<()> {
    let header_list: Vec<(String, Vec<u8>)> = response
        .headers
        .into_iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value.into_bytes()))
        .collect();

    let headers =
        Fields::from_list(&header_list).map_err(|e| anyhow!("invalid response headers: {:?}", e))?;
    let outgoing = OutgoingResponse::new(headers);
    outgoing
        .set_status_code(response.status.as_u16())
        .map_err(|()| anyhow!("invalid status code {}", response.status))?;

    let mut body = outgoing.take_body();
    response_out.set(outgoing);

    if !response.body.is_empty() {
        body.send(response.body)
            .await
            .map_err(|e| anyhow!("failed to stream body: {}", e))?;
    }

    Ok(())
}
