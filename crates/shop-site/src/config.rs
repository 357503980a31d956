//! Storefront configuration.
//!
//! Loaded from `shop.toml` (or a `.json` file) by tooling, and built from
//! Spin variables by the component. Every field has a default, so an
//! empty file is a valid starting point; [`ShopConfig::validate`] decides
//! whether it is complete enough to serve traffic.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shop_cache::{FallbackPolicy, RevalidatePolicy, StaticPaths};
use shop_commerce::catalog::PriceFormatter;
use shop_commerce::{Currency, Locale};
use shop_observability::{LogFormat, LogLevel};
use shop_pages::{CarouselConfig, SiteLayout};

use crate::error::SiteError;

/// Product page generated ahead of demand when nothing else is configured.
pub const DEFAULT_STATIC_PRODUCT: &str = "prod_QMQ4s1QYK352Ae";

/// Storefront configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopConfig {
    /// Store identity and presentation.
    #[serde(default)]
    pub site: SiteConfig,

    /// Commerce API access.
    #[serde(default)]
    pub commerce: CommerceConfig,

    /// Checkout-session endpoint.
    #[serde(default)]
    pub checkout: CheckoutConfig,

    /// Page generation.
    #[serde(default)]
    pub pages: PagesConfig,

    /// Listing carousel layout.
    #[serde(default)]
    pub carousel: CarouselConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Store identity and presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Store name.
    #[serde(default = "default_site_name")]
    pub name: String,

    /// Logo shown in the header.
    #[serde(default = "default_logo_url")]
    pub logo_url: String,

    /// Language of copy and prices.
    #[serde(default)]
    pub locale: Locale,

    /// Currency prices are shown in. Amounts are read as hundredths of it.
    #[serde(default)]
    pub currency: Currency,

    /// Show each price in the currency the commerce API reports for it.
    #[serde(default)]
    pub price_currency_from_api: bool,
}

fn default_site_name() -> String {
    "Ignite Shop".to_string()
}

fn default_logo_url() -> String {
    "/static/logo.svg".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            logo_url: default_logo_url(),
            locale: Locale::default(),
            currency: Currency::default(),
            price_currency_from_api: false,
        }
    }
}

/// Commerce API access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommerceConfig {
    /// API base URL.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Secret API key, sent as a bearer token.
    #[serde(default)]
    pub secret_key: String,

    /// Products requested per listing page (1-100).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_api_base() -> String {
    "https://api.stripe.com/v1".to_string()
}

fn default_page_size() -> u32 {
    shop_commerce::catalog::DEFAULT_PAGE_SIZE
}

impl Default for CommerceConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            secret_key: String::new(),
            page_size: default_page_size(),
        }
    }
}

/// Checkout-session endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Absolute URL the buy action posts `{"priceId"}` to.
    #[serde(default = "default_checkout_endpoint")]
    pub endpoint: String,

    /// Message shown after a failed attempt. Defaults to the locale's copy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,
}

fn default_checkout_endpoint() -> String {
    "http://127.0.0.1:3000/api/checkout".to_string()
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            endpoint: default_checkout_endpoint(),
            failure_message: None,
        }
    }
}

/// Page generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagesConfig {
    /// Seconds a generated listing is served before regeneration.
    #[serde(default = "default_listing_revalidate")]
    pub listing_revalidate_secs: u64,

    /// Seconds a generated product page is served before regeneration.
    #[serde(default = "default_detail_revalidate")]
    pub detail_revalidate_secs: u64,

    /// Product pages generated ahead of demand.
    #[serde(default = "default_static_product_ids")]
    pub static_product_ids: Vec<String>,

    /// How product pages outside `static_product_ids` are answered.
    #[serde(default)]
    pub fallback: FallbackPolicy,
}

fn default_listing_revalidate() -> u64 {
    2 * 60 * 60
}

fn default_detail_revalidate() -> u64 {
    60 * 60
}

fn default_static_product_ids() -> Vec<String> {
    vec![DEFAULT_STATIC_PRODUCT.to_string()]
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            listing_revalidate_secs: default_listing_revalidate(),
            detail_revalidate_secs: default_detail_revalidate(),
            static_product_ids: default_static_product_ids(),
            fallback: FallbackPolicy::default(),
        }
    }
}

/// Log output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `json` or `human`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Spin variables the component reads, in the order they are applied.
pub const VARIABLES: &[&str] = &[
    "commerce_api_base",
    "commerce_secret_key",
    "checkout_endpoint",
    "static_product_ids",
    "fallback",
    "locale",
    "currency",
    "site_name",
    "logo_url",
    "log_level",
    "log_format",
];

impl ShopConfig {
    /// Load config from a file. `.json` files are JSON, anything else TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SiteError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SiteError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed = if is_json(path) {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        } else {
            toml::from_str(&content).map_err(|e| e.to_string())
        };

        parsed.map_err(|message| SiteError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Save config to a file, in the format its extension names.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SiteError> {
        let path = path.as_ref();
        let content = if is_json(path) {
            serde_json::to_string_pretty(self).map_err(|e| SiteError::Serialize(e.to_string()))?
        } else {
            self.to_toml()?
        };

        std::fs::write(path, content).map_err(|source| SiteError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, SiteError> {
        toml::from_str(content).map_err(|e| SiteError::Parse {
            path: "<inline>".into(),
            message: e.to_string(),
        })
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, SiteError> {
        toml::to_string_pretty(self).map_err(|e| SiteError::Serialize(e.to_string()))
    }

    /// Override fields from named variables (see [`VARIABLES`]).
    ///
    /// `lookup` returns `None` for unset variables; blank values are
    /// treated as unset.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), SiteError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let bad = |name: &str, value: &str| SiteError::Variable {
            name: name.to_string(),
            value: value.to_string(),
        };

        if let Some(v) = get("commerce_api_base") {
            self.commerce.api_base = v.trim().to_string();
        }
        if let Some(v) = get("commerce_secret_key") {
            self.commerce.secret_key = v.trim().to_string();
        }
        if let Some(v) = get("checkout_endpoint") {
            self.checkout.endpoint = v.trim().to_string();
        }
        if let Some(v) = get("static_product_ids") {
            self.pages.static_product_ids = v
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(v) = get("fallback") {
            self.pages.fallback = FallbackPolicy::parse(&v).ok_or_else(|| bad("fallback", &v))?;
        }
        if let Some(v) = get("locale") {
            self.site.locale = Locale::parse(&v).ok_or_else(|| bad("locale", &v))?;
        }
        if let Some(v) = get("currency") {
            self.site.currency = Currency::from_code(&v).ok_or_else(|| bad("currency", &v))?;
        }
        if let Some(v) = get("site_name") {
            self.site.name = v;
        }
        if let Some(v) = get("logo_url") {
            self.site.logo_url = v;
        }
        if let Some(v) = get("log_level") {
            LogLevel::parse(&v).ok_or_else(|| bad("log_level", &v))?;
            self.logging.level = v;
        }
        if let Some(v) = get("log_format") {
            LogFormat::parse(&v).ok_or_else(|| bad("log_format", &v))?;
            self.logging.format = v;
        }

        Ok(())
    }

    /// Check everything needed to render pages.
    pub fn validate_rendering(&self) -> Result<(), SiteError> {
        if self.pages.listing_revalidate_secs == 0 {
            return Err(SiteError::invalid(
                "pages.listing_revalidate_secs",
                "must be greater than zero",
            ));
        }
        if self.pages.detail_revalidate_secs == 0 {
            return Err(SiteError::invalid(
                "pages.detail_revalidate_secs",
                "must be greater than zero",
            ));
        }
        if let Some(id) = self
            .pages
            .static_product_ids
            .iter()
            .find(|id| !shop_core::is_valid_id(id))
        {
            return Err(SiteError::invalid(
                "pages.static_product_ids",
                format!("not a valid product id: {:?}", id),
            ));
        }
        self.carousel
            .validate()
            .map_err(|reason| SiteError::invalid("carousel", reason))?;
        if LogLevel::parse(&self.logging.level).is_none() {
            return Err(SiteError::invalid(
                "logging.level",
                format!("unknown level {:?}", self.logging.level),
            ));
        }
        if LogFormat::parse(&self.logging.format).is_none() {
            return Err(SiteError::invalid(
                "logging.format",
                format!("unknown format {:?}", self.logging.format),
            ));
        }
        Ok(())
    }

    /// Check the whole config, including the external endpoints.
    pub fn validate(&self) -> Result<(), SiteError> {
        self.validate_rendering()?;

        if !is_http_url(&self.commerce.api_base) {
            return Err(SiteError::invalid(
                "commerce.api_base",
                "must be an http(s) URL",
            ));
        }
        if self.commerce.secret_key.trim().is_empty() {
            return Err(SiteError::invalid("commerce.secret_key", "must not be empty"));
        }
        if self.commerce.page_size == 0 || self.commerce.page_size > default_page_size() {
            return Err(SiteError::invalid(
                "commerce.page_size",
                format!("must be between 1 and {}", default_page_size()),
            ));
        }
        if !is_http_url(&self.checkout.endpoint) {
            return Err(SiteError::invalid(
                "checkout.endpoint",
                "must be an http(s) URL",
            ));
        }
        Ok(())
    }

    /// Layout for every page.
    pub fn layout(&self) -> SiteLayout {
        SiteLayout::new(&self.site.name, &self.site.logo_url, self.site.locale)
    }

    /// Price formatter for the configured locale and currency.
    pub fn formatter(&self) -> PriceFormatter {
        PriceFormatter::new(self.site.locale, self.site.currency)
            .with_price_currency(self.site.price_currency_from_api)
    }

    /// Revalidation policy for the listing.
    pub fn listing_policy(&self) -> RevalidatePolicy {
        RevalidatePolicy::every(Duration::from_secs(self.pages.listing_revalidate_secs))
    }

    /// Revalidation policy for product pages.
    pub fn detail_policy(&self) -> RevalidatePolicy {
        RevalidatePolicy::every(Duration::from_secs(self.pages.detail_revalidate_secs))
    }

    /// Static allow-list of product pages.
    pub fn static_paths(&self) -> StaticPaths {
        StaticPaths::new(self.pages.static_product_ids.clone(), self.pages.fallback)
    }

    /// Message shown after a failed checkout attempt.
    pub fn checkout_failure_message(&self) -> String {
        self.checkout
            .failure_message
            .clone()
            .unwrap_or_else(|| self.layout().copy().checkout_failed.to_string())
    }

    /// Minimum log level, `info` if unparseable.
    pub fn log_level(&self) -> LogLevel {
        LogLevel::parse(&self.logging.level).unwrap_or(LogLevel::Info)
    }

    /// Log format, JSON if unparseable.
    pub fn log_format(&self) -> LogFormat {
        LogFormat::parse(&self.logging.format).unwrap_or_default()
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn is_http_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    rest.is_some_and(|host| !host.is_empty())
}
