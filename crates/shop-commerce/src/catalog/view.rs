//! View models the pages are rendered from.

use crate::catalog::{Price, Product};
use crate::ids::{PriceId, ProductId};
use crate::money::{Currency, Locale, Money};
use serde::{Deserialize, Serialize};

/// Turns API prices into display strings.
///
/// By default every amount is read as hundredths of the store currency,
/// whatever code the price carries. A product without a price, or a price
/// without an amount, is shown as zero.
///
/// [`PriceFormatter::with_price_currency`] switches to each price's own
/// currency and decimal places; unknown codes then use the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PriceFormatter {
    /// Locale the price is rendered in.
    pub locale: Locale,
    /// Currency every price is shown in.
    pub currency: Currency,
    /// Honor the currency code on each price instead.
    pub use_price_currency: bool,
}

impl PriceFormatter {
    /// Create a formatter that shows every price in `currency`.
    pub fn new(locale: Locale, currency: Currency) -> Self {
        Self {
            locale,
            currency,
            use_price_currency: false,
        }
    }

    /// Show each price in its own currency.
    pub fn with_price_currency(mut self, enabled: bool) -> Self {
        self.use_price_currency = enabled;
        self
    }

    /// The amount a price represents.
    pub fn money(&self, price: Option<&Price>) -> Money {
        let Some(price) = price else {
            return Money::zero(self.currency);
        };
        let amount = price.unit_amount.unwrap_or(0);

        if self.use_price_currency {
            let currency = Currency::from_code(&price.currency).unwrap_or_else(|| {
                tracing::warn!(currency = %price.currency, price = %price.id, "unsupported currency");
                self.currency
            });
            return Money::new(amount, currency);
        }

        Money::new(from_hundredths(amount, self.currency), self.currency)
    }

    /// Format a price for display.
    pub fn format(&self, price: Option<&Price>) -> String {
        self.money(price).format(self.locale)
    }
}

/// Express `amount / 100` in the minor units of `currency`, rounding half away from zero.
fn from_hundredths(amount: i64, currency: Currency) -> i64 {
    match currency.decimal_places() {
        2 => amount,
        places => {
            let scaled = i128::from(amount) * 10i128.pow(places);
            let rounded = (scaled + scaled.signum() * 50) / 100;
            i64::try_from(rounded).unwrap_or(if amount < 0 { i64::MIN } else { i64::MAX })
        }
    }
}

/// A product as shown in the listing carousel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub title: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    /// Localized, formatted price.
    pub price: String,
}

impl ProductSummary {
    /// Map an API product.
    pub fn from_product(product: &Product, formatter: &PriceFormatter) -> Self {
        Self {
            id: product.id.clone(),
            title: product.name.clone(),
            image_url: product.primary_image().map(str::to_string),
            description: product.description.clone(),
            price: formatter.format(product.price()),
        }
    }
}

/// A product as shown on its detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub id: ProductId,
    pub title: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    /// Localized, formatted price.
    pub price: String,
    /// Price posted to the checkout endpoint. `None` means the product
    /// cannot be bought.
    pub default_price_id: Option<PriceId>,
}

impl ProductDetail {
    /// Map an API product.
    pub fn from_product(product: &Product, formatter: &PriceFormatter) -> Self {
        let summary = ProductSummary::from_product(product, formatter);
        Self {
            id: summary.id,
            title: summary.title,
            image_url: summary.image_url,
            description: summary.description,
            price: summary.price,
            default_price_id: product.default_price_id(),
        }
    }

    /// Whether the buy action can be offered.
    pub fn is_purchasable(&self) -> bool {
        self.default_price_id.as_ref().is_some_and(|id| id.is_valid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(amount: Option<i64>) -> Product {
        Product::new("prod_1", "Camiseta")
            .with_images(vec!["https://img.example/1.png".into(), "https://img.example/2.png".into()])
            .with_description("Algodão")
            .with_price(Price::new("price_123", amount, "brl"))
    }

    #[test]
    fn test_summary_mapping() {
        let formatter = PriceFormatter::new(Locale::PtBr, Currency::BRL);
        let summary = ProductSummary::from_product(&product(Some(7990)), &formatter);

        assert_eq!(summary.title, "Camiseta");
        assert_eq!(summary.image_url.as_deref(), Some("https://img.example/1.png"));
        assert_eq!(summary.description.as_deref(), Some("Algodão"));
        assert_eq!(summary.price, "R$\u{a0}79,90");
    }

    #[test]
    fn test_missing_amount_formats_as_zero() {
        let formatter = PriceFormatter::default();
        assert_eq!(
            ProductSummary::from_product(&product(None), &formatter).price,
            "R$\u{a0}0,00"
        );

        let bare = Product::new("prod_2", "Caneca");
        assert_eq!(ProductSummary::from_product(&bare, &formatter).price, "R$\u{a0}0,00");
    }

    #[test]
    fn test_price_codes_do_not_change_the_store_currency() {
        let formatter = PriceFormatter::new(Locale::PtBr, Currency::BRL);
        for code in ["brl", "usd", "jpy", "xts"] {
            let p = Product::new("prod_3", "Pin").with_price(Price::new("price_3", Some(7990), code));
            assert_eq!(formatter.format(p.price()), "R$\u{a0}79,90", "code {}", code);
        }
    }

    #[test]
    fn test_zero_decimal_store_currency_reads_hundredths() {
        let formatter = PriceFormatter::new(Locale::EnUs, Currency::JPY);
        let p = Product::new("prod_4", "Pin").with_price(Price::new("price_4", Some(7950), "brl"));
        assert_eq!(formatter.format(p.price()), "\u{a5}80");
    }

    #[test]
    fn test_price_currency_mode() {
        let formatter = PriceFormatter::new(Locale::EnUs, Currency::USD).with_price_currency(true);
        let yen = Product::new("prod_5", "Pin").with_price(Price::new("price_5", Some(1500), "jpy"));
        assert_eq!(formatter.format(yen.price()), "\u{a5}1,500");

        let unknown = Product::new("prod_6", "Pin").with_price(Price::new("price_6", Some(250), "xts"));
        assert_eq!(formatter.format(unknown.price()), "$2.50");
    }

    #[test]
    fn test_detail_carries_price_id() {
        let formatter = PriceFormatter::default();
        let detail = ProductDetail::from_product(&product(Some(7990)), &formatter);
        assert_eq!(detail.default_price_id, Some(PriceId::new("price_123")));
        assert!(detail.is_purchasable());

        let bare = ProductDetail::from_product(&Product::new("prod_2", "Caneca"), &formatter);
        assert!(!bare.is_purchasable());
    }
}
