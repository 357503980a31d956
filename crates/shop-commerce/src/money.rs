//! Money type and localized price formatting.
//!
//! Amounts are integers in the currency's smallest unit, exactly as the
//! commerce API reports them. Formatting divides by the currency's minor
//! unit and renders the result the way the browser's `Intl.NumberFormat`
//! would for the chosen locale.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum Currency {
    #[default]
    BRL,
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
    MXN,
}

impl Currency {
    /// Get the currency code (e.g., "BRL").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::BRL => "BRL",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CAD => "CAD",
            Currency::MXN => "MXN",
        }
    }

    /// Get the currency symbol as written in `locale`.
    pub fn symbol(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Currency::BRL, _) => "R$",
            (Currency::USD, Locale::EnUs) => "$",
            (Currency::USD, Locale::PtBr) => "US$",
            (Currency::EUR, _) => "\u{20ac}",
            (Currency::GBP, _) => "\u{00a3}",
            (Currency::JPY, Locale::EnUs) => "\u{00a5}",
            (Currency::JPY, Locale::PtBr) => "JP\u{00a5}",
            (Currency::CAD, _) => "CA$",
            (Currency::MXN, _) => "MX$",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Parse a currency code (case-insensitive; the commerce API sends lowercase).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "BRL" => Some(Currency::BRL),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "JPY" => Some(Currency::JPY),
            "CAD" => Some(Currency::CAD),
            "MXN" => Some(Currency::MXN),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl TryFrom<String> for Currency {
    type Error = String;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Currency::from_code(&code).ok_or_else(|| format!("unsupported currency: {}", code))
    }
}

impl From<Currency> for String {
    fn from(c: Currency) -> Self {
        c.code().to_string()
    }
}

/// Display locale for prices and page copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum Locale {
    /// Brazilian Portuguese: `R$ 1.234,56` (non-breaking space).
    #[default]
    PtBr,
    /// US English: `$1,234.56`.
    EnUs,
}

impl Locale {
    /// BCP 47 tag (e.g., "pt-BR").
    pub fn tag(&self) -> &'static str {
        match self {
            Locale::PtBr => "pt-BR",
            Locale::EnUs => "en-US",
        }
    }

    /// Parse a locale tag. `_` and `-` separators are both accepted.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.replace('_', "-").to_ascii_lowercase().as_str() {
            "pt-br" | "pt" => Some(Locale::PtBr),
            "en-us" | "en" => Some(Locale::EnUs),
            _ => None,
        }
    }

    fn group_separator(&self) -> char {
        match self {
            Locale::PtBr => '.',
            Locale::EnUs => ',',
        }
    }

    fn decimal_separator(&self) -> char {
        match self {
            Locale::PtBr => ',',
            Locale::EnUs => '.',
        }
    }

    fn symbol_separator(&self) -> &'static str {
        match self {
            Locale::PtBr => "\u{a0}",
            Locale::EnUs => "",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl TryFrom<String> for Locale {
    type Error = String;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        Locale::parse(&tag).ok_or_else(|| format!("unsupported locale: {}", tag))
    }
}

impl From<Locale> for String {
    fn from(l: Locale) -> Self {
        l.tag().to_string()
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in the smallest unit of the currency (e.g., centavos for BRL).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in smallest currency unit.
    pub amount_minor: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(amount_minor: i64, currency: Currency) -> Self {
        Self {
            amount_minor,
            currency,
        }
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }

    /// Format for display in `locale`.
    ///
    /// ```
    /// use shop_commerce::{Currency, Locale, Money};
    /// assert_eq!(Money::new(123456, Currency::USD).format(Locale::EnUs), "$1,234.56");
    /// assert_eq!(Money::new(123456, Currency::BRL).format(Locale::PtBr), "R$\u{a0}1.234,56");
    /// ```
    pub fn format(&self, locale: Locale) -> String {
        let places = self.currency.decimal_places();
        let divisor = 10u64.pow(places);
        let abs = self.amount_minor.unsigned_abs();

        let mut number = group_digits(abs / divisor, locale.group_separator());
        if places > 0 {
            number.push(locale.decimal_separator());
            number.push_str(&format!("{:0width$}", abs % divisor, width = places as usize));
        }

        let sign = if self.amount_minor < 0 { "-" } else { "" };
        format!(
            "{}{}{}{}",
            sign,
            self.currency.symbol(locale),
            locale.symbol_separator(),
            number
        )
    }

    /// Format as a display string in US English (e.g., "$49.99").
    pub fn display(&self) -> String {
        self.format(Locale::EnUs)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

fn group_digits(mut value: u64, separator: char) -> String {
    let mut groups = Vec::new();
    loop {
        let group = value % 1000;
        value /= 1000;
        if value == 0 {
            groups.push(group.to_string());
            break;
        }
        groups.push(format!("{:03}", group));
    }
    groups.reverse();
    groups.join(&separator.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brl_in_pt_br() {
        assert_eq!(Money::new(7990, Currency::BRL).format(Locale::PtBr), "R$\u{a0}79,90");
        assert_eq!(Money::new(123456, Currency::BRL).format(Locale::PtBr), "R$\u{a0}1.234,56");
        assert_eq!(Money::new(5, Currency::BRL).format(Locale::PtBr), "R$\u{a0}0,05");
    }

    #[test]
    fn test_usd_in_en_us() {
        assert_eq!(Money::new(123456, Currency::USD).format(Locale::EnUs), "$1,234.56");
        assert_eq!(Money::new(4999, Currency::USD).display(), "$49.99");
        assert_eq!(Money::new(100_000_000, Currency::USD).display(), "$1,000,000.00");
    }

    #[test]
    fn test_zero_and_negative() {
        assert_eq!(Money::zero(Currency::BRL).format(Locale::PtBr), "R$\u{a0}0,00");
        assert_eq!(Money::new(-7990, Currency::BRL).format(Locale::PtBr), "-R$\u{a0}79,90");
        assert_eq!(Money::new(-1, Currency::USD).display(), "-$0.01");
    }

    #[test]
    fn test_zero_decimal_currency() {
        assert_eq!(Money::new(1500, Currency::JPY).format(Locale::EnUs), "\u{a5}1,500");
        assert_eq!(Money::new(1500, Currency::JPY).format(Locale::PtBr), "JP\u{a5}\u{a0}1.500");
    }

    #[test]
    fn test_foreign_currency_symbols() {
        assert_eq!(Money::new(1000, Currency::USD).format(Locale::PtBr), "US$\u{a0}10,00");
        assert_eq!(Money::new(1000, Currency::BRL).format(Locale::EnUs), "R$10.00");
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("brl"), Some(Currency::BRL));
        assert_eq!(Currency::from_code("USD"), Some(Currency::USD));
        assert_eq!(Currency::from_code("XYZ"), None);
    }

    #[test]
    fn test_locale_parse_and_serde() {
        assert_eq!(Locale::parse("pt_BR"), Some(Locale::PtBr));
        assert_eq!(Locale::parse("en-us"), Some(Locale::EnUs));
        assert_eq!(Locale::parse("fr-FR"), None);

        let json = serde_json::to_string(&Locale::PtBr).unwrap();
        assert_eq!(json, r#""pt-BR""#);
        let currency: Currency = serde_json::from_str(r#""usd""#).unwrap();
        assert_eq!(currency, Currency::USD);
        assert!(serde_json::from_str::<Currency>(r#""zzz""#).is_err());
    }
}
