//! Format an amount the way storefront pages do.

use anyhow::{bail, Result};
use shop_commerce::{Currency, Locale, Money};

use super::PriceArgs;
use crate::context::Context;

/// Run the price command.
pub async fn run(args: PriceArgs, ctx: &Context) -> Result<()> {
    let formatted = format_price(args.amount, &args.currency, &args.locale)?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "amount": args.amount,
            "currency": args.currency.to_ascii_uppercase(),
            "formatted": formatted,
        }));
    } else {
        println!("{}", formatted);
    }

    Ok(())
}

fn format_price(amount: i64, currency: &str, locale: &str) -> Result<String> {
    let Some(currency) = Currency::from_code(currency) else {
        bail!("Unsupported currency: {}", currency);
    };
    let Some(locale) = Locale::parse(locale) else {
        bail!("Unsupported locale: {}. Available: pt-BR, en-US", locale);
    };

    Ok(Money::new(amount, currency).format(locale))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brl_in_portuguese() {
        assert_eq!(format_price(7990, "brl", "pt-BR").unwrap(), "R$\u{a0}79,90");
    }

    #[test]
    fn test_unknown_inputs_are_rejected() {
        assert!(format_price(100, "XYZ", "pt-BR").is_err());
        assert!(format_price(100, "BRL", "fr-FR").is_err());
    }
}
