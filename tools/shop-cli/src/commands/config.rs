//! Configuration commands.

use anyhow::{bail, Result};
use shop_site::ShopConfig;

use super::{ConfigArgs, ConfigCommand};
use crate::context::Context;
use crate::output::format_duration;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Get { key } => get_config(&key, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    let config = redacted(&ctx.config);

    if ctx.output.is_json() {
        ctx.output.json(&config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    ctx.output.info("");
    ctx.output.info("[site]");
    ctx.output.kv("name", &config.site.name);
    ctx.output.kv("logo_url", &config.site.logo_url);
    ctx.output.kv("locale", config.site.locale.tag());
    ctx.output.kv("currency", config.site.currency.code());

    ctx.output.info("");
    ctx.output.info("[commerce]");
    ctx.output.kv("api_base", &config.commerce.api_base);
    ctx.output.kv("secret_key", &config.commerce.secret_key);
    ctx.output.kv("page_size", &config.commerce.page_size.to_string());

    ctx.output.info("");
    ctx.output.info("[checkout]");
    ctx.output.kv("endpoint", &config.checkout.endpoint);
    ctx.output.kv("failure_message", &ctx.config.checkout_failure_message());

    ctx.output.info("");
    ctx.output.info("[pages]");
    ctx.output.kv(
        "listing_revalidate",
        &format_duration(config.pages.listing_revalidate_secs),
    );
    ctx.output.kv(
        "detail_revalidate",
        &format_duration(config.pages.detail_revalidate_secs),
    );
    ctx.output.kv("fallback", config.pages.fallback.as_str());
    ctx.output.kv("static_product_ids", "");
    for id in &config.pages.static_product_ids {
        ctx.output.list_item(id);
    }

    ctx.output.info("");
    ctx.output.info("[logging]");
    ctx.output.kv("level", &config.logging.level);
    ctx.output.kv("format", &config.logging.format);

    Ok(())
}

async fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&redacted(&ctx.config), key)?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        match value {
            serde_json::Value::String(s) => println!("{}", s),
            other => println!("{}", other),
        }
    }

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let mut warnings: Vec<String> = Vec::new();
    if ctx.config.pages.static_product_ids.is_empty() {
        warnings.push("pages.static_product_ids is empty; every product page is generated on demand".to_string());
    }
    if ctx.config.checkout.endpoint.starts_with("http://") {
        warnings.push("checkout.endpoint is not https".to_string());
    }

    for warning in &warnings {
        ctx.output.warn(warning);
    }

    ctx.config.validate()?;

    ctx.output.success("Configuration is valid");
    Ok(())
}

/// A copy of the config safe to print.
fn redacted(config: &ShopConfig) -> ShopConfig {
    let mut config = config.clone();
    if !config.commerce.secret_key.is_empty() {
        config.commerce.secret_key = mask(&config.commerce.secret_key);
    }
    config
}

fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(8).collect();
    format!("{}…", visible)
}

/// Look up a dotted key in the serialized config.
fn get_config_value(config: &ShopConfig, key: &str) -> Result<serde_json::Value> {
    let mut value = serde_json::to_value(config)?;

    for part in key.split('.') {
        value = match value {
            serde_json::Value::Object(mut map) => match map.remove(part) {
                Some(v) => v,
                None => bail!("Unknown config key: {}", key),
            },
            _ => bail!("Unknown config key: {}", key),
        };
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_nested_value() {
        let config = ShopConfig::default();
        assert_eq!(
            get_config_value(&config, "pages.detail_revalidate_secs").unwrap(),
            serde_json::json!(3600)
        );
        assert_eq!(
            get_config_value(&config, "site.locale").unwrap(),
            serde_json::json!("pt-BR")
        );
        assert!(get_config_value(&config, "pages.nope").is_err());
        assert!(get_config_value(&config, "site.name.first").is_err());
    }

    #[test]
    fn test_secret_is_masked() {
        let mut config = ShopConfig::default();
        config.commerce.secret_key = "sk_test_51abcdefghijkl".to_string();

        let shown = redacted(&config);
        assert_eq!(shown.commerce.secret_key, "sk_test_…");
    }
}
