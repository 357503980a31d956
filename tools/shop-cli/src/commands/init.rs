//! Write a default configuration file.

use anyhow::{Context as _, Result};
use dialoguer::Confirm;
use shop_site::ShopConfig;

use super::InitArgs;
use crate::context::Context;

/// Run the init command.
pub async fn run(args: InitArgs, ctx: &Context) -> Result<()> {
    let path = ctx.resolve_path(&args.path);

    ctx.output.header("Initializing storefront config");

    if path.exists() && !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("{} exists. Overwrite?", path.display()))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Init cancelled");
            return Ok(());
        }
    }

    let config = ShopConfig::default();
    config
        .save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    ctx.output.success(&format!("Created: {}", path.display()));
    ctx.output.info("");
    ctx.output.info("Next steps:");
    ctx.output.list_item("set commerce.secret_key (or the commerce_secret_key Spin variable)");
    ctx.output.list_item("shop config validate");
    ctx.output.list_item("spin up  # to serve the storefront locally");

    Ok(())
}
