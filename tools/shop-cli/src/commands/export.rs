//! Render the storefront to static files from a catalog fixture.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context as _, Result};
use chrono::Utc;
use serde::Serialize;
use shop_cache::{generate_etag, PageKey};
use shop_commerce::catalog::FixtureCatalog;
use shop_commerce::ProductId;
use shop_site::{CatalogFetcher, DetailFetcher, PageRenderer, ShopConfig};

use super::ExportArgs;
use crate::context::Context;
use crate::output::format_bytes;

/// Index of an export run, written as `manifest.json`.
#[derive(Debug, Serialize)]
pub struct ExportManifest {
    pub generated_at: String,
    pub site: String,
    pub pages: Vec<ExportedPage>,
}

/// One written page.
#[derive(Debug, Serialize)]
pub struct ExportedPage {
    /// Request path the page answers.
    pub path: String,
    /// File relative to the output directory.
    pub file: String,
    pub bytes: u64,
    pub etag: String,
    /// Seconds the page may be served before regeneration.
    pub revalidate: u64,
}

/// Run the export command.
pub async fn run(args: ExportArgs, ctx: &Context) -> Result<()> {
    let config = &ctx.config;
    config.validate_rendering()?;

    let catalog_path = ctx.resolve_path(&args.catalog);
    let fixture = std::fs::read_to_string(&catalog_path)
        .with_context(|| format!("Failed to read {}", catalog_path.display()))?;
    let catalog = FixtureCatalog::from_json(&fixture)
        .with_context(|| format!("Invalid catalog fixture {}", catalog_path.display()))?;

    let out_dir = ctx.resolve_path(&args.out);

    ctx.output.header(&format!("Exporting {}", config.site.name));
    ctx.output.kv("catalog", &catalog_path.display().to_string());
    ctx.output.kv("output", &out_dir.display().to_string());

    ctx.output.step(1, 3, "Fetching catalog");
    let spinner = ctx.output.spinner("listing products");
    let listing = CatalogFetcher::new(
        &catalog,
        config.formatter(),
        Duration::from_secs(config.pages.listing_revalidate_secs),
    )
    .with_page_size(config.commerce.page_size)
    .fetch()
    .await;
    spinner.finish_and_clear();
    let listing = listing?;
    ctx.output.debug(&format!("{} products listed", listing.products.len()));

    let ids = product_ids(config, &listing.products, args.static_only);

    ctx.output.step(2, 3, "Rendering pages");
    let renderer = PageRenderer::new(config.layout(), config.carousel.clone());
    let details = DetailFetcher::new(
        &catalog,
        config.formatter(),
        config.static_paths(),
        Duration::from_secs(config.pages.detail_revalidate_secs),
    );

    let mut pages = Vec::with_capacity(ids.len() + 1);
    let rendered = renderer.listing(&listing.products);
    pages.push(write_page(
        &out_dir,
        &PageKey::listing(),
        &rendered.html,
        listing.revalidate.as_secs(),
    )?);

    let pb = ctx.output.progress(ids.len() as u64, "product pages");
    for id in &ids {
        pb.set_message(id.clone());
        match details.fetch(&ProductId::new(id.as_str())).await {
            Ok(product) => {
                let rendered = renderer.detail(&product);
                pages.push(write_page(
                    &out_dir,
                    &PageKey::product(id),
                    &rendered.html,
                    details.revalidate().as_secs(),
                )?);
            }
            Err(e) if e.is_not_found() => {
                ctx.output.warn(&format!("Skipping {}: not in catalog", id));
            }
            Err(e) => return Err(e.into()),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    ctx.output.step(3, 3, "Writing manifest");
    let manifest = ExportManifest {
        generated_at: Utc::now().to_rfc3339(),
        site: config.site.name.clone(),
        pages,
    };
    let manifest_path = out_dir.join("manifest.json");
    std::fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)
        .with_context(|| format!("Failed to write {}", manifest_path.display()))?;

    if ctx.output.is_json() {
        ctx.output.json(&manifest);
        return Ok(());
    }

    let total: u64 = manifest.pages.iter().map(|p| p.bytes).sum();
    for page in &manifest.pages {
        ctx.output.list_item(&format!("{} ({})", page.path, format_bytes(page.bytes)));
    }
    ctx.output.success(&format!(
        "Exported {} pages ({})",
        manifest.pages.len(),
        format_bytes(total)
    ));

    Ok(())
}

/// Product pages to export: every listed product, or only the allow-list.
fn product_ids(
    config: &ShopConfig,
    products: &[shop_commerce::catalog::ProductSummary],
    static_only: bool,
) -> Vec<String> {
    if static_only {
        return config.pages.static_product_ids.clone();
    }

    let mut ids: Vec<String> = products.iter().map(|p| p.id.as_str().to_string()).collect();
    for id in &config.pages.static_product_ids {
        if !ids.contains(id) {
            ids.push(id.clone());
        }
    }
    ids
}

/// File an exported page is written to, relative to the output directory.
fn page_file(key: &PageKey) -> PathBuf {
    let path = key.path().trim_matches('/');
    if path.is_empty() {
        PathBuf::from("index.html")
    } else {
        Path::new(path).join("index.html")
    }
}

fn write_page(out_dir: &Path, key: &PageKey, html: &str, revalidate: u64) -> Result<ExportedPage> {
    let file = page_file(key);
    let target = out_dir.join(&file);

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&target, html).with_context(|| format!("Failed to write {}", target.display()))?;

    Ok(ExportedPage {
        path: key.path().to_string(),
        file: file.to_string_lossy().replace('\\', "/"),
        bytes: html.len() as u64,
        etag: generate_etag(html),
        revalidate,
    })
}
