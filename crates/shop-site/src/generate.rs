//! Page generation: fetch from the commerce API, map, render.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use shop_cache::{RenderedPage, StaticPage, StaticPaths};
use shop_commerce::catalog::{CommerceApi, ListParams, PriceFormatter, ProductDetail, ProductSummary};
use shop_commerce::checkout::CheckoutState;
use shop_commerce::{CommerceError, ProductId};
use shop_pages::{render_detail, render_listing, CarouselConfig, SiteLayout};

/// Products for the listing, in API order.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub products: Vec<ProductSummary>,
    /// How long the rendered listing is served before regeneration.
    pub revalidate: Duration,
}

/// Lists every active product with its price.
///
/// Follows `has_more` with `starting_after=<last id>` until the catalog is
/// exhausted. Any failed page fails the whole pass; there is no partial
/// listing.
pub struct CatalogFetcher<'a, A: CommerceApi + ?Sized> {
    api: &'a A,
    formatter: PriceFormatter,
    page_size: u32,
    revalidate: Duration,
}

impl<'a, A: CommerceApi + ?Sized> CatalogFetcher<'a, A> {
    /// Create a fetcher.
    pub fn new(api: &'a A, formatter: PriceFormatter, revalidate: Duration) -> Self {
        Self {
            api,
            formatter,
            page_size: shop_commerce::catalog::DEFAULT_PAGE_SIZE,
            revalidate,
        }
    }

    /// Set the number of products requested per page.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Fetch and map the whole catalog.
    pub async fn fetch(&self) -> Result<Listing, CommerceError> {
        let mut params = ListParams::first(self.page_size);
        let mut products = Vec::new();

        loop {
            let page = self.api.list_products(&params).await?;
            let last = page.data.last().map(|p| p.id.clone());

            products.extend(
                page.data
                    .iter()
                    .map(|product| ProductSummary::from_product(product, &self.formatter)),
            );

            match (page.has_more, last) {
                (true, Some(last)) => params = params.after(last),
                (true, None) => {
                    tracing::warn!(fetched = products.len(), "listing page empty but has_more set");
                    break;
                }
                (false, _) => break,
            }
        }

        tracing::debug!(products = products.len(), "catalog fetched");

        Ok(Listing {
            products,
            revalidate: self.revalidate,
        })
    }
}

/// Fetches single products for their detail pages.
pub struct DetailFetcher<'a, A: CommerceApi + ?Sized> {
    api: &'a A,
    formatter: PriceFormatter,
    paths: StaticPaths,
    revalidate: Duration,
}

impl<'a, A: CommerceApi + ?Sized> DetailFetcher<'a, A> {
    /// Create a fetcher with its static allow-list.
    pub fn new(api: &'a A, formatter: PriceFormatter, paths: StaticPaths, revalidate: Duration) -> Self {
        Self {
            api,
            formatter,
            paths,
            revalidate,
        }
    }

    /// Product pages generated ahead of demand.
    pub fn static_ids(&self) -> &[String] {
        &self.paths.ids
    }

    /// The allow-list and fallback policy.
    pub fn paths(&self) -> &StaticPaths {
        &self.paths
    }

    /// How long a rendered product page is served before regeneration.
    pub fn revalidate(&self) -> Duration {
        self.revalidate
    }

    /// Fetch and map one product.
    ///
    /// An unknown product is [`CommerceError::ProductNotFound`].
    pub async fn fetch(&self, id: &ProductId) -> Result<ProductDetail, CommerceError> {
        let product = self.api.retrieve_product(id).await?;
        Ok(ProductDetail::from_product(&product, &self.formatter))
    }
}

/// Props stored with a rendered listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingProps {
    pub products: Vec<ProductSummary>,
}

/// Props stored with a rendered product page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailProps {
    pub product: ProductDetail,
}

impl DetailProps {
    /// Read the props back from a stored page.
    pub fn from_page(page: &StaticPage) -> Option<Self> {
        serde_json::from_value(page.props.clone()).ok()
    }
}

/// Renders view models into storable pages.
#[derive(Debug, Clone)]
pub struct PageRenderer {
    layout: SiteLayout,
    carousel: CarouselConfig,
}

impl PageRenderer {
    /// Create a renderer.
    pub fn new(layout: SiteLayout, carousel: CarouselConfig) -> Self {
        Self { layout, carousel }
    }

    /// The layout pages are rendered in.
    pub fn layout(&self) -> &SiteLayout {
        &self.layout
    }

    /// The listing page with its props.
    pub fn listing(&self, products: &[ProductSummary]) -> RenderedPage {
        let html = render_listing(&self.layout, products, &self.carousel);
        let props = ListingProps {
            products: products.to_vec(),
        };
        RenderedPage::new(html, serde_json::to_value(props).unwrap_or_default())
    }

    /// A product page in its idle state, with its props.
    pub fn detail(&self, product: &ProductDetail) -> RenderedPage {
        let html = self.detail_html(product, &CheckoutState::Idle);
        let props = DetailProps {
            product: product.clone(),
        };
        RenderedPage::new(html, serde_json::to_value(props).unwrap_or_default())
    }

    /// A product page for a given buy-action state. Not stored.
    pub fn detail_html(&self, product: &ProductDetail, state: &CheckoutState) -> String {
        render_detail(&self.layout, product, state)
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use shop_cache::{FallbackPolicy, RevalidatePolicy};
    use shop_commerce::catalog::{FixtureCatalog, Price, Product};
    use shop_commerce::{Currency, Locale};

    use super::*;

    fn catalog(count: usize) -> FixtureCatalog {
        FixtureCatalog::new(
            (0..count)
                .map(|i| {
                    Product::new(format!("prod_{}", i), format!("Camiseta {}", i))
                        .with_price(Price::new(format!("price_{}", i), Some(7990), "brl"))
                })
                .collect(),
        )
    }

    fn formatter() -> PriceFormatter {
        PriceFormatter::new(Locale::PtBr, Currency::BRL)
    }

    #[test]
    fn test_catalog_follows_pagination_in_order() {
        let api = catalog(5);
        let fetcher = CatalogFetcher::new(&api, formatter(), Duration::from_secs(7200)).with_page_size(2);

        let listing = block_on(fetcher.fetch()).unwrap();
        let ids: Vec<&str> = listing.products.iter().map(|p| p.id.as_str()).collect();

        assert_eq!(ids, vec!["prod_0", "prod_1", "prod_2", "prod_3", "prod_4"]);
        assert_eq!(listing.revalidate, Duration::from_secs(7200));
        assert!(listing.products.iter().all(|p| p.price == "R$\u{a0}79,90"));
    }

    #[test]
    fn test_empty_catalog() {
        let api = catalog(0);
        let listing = block_on(CatalogFetcher::new(&api, formatter(), Duration::from_secs(1)).fetch()).unwrap();
        assert!(listing.products.is_empty());
    }

    #[test]
    fn test_detail_fetch_maps_price_id() {
        let api = catalog(1);
        let fetcher = DetailFetcher::new(
            &api,
            formatter(),
            StaticPaths::new(vec!["prod_0".into()], FallbackPolicy::Blocking),
            Duration::from_secs(3600),
        );

        let detail = block_on(fetcher.fetch(&ProductId::new("prod_0"))).unwrap();
        assert_eq!(detail.default_price_id.as_ref().map(|p| p.as_str()), Some("price_0"));
        assert_eq!(fetcher.static_ids(), ["prod_0".to_string()]);

        let missing = block_on(fetcher.fetch(&ProductId::new("prod_9"))).unwrap_err();
        assert!(missing.is_not_found());
    }

    #[test]
    fn test_detail_props_survive_storage() {
        let api = catalog(1);
        let fetcher = DetailFetcher::new(&api, formatter(), StaticPaths::default(), Duration::from_secs(60));
        let detail = block_on(fetcher.fetch(&ProductId::new("prod_0"))).unwrap();

        let renderer = PageRenderer::new(SiteLayout::default(), CarouselConfig::default());
        let rendered = renderer.detail(&detail);
        let page = StaticPage::from_rendered(rendered, &RevalidatePolicy::every(Duration::from_secs(60)), 0);

        assert_eq!(DetailProps::from_page(&page).map(|p| p.product), Some(detail));
        assert!(page.html.contains("Comprar agora"));
    }

    #[test]
    fn test_listing_props_hold_summaries() {
        let renderer = PageRenderer::new(SiteLayout::default(), CarouselConfig::default());
        let api = catalog(2);
        let listing = block_on(CatalogFetcher::new(&api, formatter(), Duration::from_secs(1)).fetch()).unwrap();

        let rendered = renderer.listing(&listing.products);
        let props: ListingProps = serde_json::from_value(rendered.props).unwrap();
        assert_eq!(props.products, listing.products);
        assert_eq!(rendered.html.matches("carousel-slide product").count(), 2);
    }
}
