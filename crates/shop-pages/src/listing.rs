//! Product carousel at `/`.

use serde::{Deserialize, Serialize};
use shop_commerce::catalog::ProductSummary;

use crate::escape::escape_html;
use crate::layout::SiteLayout;

/// Items per page from a viewport width upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub min_width_px: u32,
    pub per_page: u32,
}

/// Carousel layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Items per page below the first breakpoint.
    pub per_page: u32,
    /// Gap between slides.
    pub spacing_px: u32,
    /// Wider viewports, any order.
    pub breakpoints: Vec<Breakpoint>,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            per_page: 1,
            spacing_px: 48,
            breakpoints: vec![
                Breakpoint { min_width_px: 768, per_page: 2 },
                Breakpoint { min_width_px: 1200, per_page: 3 },
            ],
        }
    }
}

/// Most items a carousel page may show.
pub const MAX_PER_PAGE: u32 = 24;

/// Widest gap between slides.
pub const MAX_SPACING_PX: u32 = 512;

impl CarouselConfig {
    /// Check that every page holds 1 to [`MAX_PER_PAGE`] items and the gap
    /// is at most [`MAX_SPACING_PX`].
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_PER_PAGE).contains(&self.per_page) {
            return Err(format!("carousel.per_page must be 1-{}", MAX_PER_PAGE));
        }
        if self.spacing_px > MAX_SPACING_PX {
            return Err(format!("carousel.spacing_px must be at most {}", MAX_SPACING_PX));
        }
        if let Some(bp) = self
            .breakpoints
            .iter()
            .find(|bp| !(1..=MAX_PER_PAGE).contains(&bp.per_page))
        {
            return Err(format!(
                "carousel breakpoint at {}px must show 1-{} items",
                bp.min_width_px, MAX_PER_PAGE
            ));
        }
        Ok(())
    }

    /// Breakpoints by ascending width, so wider rules come later and win.
    pub fn sorted_breakpoints(&self) -> Vec<Breakpoint> {
        let mut sorted = self.breakpoints.clone();
        sorted.sort_by_key(|bp| bp.min_width_px);
        sorted
    }

    fn slide_rule(&self, per_page: u32) -> String {
        let per_page = per_page.max(1);
        format!(
            ".carousel-slide {{ flex: 0 0 calc((100% - {gaps}px) / {per_page}); }}",
            gaps = self.spacing_px.saturating_mul(per_page - 1),
            per_page = per_page
        )
    }

    /// CSS for the track, including one media query per breakpoint.
    pub fn css(&self) -> String {
        let mut css = format!(
            ".carousel-track {{ display: flex; gap: {}px; overflow-x: auto; scroll-snap-type: x mandatory; }}\n{}\n",
            self.spacing_px,
            self.slide_rule(self.per_page)
        );

        for bp in self.sorted_breakpoints() {
            css.push_str(&format!(
                "@media (min-width: {}px) {{ {} }}\n",
                bp.min_width_px,
                self.slide_rule(bp.per_page)
            ));
        }

        css
    }
}

/// Render one slide.
pub fn render_slide(product: &ProductSummary) -> String {
    let image = match &product.image_url {
        Some(url) => format!(
            r#"<img src="{}" alt="" width="520" height="480" loading="lazy">"#,
            escape_html(url)
        ),
        None => r#"<div class="slide-image-placeholder" aria-hidden="true"></div>"#.to_string(),
    };

    format!(
        r#"<a class="carousel-slide product" href="{href}" data-prefetch="false" data-product-id="{id}">
    {image}
    <footer>
        <strong>{title}</strong>
        <span>{price}</span>
    </footer>
</a>"#,
        href = escape_html(&shop_core::product_path(product.id.as_str())),
        id = escape_html(product.id.as_str()),
        image = image,
        title = escape_html(&product.title),
        price = escape_html(&product.price),
    )
}

/// Render the listing page body.
pub fn render_listing_main(
    layout: &SiteLayout,
    products: &[ProductSummary],
    carousel: &CarouselConfig,
) -> String {
    if products.is_empty() {
        return format!(
            r#"<main class="home-container home-container--empty">
    <p class="empty-state">{}</p>
</main>"#,
            escape_html(layout.copy().empty_catalog)
        );
    }

    let slides: Vec<String> = products.iter().map(render_slide).collect();

    format!(
        r#"<main class="home-container">
    <div class="carousel-track" data-carousel data-slides="{count}" data-per-page="{per_page}">
{slides}
    </div>
</main>"#,
        count = products.len(),
        per_page = carousel.per_page,
        slides = slides.join("\n"),
    )
}

/// Render the complete listing document.
pub fn render_listing(
    layout: &SiteLayout,
    products: &[ProductSummary],
    carousel: &CarouselConfig,
) -> String {
    let head = layout
        .head(None)
        .with_style(LISTING_STYLES)
        .with_style(&carousel.css());
    layout.render(&head, &render_listing_main(layout, products, carousel))
}

const LISTING_STYLES: &str = r#"
.home-container { width: 100%; max-width: calc(100vw - ((100vw - 1180px) / 2)); margin-left: auto; min-height: 656px; }
.carousel-slide { background: linear-gradient(180deg, #1ea483 0%, #7465d4 100%); border-radius: 8px; position: relative; overflow: hidden; display: flex; align-items: center; justify-content: center; scroll-snap-align: start; text-decoration: none; }
.carousel-slide img { object-fit: cover; max-width: 100%; height: auto; }
.carousel-slide footer { position: absolute; bottom: 0.25rem; left: 0.25rem; right: 0.25rem; padding: 2rem; border-radius: 6px; display: flex; align-items: center; justify-content: space-between; background: rgba(0, 0, 0, 0.6); }
.carousel-slide strong { font-size: 1.25rem; color: #e1e1e6; }
.carousel-slide span { font-size: 1.25rem; font-weight: bold; color: #00875f; }
.slide-image-placeholder { width: 520px; max-width: 100%; aspect-ratio: 13 / 12; }
.empty-state { font-size: 1.25rem; padding: 4rem 0; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use shop_commerce::ProductId;

    fn summary(id: &str, title: &str) -> ProductSummary {
        ProductSummary {
            id: ProductId::new(id),
            title: title.to_string(),
            image_url: Some(format!("https://img.example/{}.png", id)),
            description: None,
            price: "R$\u{a0}79,90".to_string(),
        }
    }

    #[test]
    fn test_one_slide_per_product_in_order() {
        let products = vec![summary("prod_b", "B"), summary("prod_a", "A"), summary("prod_c", "C")];
        let html = render_listing(&SiteLayout::default(), &products, &CarouselConfig::default());

        assert_eq!(html.matches("class=\"carousel-slide product\"").count(), 3);
        let b = html.find("data-product-id=\"prod_b\"").unwrap();
        let a = html.find("data-product-id=\"prod_a\"").unwrap();
        let c = html.find("data-product-id=\"prod_c\"").unwrap();
        assert!(b < a && a < c);
    }

    #[test]
    fn test_slides_link_without_prefetch() {
        let html = render_slide(&summary("prod_1", "Camiseta"));
        assert!(html.contains(r#"href="/product/prod_1""#));
        assert!(html.contains(r#"data-prefetch="false""#));
        assert!(html.contains("R$\u{a0}79,90"));

        let page = render_listing(
            &SiteLayout::default(),
            &[summary("prod_1", "Camiseta")],
            &CarouselConfig::default(),
        );
        assert!(!page.contains("rel=\"prefetch\""));
    }

    #[test]
    fn test_empty_catalog_renders_empty_state() {
        let html = render_listing(&SiteLayout::default(), &[], &CarouselConfig::default());
        assert!(html.contains("Nenhum produto disponível no momento."));
        assert!(!html.contains("data-carousel"));
    }

    #[test]
    fn test_titles_are_escaped() {
        let html = render_slide(&summary("prod_1", "<script>alert(1)</script>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_breakpoint_media_queries() {
        let config = CarouselConfig {
            per_page: 1,
            spacing_px: 48,
            breakpoints: vec![
                Breakpoint { min_width_px: 1200, per_page: 3 },
                Breakpoint { min_width_px: 768, per_page: 2 },
            ],
        };
        let css = config.css();

        assert!(css.contains(".carousel-slide { flex: 0 0 calc((100% - 0px) / 1); }"));
        let narrow = css.find("@media (min-width: 768px) { .carousel-slide { flex: 0 0 calc((100% - 48px) / 2); } }").unwrap();
        let wide = css.find("@media (min-width: 1200px) { .carousel-slide { flex: 0 0 calc((100% - 96px) / 3); } }").unwrap();
        assert!(narrow < wide);
    }

    #[test]
    fn test_validate_rejects_zero_per_page() {
        assert!(CarouselConfig::default().validate().is_ok());

        let config = CarouselConfig {
            breakpoints: vec![Breakpoint { min_width_px: 600, per_page: 0 }],
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().contains("600px"));
    }

    #[test]
    fn test_validate_bounds_per_page_and_spacing() {
        let config = CarouselConfig { per_page: MAX_PER_PAGE + 1, ..Default::default() };
        assert!(config.validate().unwrap_err().contains("per_page"));

        let config = CarouselConfig { spacing_px: MAX_SPACING_PX + 1, ..Default::default() };
        assert!(config.validate().unwrap_err().contains("spacing_px"));

        let config = CarouselConfig {
            per_page: MAX_PER_PAGE,
            spacing_px: MAX_SPACING_PX,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_huge_unvalidated_gaps_do_not_overflow() {
        let config = CarouselConfig {
            per_page: u32::MAX,
            spacing_px: u32::MAX,
            ..Default::default()
        };
        let css = config.css();
        assert!(css.contains(&format!("100% - {}px", u32::MAX)));
    }
}
