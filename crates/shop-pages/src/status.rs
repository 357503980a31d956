//! Placeholder, not-found and error pages.

use crate::escape::escape_html;
use crate::layout::SiteLayout;

/// Query parameter the placeholder's follow-up request carries.
pub const FOLLOW_UP_PARAM: &str = "fallback";

/// URL the placeholder page reloads to once the page can be generated.
pub fn follow_up_url(id: &str) -> String {
    format!("{}?{}=blocking", shop_core::product_path(id), FOLLOW_UP_PARAM)
}

/// Loading page served for an unlisted product under the placeholder
/// fallback. It reloads itself to the follow-up URL, which generates the
/// real page.
pub fn render_placeholder(layout: &SiteLayout, id: &str) -> String {
    let copy = layout.copy();
    let target = follow_up_url(id);
    let head = layout
        .head(Some(copy.loading))
        .with_http_equiv("refresh", &format!("0;url={}", target))
        .with_style(SKELETON_STYLES);

    let main = format!(
        r#"<main class="product-container skeleton" aria-busy="true" data-product-id="{id}">
    <div class="image-container skeleton-block"></div>
    <div class="product-details">
        <p>{loading}</p>
        <noscript><a href="{target}">{loading}</a></noscript>
    </div>
</main>"#,
        id = escape_html(id),
        loading = escape_html(copy.loading),
        target = escape_html(&target),
    );

    layout.render(&head, &main)
}

/// Page for a product the catalog does not know.
pub fn render_not_found(layout: &SiteLayout) -> String {
    let copy = layout.copy();
    render_status(layout, copy.not_found_title, copy.not_found_body)
}

/// Page for a generation failure with nothing stored to fall back on.
pub fn render_error(layout: &SiteLayout) -> String {
    let copy = layout.copy();
    render_status(layout, copy.error_title, copy.error_body)
}

fn render_status(layout: &SiteLayout, title: &str, body: &str) -> String {
    let main = format!(
        r#"<main class="status-page">
    <h1>{title}</h1>
    <p>{body}</p>
    <p><a href="/" data-prefetch="false">{back}</a></p>
</main>"#,
        title = escape_html(title),
        body = escape_html(body),
        back = escape_html(layout.copy().back_home),
    );
    layout.render(&layout.head(Some(title)), &main)
}

const SKELETON_STYLES: &str = r#"
.skeleton .skeleton-block { background: #202024; width: 576px; height: 656px; border-radius: 8px; }
.skeleton .product-details { padding: 2rem; }
"#;
