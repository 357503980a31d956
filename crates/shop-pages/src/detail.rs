//! Product detail page with the buy action.

use shop_commerce::catalog::ProductDetail;
use shop_commerce::checkout::CheckoutState;

use crate::escape::escape_html;
use crate::layout::SiteLayout;

/// Path the buy form posts to.
pub fn checkout_action(detail: &ProductDetail) -> String {
    format!("{}/checkout", shop_core::product_path(detail.id.as_str()))
}

/// Render the buy form for the given checkout state.
///
/// Idle and Failed render an enabled button; Requesting and Redirecting
/// render it disabled and busy. The inline script switches the form to
/// the busy state on submit so a second click is never sent.
pub fn render_buy_form(layout: &SiteLayout, detail: &ProductDetail, state: &CheckoutState) -> String {
    let copy = layout.copy();

    let price_id = match (&detail.default_price_id, detail.is_purchasable()) {
        (Some(id), true) => id,
        _ => {
            return format!(
                r#"<button type="button" class="buy-button" disabled>{}</button>"#,
                escape_html(copy.unavailable)
            );
        }
    };

    let (button_attrs, label) = if state.is_action_enabled() {
        ("", copy.buy_now)
    } else {
        (r#" disabled aria-busy="true""#, copy.buying)
    };

    let error = state
        .error_message()
        .map(|msg| {
            format!(
                r#"<p class="checkout-error" role="alert">{}</p>
        "#,
                escape_html(msg)
            )
        })
        .unwrap_or_default();

    format!(
        r#"{error}<form method="post" action="{action}" class="buy-form" data-checkout data-state="{state}">
            <input type="hidden" name="priceId" value="{price_id}">
            <button type="submit" class="buy-button" data-busy-label="{busy}"{attrs}>{label}</button>
        </form>"#,
        error = error,
        action = escape_html(&checkout_action(detail)),
        state = state.name(),
        price_id = escape_html(price_id.as_str()),
        busy = escape_html(copy.buying),
        attrs = button_attrs,
        label = escape_html(label),
    )
}

/// Render the detail page body.
pub fn render_detail_main(layout: &SiteLayout, detail: &ProductDetail, state: &CheckoutState) -> String {
    let description = detail.description.as_deref().unwrap_or("");

    let image = match &detail.image_url {
        Some(url) => format!(
            r#"<img src="{}" alt="{}" width="520" height="480">"#,
            escape_html(url),
            escape_html(description)
        ),
        None => r#"<div class="product-image-placeholder" aria-hidden="true"></div>"#.to_string(),
    };

    format!(
        r#"<main class="product-container" data-product-id="{id}">
    <div class="image-container">
        {image}
    </div>
    <div class="product-details">
        <h1>{title}</h1>
        <span class="product-price">{price}</span>
        <p>{description}</p>
        {buy}
    </div>
</main>
<script>{script}</script>"#,
        id = escape_html(detail.id.as_str()),
        image = image,
        title = escape_html(&detail.title),
        price = escape_html(&detail.price),
        description = escape_html(description),
        buy = render_buy_form(layout, detail, state),
        script = BUY_SCRIPT,
    )
}

/// Render the complete detail document.
pub fn render_detail(layout: &SiteLayout, detail: &ProductDetail, state: &CheckoutState) -> String {
    let mut head = layout.head(Some(&detail.title)).with_style(DETAIL_STYLES);
    if let Some(description) = &detail.description {
        head = head.with_meta("description", description);
    }
    layout.render(&head, &render_detail_main(layout, detail, state))
}

const BUY_SCRIPT: &str = r#"
document.querySelectorAll('form[data-checkout]').forEach(function (form) {
  form.addEventListener('submit', function (event) {
    if (form.dataset.state === 'requesting') { event.preventDefault(); return; }
    var button = form.querySelector('button');
    form.dataset.state = 'requesting';
    button.disabled = true;
    button.setAttribute('aria-busy', 'true');
    button.textContent = button.dataset.busyLabel;
  });
});
"#;

const DETAIL_STYLES: &str = r#"
.product-container { display: grid; grid-template-columns: 1fr 1fr; align-items: stretch; gap: 4rem; max-width: 1180px; margin: 0 auto; width: 100%; }
.image-container { width: 100%; max-width: 576px; height: 656px; background: linear-gradient(180deg, #1ea483 0%, #7465d4 100%); border-radius: 8px; padding: 0.25rem; display: flex; align-items: center; justify-content: center; }
.image-container img { object-fit: cover; max-width: 100%; height: auto; }
.product-details { display: flex; flex-direction: column; }
.product-details h1 { font-size: 2rem; color: #c4c4cc; }
.product-price { margin-top: 1rem; display: block; font-size: 2rem; color: #00b37e; }
.product-details p { margin-top: 2.5rem; font-size: 1.125rem; line-height: 1.6; }
.buy-form { margin-top: auto; }
.buy-button { width: 100%; background: #00875f; border: 0; color: #fff; border-radius: 8px; padding: 1.25rem; cursor: pointer; font-weight: bold; font-size: 1.125rem; }
.buy-button:disabled { opacity: 0.6; cursor: not-allowed; }
.buy-button:not(:disabled):hover { background: #00b37e; }
.checkout-error { margin-top: auto; margin-bottom: 1rem; padding: 1rem; border-radius: 8px; background: #2a1215; color: #f75a68; }
"#;
