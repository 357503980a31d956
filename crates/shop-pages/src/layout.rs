//! Document shell shared by every page.

use shop_commerce::Locale;

use crate::copy::PageCopy;
use crate::escape::escape_html;

/// Head content for the shell.
#[derive(Debug, Clone, Default)]
pub struct HeadContent {
    /// Page title.
    pub title: Option<String>,
    /// Meta tags (`name`, `content`).
    pub meta: Vec<(String, String)>,
    /// `http-equiv` meta tags.
    pub http_equiv: Vec<(String, String)>,
    /// Inline styles.
    pub styles: Vec<String>,
}

impl HeadContent {
    /// Create new head content with a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Add a meta tag.
    pub fn with_meta(mut self, name: &str, content: &str) -> Self {
        self.meta.push((name.to_string(), content.to_string()));
        self
    }

    /// Add an `http-equiv` meta tag.
    pub fn with_http_equiv(mut self, name: &str, content: &str) -> Self {
        self.http_equiv.push((name.to_string(), content.to_string()));
        self
    }

    /// Add inline CSS styles.
    pub fn with_style(mut self, css: &str) -> Self {
        self.styles.push(css.to_string());
        self
    }

    /// Render head content to HTML.
    pub fn render(&self) -> String {
        let mut html = String::from("<meta charset=\"utf-8\">\n");

        if let Some(title) = &self.title {
            html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
        }

        for (name, content) in &self.meta {
            html.push_str(&format!(
                "<meta name=\"{}\" content=\"{}\">\n",
                escape_html(name),
                escape_html(content)
            ));
        }

        for (name, content) in &self.http_equiv {
            html.push_str(&format!(
                "<meta http-equiv=\"{}\" content=\"{}\">\n",
                escape_html(name),
                escape_html(content)
            ));
        }

        for css in &self.styles {
            html.push_str(&format!("<style>{}</style>\n", css));
        }

        html
    }
}

/// Site-wide layout: document shell plus the logo header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLayout {
    /// Store name, used in titles and as the logo's alt text.
    pub site_name: String,
    /// Logo image URL.
    pub logo_url: String,
    /// Language of the copy and prices.
    pub locale: Locale,
}

impl Default for SiteLayout {
    fn default() -> Self {
        Self {
            site_name: "Ignite Shop".to_string(),
            logo_url: "/static/logo.svg".to_string(),
            locale: Locale::PtBr,
        }
    }
}

impl SiteLayout {
    /// Create a layout.
    pub fn new(site_name: impl Into<String>, logo_url: impl Into<String>, locale: Locale) -> Self {
        Self {
            site_name: site_name.into(),
            logo_url: logo_url.into(),
            locale,
        }
    }

    /// Copy for the layout's locale.
    pub fn copy(&self) -> &'static PageCopy {
        PageCopy::for_locale(self.locale)
    }

    /// Title for a page: `"{page} | {site}"`, or just the site name.
    pub fn title(&self, page: Option<&str>) -> String {
        match page {
            Some(page) => format!("{} | {}", page, self.site_name),
            None => self.site_name.clone(),
        }
    }

    /// Head content with the base stylesheet.
    pub fn head(&self, page_title: Option<&str>) -> HeadContent {
        HeadContent::new(self.title(page_title))
            .with_meta("viewport", "width=device-width, initial-scale=1")
            .with_style(BASE_STYLES)
    }

    /// Render a full document around `main`.
    pub fn render(&self, head: &HeadContent, main: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
{head}</head>
<body>
<div class="container">
    <header class="site-header">
        <a href="/" data-prefetch="false"><img src="{logo}" alt="{name}" height="52"></a>
    </header>
{main}
</div>
</body>
</html>"#,
            lang = self.locale.tag(),
            head = head.render(),
            logo = escape_html(&self.logo_url),
            name = escape_html(&self.site_name),
            main = main,
        )
    }
}

/// Base CSS shared by all pages.
const BASE_STYLES: &str = r#"
* { box-sizing: border-box; margin: 0; padding: 0; }
body { background: #121214; color: #c4c4cc; font-family: Roboto, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; -webkit-font-smoothing: antialiased; }
.container { display: flex; flex-direction: column; align-items: flex-start; justify-content: center; min-height: 100vh; }
.site-header { padding: 2rem 0; width: 100%; max-width: 1180px; margin: 0 auto; }
.status-page { width: 100%; max-width: 1180px; margin: 0 auto; padding: 4rem 0; }
.status-page h1 { color: #e1e1e6; font-size: 2rem; margin-bottom: 1rem; }
.status-page a { color: #00b37e; }
"#;
