//! HTML page rendering for the storefront.
//!
//! Every page is a pure function from view models to an HTML document:
//! - `render_listing` - the product carousel at `/`
//! - `render_detail` - a product page with its buy action
//! - `render_placeholder`, `render_not_found`, `render_error` - the rest
//!
//! Pages share one [`SiteLayout`] (document shell and logo header).

mod copy;
mod detail;
mod escape;
mod layout;
mod listing;
mod status;

pub use copy::PageCopy;
pub use detail::*;
pub use escape::escape_html;
pub use layout::*;
pub use listing::*;
pub use status::*;
