//! HTML fragments for sitekit pages.
//!
//! Templates are written with Maud's `html!` macro, so markup is checked at
//! compile time and every interpolated value is escaped. Renderers return
//! the finished fragment as a string.

#![forbid(unsafe_code)]

mod banner;
mod routes;

pub use banner::{PRIVACY_POLICY_PATH, render_cookie_banner};
pub use routes::render_routes_page;
