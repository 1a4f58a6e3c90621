//! Cookie consent state for sitekit pages.
//!
//! The visitor's choice lives in a single `__cookie_consent` cookie holding
//! the JSON-encoded [`ConsentSettings`]. [`ConsentBanner`] reads that cookie
//! once per session through a [`CookieJar`] and decides whether the banner
//! should be shown.
//!
//! ```
//! use sitekit_consent::{ConsentBanner, ConsentSettings, MemoryCookieJar};
//! use sitekit_core::SystemClock;
//!
//! # fn main() -> Result<(), sitekit_consent::ConsentError> {
//! let mut jar = MemoryCookieJar::new();
//! let mut banner = ConsentBanner::initialise(&jar, &SystemClock);
//! assert!(banner.is_visible());
//!
//! banner.accept_all(&mut jar, &SystemClock)?;
//! assert!(!banner.is_visible());
//! assert_eq!(
//!     ConsentBanner::stored_settings(&jar, &SystemClock),
//!     Some(ConsentSettings::all_granted())
//! );
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod banner;
mod cookie;
mod error;
mod jar;
mod settings;

pub use banner::{CONSENT_COOKIE, CONSENT_TTL_DAYS, ConsentBanner};
pub use cookie::Cookie;
pub use error::ConsentError;
pub use jar::{CookieJar, MemoryCookieJar};
pub use settings::ConsentSettings;
