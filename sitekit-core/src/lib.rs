//! Core domain types for sitekit.
//!
//! The crate owns the persisted entity shapes (users, sites and routes), the
//! pure transforms that turn raw form input into those shapes, identifier
//! generation, and the [`DocumentStore`] seam every persistence adapter
//! implements. Nothing here knows about consent or rendering.
//!
//! # Examples
//!
//! ```
//! use sitekit_core::{RawSiteData, transform_raw_site};
//!
//! let raw = RawSiteData::new("  Bakery ", "Bakery");
//! let site = transform_raw_site(raw, "site-1", "user-1", 1_700_000_000_000);
//! assert_eq!(site.name, "Bakery");
//! assert_eq!(site.subdomain, "bakery");
//! assert_eq!(site.user_id, "user-1");
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod clock;
mod document;
mod ids;
mod model;
pub mod store;
mod transform;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use clock::{Clock, SystemClock, Timestamp};
pub use document::{Collection, Document, FieldFilter, Fields, to_fields};
pub use ids::{ID_ALPHABET, ID_LENGTH, IdGenerator, RandomIdGenerator, generate_id};
pub use model::{RawRouteData, RawSiteData, Route, Site, SitePatch, User};
pub use store::{DocumentStore, MemoryDocumentStore, StoreError};
pub use transform::{
    normalise_route_path, normalise_site_patch, transform_raw_route, transform_raw_site,
};

#[cfg(feature = "store-sqlite")]
pub use store::SqliteDocumentStore;
