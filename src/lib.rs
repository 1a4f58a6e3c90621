//! Facade crate for sitekit.
//!
//! Re-exports the entity model and document store seam, the site repository
//! and consent handling. HTML rendering and the SQLite store sit behind the
//! `web` and `store-sqlite` features.

#![forbid(unsafe_code)]

pub use sitekit_core::{
    Clock, Collection, Document, DocumentStore, FieldFilter, Fields, IdGenerator,
    MemoryDocumentStore, RandomIdGenerator, RawRouteData, RawSiteData, Route, Site, SitePatch,
    StoreError, SystemClock, Timestamp, User, generate_id, normalise_route_path,
    normalise_site_patch, transform_raw_route, transform_raw_site,
};

#[cfg(feature = "store-sqlite")]
pub use sitekit_core::SqliteDocumentStore;

#[cfg(feature = "test-support")]
pub use sitekit_core::test_support;

pub use sitekit_consent::{
    CONSENT_COOKIE, CONSENT_TTL_DAYS, ConsentBanner, ConsentError, ConsentSettings, Cookie,
    CookieJar, MemoryCookieJar,
};

pub use sitekit_data::{RepositoryConfig, RepositoryError, SiteRepository};

#[cfg(feature = "web")]
pub use sitekit_web::{PRIVACY_POLICY_PATH, render_cookie_banner, render_routes_page};
