//! Data access for sitekit users, sites and routes.
//!
//! Responsibilities:
//! - Map repository operations onto [`DocumentStore`] primitives.
//! - Allocate identifiers and timestamps for new documents.
//! - Enforce that new sites and routes reference existing parents.
//!
//! Boundaries:
//! - Normalisation of raw input lives in `sitekit-core`.
//! - No retries, transactions or pagination.
//!
//! [`DocumentStore`]: sitekit_core::DocumentStore

#![forbid(unsafe_code)]

mod error;
mod repository;

pub use error::RepositoryError;
pub use repository::{MAX_ID_ATTEMPTS, RepositoryConfig, SiteRepository};
