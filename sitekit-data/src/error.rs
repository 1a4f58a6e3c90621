//! Errors raised by [`SiteRepository`](crate::SiteRepository).

use sitekit_core::{Collection, StoreError};
use thiserror::Error;

/// Errors raised by repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The underlying document store failed.
    #[error("document store operation failed")]
    Store(#[from] StoreError),
    /// An entity could not be turned into a document body.
    #[error("failed to encode {collection}/{id}")]
    Encode {
        /// Target collection.
        collection: Collection,
        /// Document key.
        id: String,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// A stored document did not match the entity shape.
    #[error("failed to decode {collection}/{id}")]
    Decode {
        /// Source collection.
        collection: Collection,
        /// Document key.
        id: String,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// An update targeted a site that does not exist.
    #[error("site {site_id} does not exist")]
    SiteNotFound {
        /// Requested site identifier.
        site_id: String,
    },
    /// A new site named an owner that does not exist.
    #[error("user {user_id} does not exist")]
    UnknownUser {
        /// Requested owner identifier.
        user_id: String,
    },
    /// A new route named a site that does not exist.
    #[error("site {site_id} does not exist")]
    UnknownSite {
        /// Requested site identifier.
        site_id: String,
    },
    /// Every generated identifier was already taken.
    #[error("no unused identifier in {collection} after {attempts} attempts")]
    IdCollision {
        /// Collection the identifier was allocated for.
        collection: Collection,
        /// Number of identifiers tried.
        attempts: usize,
    },
}
