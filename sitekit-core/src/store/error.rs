//! Errors raised by [`DocumentStore`](super::DocumentStore) adapters.

use thiserror::Error;

use crate::Collection;

#[cfg(feature = "store-sqlite")]
use camino::Utf8PathBuf;

/// Errors raised by document store adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An update targeted a document that does not exist.
    #[error("document {collection}/{id} does not exist")]
    NotFound {
        /// Collection that was addressed.
        collection: Collection,
        /// Missing document key.
        id: String,
    },
    /// A filter named a field that is not a plain identifier.
    #[error("field name {field:?} must be non-empty ASCII letters, digits or underscores")]
    InvalidField {
        /// Offending field name.
        field: String,
    },
    /// A filter compared against an array or object.
    #[error("equality filter on {field:?} must compare against a scalar")]
    UnsupportedFilter {
        /// Filtered field name.
        field: String,
    },
    /// A document body could not be serialized.
    #[error("failed to encode document {collection}/{id}")]
    Encode {
        /// Collection that was addressed.
        collection: Collection,
        /// Document key.
        id: String,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// A stored document body was not a JSON object.
    #[error("failed to decode document {collection}/{id}")]
    Decode {
        /// Collection that was addressed.
        collection: Collection,
        /// Document key.
        id: String,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// A lock guarding adapter state was poisoned by a panicking writer.
    #[error("document store lock poisoned")]
    Poisoned,
    /// Creating the parent directory of the database file failed.
    #[cfg(feature = "store-sqlite")]
    #[error("failed to create parent directory {path}")]
    CreateDirectory {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite database failed.
    #[cfg(feature = "store-sqlite")]
    #[error("failed to open SQLite database at {path}")]
    Open {
        /// Requested database path.
        path: Utf8PathBuf,
        /// Source error from `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Preparing or executing a statement failed.
    #[cfg(feature = "store-sqlite")]
    #[error("failed to {operation}")]
    Query {
        /// Description of the failed operation.
        operation: &'static str,
        /// Source error from `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// The blocking task running a statement panicked or was cancelled.
    #[cfg(feature = "store-sqlite")]
    #[error("document store task failed")]
    Blocking(#[source] tokio::task::JoinError),
}
