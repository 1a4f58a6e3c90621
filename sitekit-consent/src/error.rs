//! Errors raised while persisting consent.

use thiserror::Error;

/// Errors raised by consent operations.
#[derive(Debug, Error)]
pub enum ConsentError {
    /// Settings could not be serialized to JSON.
    #[error("failed to encode consent settings")]
    Encode(#[source] serde_json::Error),
    /// A stored value was not valid consent JSON.
    #[error("failed to decode consent settings")]
    Decode(#[source] serde_json::Error),
    /// The jar refused to store a cookie.
    #[error("cookie {name:?} rejected: {reason}")]
    Jar {
        /// Cookie name.
        name: String,
        /// Why the jar refused it.
        reason: &'static str,
    },
}
