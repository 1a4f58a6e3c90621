//! Error types emitted by the sitekit CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use sitekit_consent::ConsentError;
use sitekit_core::StoreError;
use sitekit_data::RepositoryError;
use thiserror::Error;

/// Errors emitted by the sitekit CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// Starting the async runtime failed.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Opening the document database failed.
    #[error("failed to open database at {path:?}: {source}")]
    OpenStore {
        path: Utf8PathBuf,
        #[source]
        source: StoreError,
    },
    /// A repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    /// Persisting the consent cookie failed.
    #[error(transparent)]
    Consent(#[from] ConsentError),
    /// No user matched the lookup.
    #[error("no user found for {lookup}")]
    UserNotFound { lookup: String },
    /// No site is stored under the identifier.
    #[error("no site found with id {site_id}")]
    SiteNotFound { site_id: String },
    /// Serializing command output failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
