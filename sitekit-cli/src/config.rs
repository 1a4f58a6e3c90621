//! Layered store configuration shared by every data command.

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use sitekit_core::SqliteDocumentStore;
use sitekit_data::{RepositoryConfig, SiteRepository};

use crate::CliError;

pub(crate) const ARG_DATABASE: &str = "database";
pub(crate) const ARG_ENFORCE_REFERENCES: &str = "enforce-references";
pub(crate) const ENV_DATABASE: &str = "SITEKIT_DATABASE";

/// Store options, layered from configuration files, `SITEKIT_*` environment
/// variables and CLI flags.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "Document store options")]
#[ortho_config(prefix = "SITEKIT")]
pub(crate) struct StoreArgs {
    /// Path to the SQLite document database.
    #[arg(long = ARG_DATABASE, value_name = "path", global = true)]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Reject sites and routes whose parent does not exist (default: true).
    #[arg(long = ARG_ENFORCE_REFERENCES, value_name = "bool", global = true)]
    #[serde(default)]
    pub(crate) enforce_references: Option<bool>,
}

impl StoreArgs {
    pub(crate) fn into_config(self) -> Result<StoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        StoreConfig::try_from(merged)
    }
}

/// Resolved store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StoreConfig {
    /// Path to the SQLite document database.
    pub(crate) database: Utf8PathBuf,
    /// Repository tunables.
    pub(crate) repository: RepositoryConfig,
}

impl StoreConfig {
    pub(crate) fn open(&self) -> Result<SiteRepository<SqliteDocumentStore>, CliError> {
        let store =
            SqliteDocumentStore::open(&self.database).map_err(|source| CliError::OpenStore {
                path: self.database.clone(),
                source,
            })?;
        Ok(SiteRepository::new(store).with_config(self.repository))
    }
}

impl TryFrom<StoreArgs> for StoreConfig {
    type Error = CliError;

    fn try_from(args: StoreArgs) -> Result<Self, Self::Error> {
        let database = args.database.ok_or(CliError::MissingArgument {
            field: ARG_DATABASE,
            env: ENV_DATABASE,
        })?;
        let enforce_references = args
            .enforce_references
            .unwrap_or(RepositoryConfig::default().enforce_references);
        Ok(Self {
            database,
            repository: RepositoryConfig { enforce_references },
        })
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<StoreConfig, CliError> {
    let merged = StoreArgs::merge_from_layers(layers).map_err(CliError::from)?;
    StoreConfig::try_from(merged)
}
