//! Repository over a [`DocumentStore`].
//!
//! Operations are grouped by entity in the `users`, `sites` and `routes`
//! submodules. Shared plumbing (identifier allocation, body encoding and
//! decoding) lives here.

use std::sync::Arc;

use log::debug;
use serde::{Serialize, de::DeserializeOwned};
use sitekit_core::{
    Clock, Collection, Document, DocumentStore, Fields, IdGenerator, RandomIdGenerator,
    SystemClock, Timestamp, to_fields,
};

use crate::RepositoryError;

mod routes;
mod sites;
mod users;


/// Number of identifiers drawn before giving up on a collision.
pub const MAX_ID_ATTEMPTS: usize = 3;

/// Tunables for [`SiteRepository`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Reject sites with unknown owners and routes with unknown sites.
    pub enforce_references: bool,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            enforce_references: true,
        }
    }
}

/// Users, sites and routes persisted in a [`DocumentStore`].
///
/// # Examples
///
/// ```
/// use sitekit_core::{MemoryDocumentStore, RawSiteData, User};
/// use sitekit_data::SiteRepository;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let runtime = tokio::runtime::Builder::new_current_thread().build()?;
/// let repository = SiteRepository::new(MemoryDocumentStore::new());
/// let site = runtime.block_on(async {
///     repository.create_user("u1", &User::new("u1", "ada")).await?;
///     repository
///         .create_new_site(RawSiteData::new("Notebook", "notes"), "u1")
///         .await
/// })?;
/// assert_eq!(site.user_id, "u1");
/// # Ok(())
/// # }
/// ```
pub struct SiteRepository<S> {
    store: S,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    config: RepositoryConfig,
}

impl<S> std::fmt::Debug for SiteRepository<S>
where
    S: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteRepository")
            .field("store", &self.store)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S: DocumentStore> SiteRepository<S> {
    /// Wrap `store` with random identifiers, the system clock and the default
    /// configuration.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            ids: Arc::new(RandomIdGenerator),
            clock: Arc::new(SystemClock),
            config: RepositoryConfig::default(),
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub const fn with_config(mut self, config: RepositoryConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the identifier generator.
    #[must_use]
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Underlying document store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> RepositoryConfig {
        self.config
    }

    fn now(&self) -> Timestamp {
        self.clock.now_millis()
    }

    /// Draw identifiers until one is free in `collection`.
    async fn allocate_id(&self, collection: Collection) -> Result<String, RepositoryError> {
        for attempt in 1..=MAX_ID_ATTEMPTS {
            let candidate = self.ids.generate();
            if !self.store.exists(collection, &candidate).await? {
                return Ok(candidate);
            }
            debug!("identifier collision in {collection} on attempt {attempt}");
        }
        Err(RepositoryError::IdCollision {
            collection,
            attempts: MAX_ID_ATTEMPTS,
        })
    }
}

fn encode<T: Serialize>(
    collection: Collection,
    id: &str,
    entity: &T,
) -> Result<Fields, RepositoryError> {
    to_fields(entity).map_err(|source| RepositoryError::Encode {
        collection,
        id: id.to_owned(),
        source,
    })
}

fn decode<T: DeserializeOwned>(
    collection: Collection,
    document: Document,
) -> Result<T, RepositoryError> {
    let id = document.id.clone();
    document
        .decode()
        .map_err(|source| RepositoryError::Decode {
            collection,
            id,
            source,
        })
}
