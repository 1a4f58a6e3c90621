//! In-memory [`DocumentStore`] used by tests, demos and the default
//! repository wiring.

use std::{
    collections::BTreeMap,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use async_trait::async_trait;
use log::debug;

use super::{DocumentStore, StoreError};
use crate::{Collection, Document, FieldFilter, Fields};

type Collections = BTreeMap<Collection, BTreeMap<String, Fields>>;

/// Process-local document store.
///
/// Documents live in ordered maps, so queries return keys in ascending order
/// without an explicit sort.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<Collections>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents held in `collection`.
    pub fn len(&self, collection: Collection) -> Result<usize, StoreError> {
        Ok(self.read()?.get(&collection).map_or(0, BTreeMap::len))
    }

    /// Whether `collection` holds no documents.
    pub fn is_empty(&self, collection: Collection) -> Result<bool, StoreError> {
        Ok(self.len(collection)? == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Collections>, StoreError> {
        self.collections.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Collections>, StoreError> {
        self.collections.write().map_err(|_| StoreError::Poisoned)
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.read()?;
        Ok(collections
            .get(&collection)
            .and_then(|documents| documents.get(id))
            .map(|fields| Document::new(id, fields.clone())))
    }

    async fn set(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        debug!("set {collection}/{id}");
        self.write()?
            .entry(collection)
            .or_default()
            .insert(id.to_owned(), fields);
        Ok(())
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        debug!("update {collection}/{id}");
        let mut collections = self.write()?;
        let existing = collections
            .get_mut(&collection)
            .and_then(|documents| documents.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection,
                id: id.to_owned(),
            })?;
        existing.extend(fields);
        Ok(())
    }

    async fn query(
        &self,
        collection: Collection,
        filter: Option<&FieldFilter>,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, StoreError> {
        if let Some(active) = filter {
            active.validate()?;
        }
        let collections = self.read()?;
        let Some(documents) = collections.get(&collection) else {
            return Ok(Vec::new());
        };
        Ok(documents
            .iter()
            .filter(|(_, fields)| filter.is_none_or(|f| f.matches(fields)))
            .take(limit.unwrap_or(usize::MAX))
            .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
            .collect())
    }
}
