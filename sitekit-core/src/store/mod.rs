//! Document store seam.
//!
//! The [`DocumentStore`] trait is the only way sitekit touches persistence. A
//! store is addressed by [`Collection`] and document key and supports four
//! primitives: point reads, whole-document writes, top-level field merges and
//! single-field equality queries. Consistency, indexing and durability are the
//! adapter's business; nothing here retries or wraps calls in transactions.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{Collection, Document, FieldFilter, Fields};

mod error;
mod memory;
#[cfg(feature = "store-sqlite")]
mod sqlite;

pub use error::StoreError;
pub use memory::MemoryDocumentStore;
#[cfg(feature = "store-sqlite")]
pub use sqlite::SqliteDocumentStore;

/// Async access to a collection-oriented document database.
///
/// Query results are ordered by document key so callers observe a stable
/// order regardless of adapter.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use sitekit_core::{Collection, DocumentStore, FieldFilter, MemoryDocumentStore, to_fields};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let runtime = tokio::runtime::Builder::new_current_thread().build()?;
/// let store = MemoryDocumentStore::new();
/// let body = to_fields(&json!({"user_id": "u1"}))?;
/// let filter = FieldFilter::equals("user_id", "u1");
/// let found = runtime.block_on(async {
///     store.set(Collection::Sites, "s1", body).await?;
///     store.query(Collection::Sites, Some(&filter), None).await
/// })?;
/// assert_eq!(found.len(), 1);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document, or `None` when the key is absent.
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, StoreError>;

    /// Write a whole document, replacing any existing one at the key.
    async fn set(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError>;

    /// Merge top-level fields into an existing document.
    ///
    /// Fails with [`StoreError::NotFound`] when the key is absent.
    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError>;

    /// List documents, optionally filtered by one field and capped at `limit`.
    async fn query(
        &self,
        collection: Collection,
        filter: Option<&FieldFilter>,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, StoreError>;

    /// Whether a document exists at the key.
    async fn exists(&self, collection: Collection, id: &str) -> Result<bool, StoreError> {
        Ok(self.get(collection, id).await?.is_some())
    }
}

#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, StoreError> {
        (**self).get(collection, id).await
    }

    async fn set(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        (**self).set(collection, id, fields).await
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        (**self).update(collection, id, fields).await
    }

    async fn query(
        &self,
        collection: Collection,
        filter: Option<&FieldFilter>,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, StoreError> {
        (**self).query(collection, filter, limit).await
    }

    async fn exists(&self, collection: Collection, id: &str) -> Result<bool, StoreError> {
        (**self).exists(collection, id).await
    }
}
