//! User lookups and signup writes.

use log::debug;
use sitekit_core::{Collection, DocumentStore, FieldFilter, User};

use super::{SiteRepository, decode, encode};
use crate::RepositoryError;

impl<S: DocumentStore> SiteRepository<S> {
    /// First user whose `username` matches, or `None`.
    ///
    /// Usernames are unique by convention only; when several documents share
    /// one the lowest key wins.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Store`] when the query fails and
    /// [`RepositoryError::Decode`] when the match is not a user.
    pub async fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let filter = FieldFilter::equals("username", username);
        let mut documents = self
            .store
            .query(Collection::Users, Some(&filter), Some(1))
            .await?;
        documents
            .pop()
            .map(|document| decode(Collection::Users, document))
            .transpose()
    }

    /// User stored under the auth identifier `user_id`, or `None`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Store`] when the read fails and
    /// [`RepositoryError::Decode`] when the document is not a user.
    pub async fn get_user_by_user_id(
        &self,
        user_id: &str,
    ) -> Result<Option<User>, RepositoryError> {
        self.store
            .get(Collection::Users, user_id)
            .await?
            .map(|document| decode(Collection::Users, document))
            .transpose()
    }

    /// Write `user` under `user_id`, replacing any existing document.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Encode`] or [`RepositoryError::Store`] when
    /// the write cannot be performed.
    pub async fn create_user(&self, user_id: &str, user: &User) -> Result<(), RepositoryError> {
        let fields = encode(Collection::Users, user_id, user)?;
        debug!("writing user {user_id}");
        self.store.set(Collection::Users, user_id, fields).await?;
        Ok(())
    }
}
