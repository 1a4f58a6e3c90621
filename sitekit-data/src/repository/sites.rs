//! Site creation, updates and listings.

use log::{debug, warn};
use serde_json::Value;
use sitekit_core::{
    Collection, Document, DocumentStore, FieldFilter, RawSiteData, Site, SitePatch, StoreError,
    normalise_site_patch, transform_raw_site,
};

use super::{SiteRepository, decode, encode};
use crate::RepositoryError;

const CLEARABLE_FIELDS: [&str; 2] = ["description", "custom_domain"];

impl<S: DocumentStore> SiteRepository<S> {
    /// Create a site owned by `user_id` from raw form input.
    ///
    /// The site receives a fresh identifier and `created_at == updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::UnknownUser`] when references are enforced
    /// and the owner does not exist, [`RepositoryError::IdCollision`] when no
    /// free identifier was found, and store or encoding errors otherwise.
    pub async fn create_new_site(
        &self,
        raw: RawSiteData,
        user_id: &str,
    ) -> Result<Site, RepositoryError> {
        if self.config.enforce_references && !self.store.exists(Collection::Users, user_id).await? {
            warn!("rejecting site for unknown user {user_id}");
            return Err(RepositoryError::UnknownUser {
                user_id: user_id.to_owned(),
            });
        }
        let id = self.allocate_id(Collection::Sites).await?;
        let site = transform_raw_site(raw, &id, user_id, self.now());
        let fields = encode(Collection::Sites, &id, &site)?;
        debug!("writing site {id} for user {user_id}");
        self.store.set(Collection::Sites, &id, fields).await?;
        Ok(site)
    }

    /// Merge `patch` into the site and stamp `updated_at`.
    ///
    /// Text is normalised with [`normalise_site_patch`]. A blank description
    /// or custom domain clears the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::SiteNotFound`] when no site is stored under
    /// `site_id`, and store or encoding errors otherwise.
    pub async fn update_site_data(
        &self,
        patch: &SitePatch,
        site_id: &str,
    ) -> Result<(), RepositoryError> {
        let normalised = normalise_site_patch(patch.clone());
        let mut fields = encode(Collection::Sites, site_id, &normalised)?;
        for field in CLEARABLE_FIELDS {
            if fields.get(field).is_some_and(|value| value.as_str() == Some("")) {
                fields.insert(field.to_owned(), Value::Null);
            }
        }
        fields.insert("updated_at".to_owned(), Value::from(self.now()));
        debug!("updating site {site_id}");
        match self.store.update(Collection::Sites, site_id, fields).await {
            Ok(()) => Ok(()),
            Err(StoreError::NotFound { .. }) => Err(RepositoryError::SiteNotFound {
                site_id: site_id.to_owned(),
            }),
            Err(other) => Err(other.into()),
        }
    }

    /// All sites owned by `user_id`, each carrying its document key.
    ///
    /// # Errors
    ///
    /// Returns store or decoding errors.
    pub async fn get_all_sites_by_user_id(
        &self,
        user_id: &str,
    ) -> Result<Vec<Site>, RepositoryError> {
        let filter = FieldFilter::equals("user_id", user_id);
        let documents = self
            .store
            .query(Collection::Sites, Some(&filter), None)
            .await?;
        documents.into_iter().map(listed_site).collect()
    }

    /// Every site, each carrying its document key.
    ///
    /// # Errors
    ///
    /// Returns store or decoding errors.
    pub async fn get_all_sites(&self) -> Result<Vec<Site>, RepositoryError> {
        let documents = self.store.query(Collection::Sites, None, None).await?;
        documents.into_iter().map(listed_site).collect()
    }

    /// Site stored under `site_id`, or `None`.
    ///
    /// # Errors
    ///
    /// Returns store or decoding errors.
    pub async fn get_site_by_site_id(
        &self,
        site_id: &str,
    ) -> Result<Option<Site>, RepositoryError> {
        self.store
            .get(Collection::Sites, site_id)
            .await?
            .map(|document| decode(Collection::Sites, document))
            .transpose()
    }
}

fn listed_site(document: Document) -> Result<Site, RepositoryError> {
    let doc_id = document.id.clone();
    let mut site: Site = decode(Collection::Sites, document)?;
    site.doc_id = Some(doc_id);
    Ok(site)
}
