//! Route creation and lookups.

use log::{debug, warn};
use sitekit_core::{
    Collection, DocumentStore, FieldFilter, RawRouteData, Route, transform_raw_route,
};

use super::{SiteRepository, decode, encode};
use crate::RepositoryError;

impl<S: DocumentStore> SiteRepository<S> {
    /// Create a route under `site_id` from raw form input.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::UnknownSite`] when references are enforced
    /// and the site does not exist, [`RepositoryError::IdCollision`] when no
    /// free identifier was found, and store or encoding errors otherwise.
    pub async fn create_new_route(
        &self,
        raw: RawRouteData,
        site_id: &str,
    ) -> Result<Route, RepositoryError> {
        if self.config.enforce_references && !self.store.exists(Collection::Sites, site_id).await? {
            warn!("rejecting route for unknown site {site_id}");
            return Err(RepositoryError::UnknownSite {
                site_id: site_id.to_owned(),
            });
        }
        let id = self.allocate_id(Collection::Routes).await?;
        let route = transform_raw_route(raw, &id, site_id, self.now());
        let fields = encode(Collection::Routes, &id, &route)?;
        debug!("writing route {id} for site {site_id}");
        self.store.set(Collection::Routes, &id, fields).await?;
        Ok(route)
    }

    /// All routes of `site_id`, ordered by route identifier.
    ///
    /// # Errors
    ///
    /// Returns store or decoding errors.
    pub async fn get_routes_by_site_id(
        &self,
        site_id: &str,
    ) -> Result<Vec<Route>, RepositoryError> {
        let filter = FieldFilter::equals("site_id", site_id);
        self.store
            .query(Collection::Routes, Some(&filter), None)
            .await?
            .into_iter()
            .map(|document| decode(Collection::Routes, document))
            .collect()
    }

    /// Route stored under `route_id`, or `None`.
    ///
    /// # Errors
    ///
    /// Returns store or decoding errors.
    pub async fn get_route_by_route_id(
        &self,
        route_id: &str,
    ) -> Result<Option<Route>, RepositoryError> {
        self.store
            .get(Collection::Routes, route_id)
            .await?
            .map(|document| decode(Collection::Routes, document))
            .transpose()
    }
}
