//! Pure transforms from raw form input to persisted entities.
//!
//! Transforms trim free text, lower-case host labels and drop blank optional
//! fields. They never touch a store; callers supply the identifier, foreign
//! key and timestamp.

use crate::{RawRouteData, RawSiteData, Route, Site, SitePatch, Timestamp};

/// Build a [`Site`] from raw input, its new identifier and its owner.
///
/// `created_at` and `updated_at` both take `now`.
#[must_use]
pub fn transform_raw_site(raw: RawSiteData, id: &str, user_id: &str, now: Timestamp) -> Site {
    Site {
        id: id.to_owned(),
        user_id: user_id.to_owned(),
        name: raw.name.trim().to_owned(),
        subdomain: raw.subdomain.trim().to_ascii_lowercase(),
        description: non_blank(raw.description),
        custom_domain: non_blank(raw.custom_domain).map(|domain| domain.to_ascii_lowercase()),
        created_at: now,
        updated_at: now,
        doc_id: None,
    }
}

/// Apply the [`transform_raw_site`] text rules to a partial update.
///
/// Optional fields that are blank after trimming come back as empty strings,
/// which the repository stores as cleared.
///
/// # Examples
///
/// ```
/// use sitekit_core::{SitePatch, normalise_site_patch};
///
/// let patch = normalise_site_patch(SitePatch::default().subdomain(" BLOG ").description("  "));
/// assert_eq!(patch.subdomain.as_deref(), Some("blog"));
/// assert_eq!(patch.description.as_deref(), Some(""));
/// assert_eq!(patch.name, None);
/// ```
#[must_use]
pub fn normalise_site_patch(patch: SitePatch) -> SitePatch {
    SitePatch {
        name: patch.name.map(|name| name.trim().to_owned()),
        subdomain: patch.subdomain.map(|label| label.trim().to_ascii_lowercase()),
        description: patch.description.map(|text| text.trim().to_owned()),
        custom_domain: patch
            .custom_domain
            .map(|domain| domain.trim().to_ascii_lowercase()),
    }
}

/// Build a [`Route`] from raw input, its new identifier and its site.
#[must_use]
pub fn transform_raw_route(raw: RawRouteData, id: &str, site_id: &str, now: Timestamp) -> Route {
    Route {
        id: id.to_owned(),
        site_id: site_id.to_owned(),
        path: normalise_route_path(&raw.path),
        title: raw.title.trim().to_owned(),
        description: non_blank(raw.description),
        created_at: now,
    }
}

/// Normalise a route path to a single leading slash without a trailing one.
///
/// Empty segments are collapsed, so `"//blog//posts/"` becomes
/// `"/blog/posts"` and blank input becomes `"/"`.
///
/// # Examples
///
/// ```
/// use sitekit_core::normalise_route_path;
///
/// assert_eq!(normalise_route_path(" about "), "/about");
/// assert_eq!(normalise_route_path(""), "/");
/// ```
#[must_use]
pub fn normalise_route_path(path: &str) -> String {
    let segments: Vec<&str> = path
        .trim()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();
    format!("/{}", segments.join("/"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}
