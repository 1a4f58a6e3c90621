//! Persisted entity shapes and the raw input they are built from.

use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// A registered account.
///
/// The identifier equals the external auth provider's user ID and doubles as
/// the document key in the `users` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// External auth identifier.
    pub id: String,
    /// Public handle; unique by convention, not enforced by the store.
    pub username: String,
    /// Contact address, when the auth provider shares one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Human-friendly name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl User {
    /// Create a user with only the mandatory attributes.
    #[must_use]
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            email: None,
            display_name: None,
        }
    }
}

/// Site attributes as submitted by the creation form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSiteData {
    /// Display name.
    pub name: String,
    /// Requested subdomain label.
    pub subdomain: String,
    /// Optional tagline.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional custom domain.
    #[serde(default)]
    pub custom_domain: Option<String>,
}

impl RawSiteData {
    /// Create raw input with a name and subdomain.
    #[must_use]
    pub fn new(name: impl Into<String>, subdomain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subdomain: subdomain.into(),
            description: None,
            custom_domain: None,
        }
    }

    /// Attach a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a custom domain.
    #[must_use]
    pub fn with_custom_domain(mut self, domain: impl Into<String>) -> Self {
        self.custom_domain = Some(domain.into());
        self
    }
}

/// A site owned by a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    /// Generated identifier, equal to the document key at creation.
    pub id: String,
    /// Owner's [`User::id`].
    pub user_id: String,
    /// Display name.
    pub name: String,
    /// Lower-case subdomain label.
    pub subdomain: String,
    /// Optional tagline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional lower-case custom domain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_domain: Option<String>,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last update time; refreshed by every partial update.
    pub updated_at: Timestamp,
    /// Store-assigned document key, populated on listing reads only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,
}

/// Partial update applied to a stored [`Site`].
///
/// Absent fields are left untouched. `updated_at` is not part of the patch:
/// it is stamped by the repository on every update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitePatch {
    /// Replacement display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Replacement subdomain label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<String>,
    /// Replacement tagline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Replacement custom domain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_domain: Option<String>,
}

impl SitePatch {
    /// Set the replacement name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the replacement subdomain.
    #[must_use]
    pub fn subdomain(mut self, subdomain: impl Into<String>) -> Self {
        self.subdomain = Some(subdomain.into());
        self
    }

    /// Set the replacement description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the replacement custom domain.
    #[must_use]
    pub fn custom_domain(mut self, domain: impl Into<String>) -> Self {
        self.custom_domain = Some(domain.into());
        self
    }

    /// Whether the patch changes nothing besides the update timestamp.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.subdomain.is_none()
            && self.description.is_none()
            && self.custom_domain.is_none()
    }
}

/// Route attributes as submitted by the creation form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRouteData {
    /// URL path, with or without a leading slash.
    pub path: String,
    /// Page title.
    pub title: String,
    /// Optional summary.
    #[serde(default)]
    pub description: Option<String>,
}

impl RawRouteData {
    /// Create raw input with a path and title.
    #[must_use]
    pub fn new(path: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            description: None,
        }
    }

    /// Attach a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A route belonging to a [`Site`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Generated identifier, equal to the document key.
    pub id: String,
    /// Owning [`Site::id`].
    pub site_id: String,
    /// Normalised URL path, always starting with `/`.
    pub path: String,
    /// Page title.
    pub title: String,
    /// Optional summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creation time.
    pub created_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn site_omits_doc_id_when_absent() {
        let site = Site {
            id: "s1".into(),
            user_id: "u1".into(),
            name: "Bakery".into(),
            subdomain: "bakery".into(),
            description: None,
            custom_domain: None,
            created_at: 1,
            updated_at: 1,
            doc_id: None,
        };
        let value = serde_json::to_value(&site).expect("serialize site");
        assert!(value.get("doc_id").is_none());
        assert!(value.get("description").is_none());
    }

    #[rstest]
    fn patch_serializes_only_present_fields() {
        let patch = SitePatch::default().name("x");
        let value = serde_json::to_value(&patch).expect("serialize patch");
        assert_eq!(value, json!({"name": "x"}));
        assert!(!patch.is_empty());
        assert!(SitePatch::default().is_empty());
    }

    #[rstest]
    fn raw_site_accepts_missing_optionals() {
        let raw: RawSiteData =
            serde_json::from_value(json!({"name": "n", "subdomain": "s"})).expect("decode");
        assert_eq!(raw, RawSiteData::new("n", "s"));
    }
}
