//! Consent toggles and their cookie encoding.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::ConsentError;

/// Which cookie categories the visitor agreed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentSettings {
    /// Cookies required for the site to work. Always granted.
    pub basic: bool,
    /// Usage analytics.
    pub analytics: bool,
    /// Advertising and targeting.
    pub marketing: bool,
}

impl Default for ConsentSettings {
    fn default() -> Self {
        Self {
            basic: true,
            analytics: true,
            marketing: false,
        }
    }
}

impl ConsentSettings {
    /// Every category granted.
    #[must_use]
    pub const fn all_granted() -> Self {
        Self {
            basic: true,
            analytics: true,
            marketing: true,
        }
    }

    /// Percent-encoded JSON suitable for a cookie value.
    ///
    /// # Errors
    ///
    /// Returns [`ConsentError::Encode`] if serialization fails.
    pub fn to_cookie_value(&self) -> Result<String, ConsentError> {
        let json = serde_json::to_string(self).map_err(ConsentError::Encode)?;
        Ok(form_urlencoded::byte_serialize(json.as_bytes()).collect())
    }

    /// Decode a value produced by [`to_cookie_value`](Self::to_cookie_value).
    ///
    /// Plain JSON is accepted as well.
    ///
    /// # Errors
    ///
    /// Returns [`ConsentError::Decode`] if the value is not consent JSON.
    pub fn from_cookie_value(value: &str) -> Result<Self, ConsentError> {
        let decoded: String = form_urlencoded::parse(value.as_bytes())
            .map(|(key, rest)| {
                if rest.is_empty() {
                    key.into_owned()
                } else {
                    format!("{key}={rest}")
                }
            })
            .collect::<Vec<_>>()
            .join("&");
        serde_json::from_str(&decoded).map_err(ConsentError::Decode)
    }
}
