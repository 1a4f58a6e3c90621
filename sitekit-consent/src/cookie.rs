//! A single named cookie with an optional expiry.

use sitekit_core::Timestamp;

const MILLIS_PER_SECOND: i64 = 1_000;

/// A cookie held by a [`CookieJar`](crate::CookieJar).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    /// Cookie name.
    pub name: String,
    /// Raw, already encoded value.
    pub value: String,
    /// Expiry in milliseconds since the epoch; `None` for a session cookie.
    pub expires_at: Option<Timestamp>,
}

impl Cookie {
    /// Session cookie without an expiry.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            expires_at: None,
        }
    }

    /// Set the absolute expiry.
    #[must_use]
    pub const fn expiring_at(mut self, expires_at: Timestamp) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Whether the cookie has expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|expiry| expiry <= now)
    }

    /// Render a `Set-Cookie` header value as seen at `now`.
    ///
    /// `Max-Age` rounds the remaining lifetime up to whole seconds.
    ///
    /// ```
    /// use sitekit_consent::Cookie;
    ///
    /// let cookie = Cookie::new("theme", "dark").expiring_at(61_000);
    /// assert_eq!(
    ///     cookie.to_set_cookie(1_000),
    ///     "theme=dark; Path=/; Max-Age=60; SameSite=Lax"
    /// );
    /// ```
    #[must_use]
    pub fn to_set_cookie(&self, now: Timestamp) -> String {
        let mut header = format!("{}={}; Path=/", self.name, self.value);
        if let Some(expiry) = self.expires_at {
            let remaining = expiry.saturating_sub(now).max(0);
            let seconds = remaining
                .saturating_add(MILLIS_PER_SECOND - 1)
                .div_euclid(MILLIS_PER_SECOND);
            header.push_str(&format!("; Max-Age={seconds}"));
        }
        header.push_str("; SameSite=Lax");
        header
    }
}
