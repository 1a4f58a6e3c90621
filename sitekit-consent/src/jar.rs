//! Cookie storage seam.

use std::collections::BTreeMap;

use log::debug;

use crate::{ConsentError, Cookie};

/// Somewhere cookies are read from and written to.
///
/// Browsers, HTTP request/response pairs and tests each provide their own
/// jar. Expiry is interpreted by callers; jars return whatever they hold.
pub trait CookieJar {
    /// Cookie stored under `name`, if any.
    fn get(&self, name: &str) -> Option<Cookie>;

    /// Store `cookie`, replacing any cookie with the same name.
    ///
    /// # Errors
    ///
    /// Returns [`ConsentError::Jar`] when the jar cannot hold the cookie.
    fn set(&mut self, cookie: Cookie) -> Result<(), ConsentError>;
}

/// [`CookieJar`] backed by a map, recording every write.
///
/// Seed it from a request's `Cookie` header with
/// [`from_header`](Self::from_header) and turn the writes back into
/// `Set-Cookie` values with [`set_cookie_headers`](Self::set_cookie_headers).
#[derive(Debug, Clone, Default)]
pub struct MemoryCookieJar {
    cookies: BTreeMap<String, Cookie>,
    written: Vec<String>,
}

impl MemoryCookieJar {
    /// Empty jar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `Cookie` request header such as `a=1; b=2`.
    ///
    /// Pairs without `=` or with an empty name are skipped. Parsed cookies
    /// carry no expiry and do not count as writes.
    #[must_use]
    pub fn from_header(header: &str) -> Self {
        let cookies = header
            .split(';')
            .filter_map(|pair| pair.split_once('='))
            .map(|(name, value)| (name.trim(), value.trim()))
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, value)| (name.to_owned(), Cookie::new(name, value)))
            .collect();
        Self {
            cookies,
            written: Vec::new(),
        }
    }

    /// `Set-Cookie` values for every cookie written since construction, in
    /// write order.
    #[must_use]
    pub fn set_cookie_headers(&self, now: sitekit_core::Timestamp) -> Vec<String> {
        self.written
            .iter()
            .filter_map(|name| self.cookies.get(name))
            .map(|cookie| cookie.to_set_cookie(now))
            .collect()
    }
}

impl CookieJar for MemoryCookieJar {
    fn get(&self, name: &str) -> Option<Cookie> {
        self.cookies.get(name).cloned()
    }

    fn set(&mut self, cookie: Cookie) -> Result<(), ConsentError> {
        if let Some(reason) = invalid_name(&cookie.name) {
            return Err(ConsentError::Jar {
                name: cookie.name,
                reason,
            });
        }
        debug!("setting cookie {}", cookie.name);
        self.written.retain(|name| name != &cookie.name);
        self.written.push(cookie.name.clone());
        self.cookies.insert(cookie.name.clone(), cookie);
        Ok(())
    }
}

fn invalid_name(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        Some("name is empty")
    } else if name
        .chars()
        .any(|ch| ch.is_whitespace() || ch.is_control() || matches!(ch, ';' | '=' | ','))
    {
        Some("name contains a separator")
    } else {
        None
    }
}
