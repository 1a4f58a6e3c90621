//! Banner state driven by the consent cookie.

use log::{debug, warn};
use sitekit_core::{Clock, Timestamp};

use crate::{ConsentError, ConsentSettings, Cookie, CookieJar};

/// Name of the cookie recording the visitor's consent.
pub const CONSENT_COOKIE: &str = "__cookie_consent";

/// Days a saved choice stays valid.
pub const CONSENT_TTL_DAYS: i64 = 365;

const CONSENT_TTL_MS: Timestamp = CONSENT_TTL_DAYS * 24 * 60 * 60 * 1_000;

/// Consent banner for one visitor session.
///
/// The banner is shown while no unexpired consent cookie exists. Toggles
/// start from the stored choice when it can be read and from
/// [`ConsentSettings::default`] otherwise; the basic toggle never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsentBanner {
    visible: bool,
    settings: ConsentSettings,
}

impl ConsentBanner {
    /// Read the consent cookie once and derive the session's banner state.
    #[must_use]
    pub fn initialise<J: CookieJar + ?Sized>(jar: &J, clock: &dyn Clock) -> Self {
        let now = clock.now_millis();
        let present = jar
            .get(CONSENT_COOKIE)
            .is_some_and(|cookie| !cookie.is_expired(now));
        let settings = if present {
            Self::stored_settings(jar, clock).unwrap_or_default()
        } else {
            ConsentSettings::default()
        };
        debug!("consent banner initialised, visible: {}", !present);
        Self {
            visible: !present,
            settings,
        }
    }

    /// Whether the banner should be rendered.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Current toggle positions.
    #[must_use]
    pub const fn settings(&self) -> ConsentSettings {
        self.settings
    }

    /// Flip the analytics toggle.
    pub const fn set_analytics(&mut self, granted: bool) {
        self.settings.analytics = granted;
    }

    /// Flip the marketing toggle.
    pub const fn set_marketing(&mut self, granted: bool) {
        self.settings.marketing = granted;
    }

    /// Persist the current toggles and hide the banner.
    ///
    /// # Errors
    ///
    /// Returns [`ConsentError`] when encoding fails or the jar refuses the
    /// cookie; the banner stays visible in that case.
    pub fn save<J: CookieJar + ?Sized>(
        &mut self,
        jar: &mut J,
        clock: &dyn Clock,
    ) -> Result<(), ConsentError> {
        self.persist(self.settings, jar, clock)
    }

    /// Grant every category, persist and hide the banner.
    ///
    /// # Errors
    ///
    /// Returns [`ConsentError`] when encoding fails or the jar refuses the
    /// cookie.
    pub fn accept_all<J: CookieJar + ?Sized>(
        &mut self,
        jar: &mut J,
        clock: &dyn Clock,
    ) -> Result<(), ConsentError> {
        self.persist(ConsentSettings::all_granted(), jar, clock)
    }

    /// Decode the choice stored in `jar`, ignoring expired cookies.
    ///
    /// Undecodable values yield `None`. The basic toggle always reads as
    /// granted, whatever the cookie holds.
    #[must_use]
    pub fn stored_settings<J: CookieJar + ?Sized>(
        jar: &J,
        clock: &dyn Clock,
    ) -> Option<ConsentSettings> {
        let cookie = jar.get(CONSENT_COOKIE)?;
        if cookie.is_expired(clock.now_millis()) {
            return None;
        }
        ConsentSettings::from_cookie_value(&cookie.value)
            .inspect_err(|err| warn!("ignoring unreadable {CONSENT_COOKIE} cookie: {err}"))
            .ok()
            .map(|settings| ConsentSettings {
                basic: true,
                ..settings
            })
    }

    fn persist<J: CookieJar + ?Sized>(
        &mut self,
        settings: ConsentSettings,
        jar: &mut J,
        clock: &dyn Clock,
    ) -> Result<(), ConsentError> {
        let stored = ConsentSettings {
            basic: true,
            ..settings
        };
        let expires_at = clock.now_millis().saturating_add(CONSENT_TTL_MS);
        let cookie = Cookie::new(CONSENT_COOKIE, stored.to_cookie_value()?).expiring_at(expires_at);
        jar.set(cookie)?;
        self.settings = stored;
        self.visible = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryCookieJar;
    use rstest::{fixture, rstest};
    use sitekit_core::test_support::ManualClock;

    #[fixture]
    fn clock() -> ManualClock {
        ManualClock::starting_at(1_000)
    }

    #[rstest]
    fn fresh_session_shows_defaults(clock: ManualClock) {
        let banner = ConsentBanner::initialise(&MemoryCookieJar::new(), &clock);
        assert!(banner.is_visible());
        assert_eq!(banner.settings(), ConsentSettings::default());
    }

    #[rstest]
    fn save_persists_toggles_for_a_year(clock: ManualClock) {
        let mut jar = MemoryCookieJar::new();
        let mut banner = ConsentBanner::initialise(&jar, &clock);
        banner.set_analytics(false);
        banner.set_marketing(true);
        banner.save(&mut jar, &clock).expect("save");

        assert!(!banner.is_visible());
        let cookie = jar.get(CONSENT_COOKIE).expect("cookie written");
        assert_eq!(cookie.expires_at, Some(1_000 + CONSENT_TTL_MS));
        assert_eq!(
            ConsentBanner::stored_settings(&jar, &clock),
            Some(ConsentSettings {
                basic: true,
                analytics: false,
                marketing: true,
            })
        );
    }

    #[rstest]
    fn stored_choice_hides_banner_and_seeds_toggles(clock: ManualClock) {
        let mut jar = MemoryCookieJar::new();
        let mut first = ConsentBanner::initialise(&jar, &clock);
        first.set_marketing(true);
        first.save(&mut jar, &clock).expect("save");

        let second = ConsentBanner::initialise(&jar, &clock);
        assert!(!second.is_visible());
        assert!(second.settings().marketing);
    }

    #[rstest]
    fn expired_choice_shows_banner_again(clock: ManualClock) {
        let mut jar = MemoryCookieJar::new();
        ConsentBanner::initialise(&jar, &clock)
            .accept_all(&mut jar, &clock)
            .expect("accept");
        clock.advance(CONSENT_TTL_MS);
        let banner = ConsentBanner::initialise(&jar, &clock);
        assert!(banner.is_visible());
        assert!(ConsentBanner::stored_settings(&jar, &clock).is_none());
    }

    #[rstest]
    fn garbage_value_keeps_banner_hidden_with_defaults(clock: ManualClock) {
        let jar = MemoryCookieJar::from_header("__cookie_consent=not-json");
        let banner = ConsentBanner::initialise(&jar, &clock);
        assert!(!banner.is_visible());
        assert_eq!(banner.settings(), ConsentSettings::default());
        assert!(ConsentBanner::stored_settings(&jar, &clock).is_none());
    }

    #[rstest]
    fn stored_basic_refusal_is_overridden(clock: ManualClock) {
        let jar = MemoryCookieJar::from_header(
            r#"__cookie_consent={"basic":false,"analytics":true,"marketing":true}"#,
        );
        let banner = ConsentBanner::initialise(&jar, &clock);
        assert!(!banner.is_visible());
        assert_eq!(banner.settings(), ConsentSettings::all_granted());
        assert_eq!(
            ConsentBanner::stored_settings(&jar, &clock).map(|stored| stored.basic),
            Some(true)
        );
    }

    #[rstest]
    fn refused_cookie_leaves_banner_visible(clock: ManualClock) {
        struct FullJar;
        impl CookieJar for FullJar {
            fn get(&self, _name: &str) -> Option<Cookie> {
                None
            }
            fn set(&mut self, cookie: Cookie) -> Result<(), ConsentError> {
                Err(ConsentError::Jar {
                    name: cookie.name,
                    reason: "jar is full",
                })
            }
        }

        let mut jar = FullJar;
        let mut banner = ConsentBanner::initialise(&jar, &clock);
        let err = banner.accept_all(&mut jar, &clock).expect_err("refused");
        assert!(matches!(err, ConsentError::Jar { .. }));
        assert!(banner.is_visible());
    }
}
