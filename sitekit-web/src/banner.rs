//! Cookie consent banner markup.

use maud::{Markup, html};
use sitekit_consent::ConsentBanner;

/// Where the banner's policy link points.
pub const PRIVACY_POLICY_PATH: &str = "/legal/privacy-policy";

const INTRO: &str = "This website stores data such as cookies to enable necessary basic site \
functionality, including optional analytics and targeting. You may change your settings at \
any time or accept the default settings.";

/// Render the consent banner for the current toggle state.
///
/// The root element carries `hidden` once the visitor has chosen.
#[must_use]
pub fn render_cookie_banner(banner: &ConsentBanner) -> String {
    let settings = banner.settings();
    html! {
        div class="cookie-banner" role="dialog" hidden[!banner.is_visible()] {
            p {
                (INTRO) " "
                a href=(PRIVACY_POLICY_PATH) target="_blank" rel="noopener" {
                    "Privacy and Data Policy"
                }
            }
            div class="cookie-banner__switches" {
                (switch("basic", "Basic", settings.basic, true))
                (switch("analytics", "Analytics", settings.analytics, false))
                (switch("marketing", "Marketing", settings.marketing, false))
            }
            div class="cookie-banner__actions" {
                button type="submit" name="consent" value="save" { "Save" }
                button type="submit" name="consent" value="all" { "Accept All" }
            }
        }
    }
    .into_string()
}

fn switch(name: &str, label: &str, checked: bool, locked: bool) -> Markup {
    html! {
        label {
            input type="checkbox" role="switch" name=(name) checked[checked] disabled[locked];
            " " (label)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use sitekit_consent::MemoryCookieJar;
    use sitekit_core::test_support::ManualClock;

    fn fresh() -> ConsentBanner {
        ConsentBanner::initialise(&MemoryCookieJar::new(), &ManualClock::starting_at(0))
    }

    #[rstest]
    fn visible_banner_lists_switches_and_buttons() {
        let html = render_cookie_banner(&fresh());
        assert!(html.starts_with(r#"<div class="cookie-banner" role="dialog">"#));
        assert!(html.contains(r#"href="/legal/privacy-policy""#));
        assert!(html.contains(r#"name="basic" checked disabled> Basic"#));
        assert!(html.contains(r#"name="analytics" checked> Analytics"#));
        assert!(html.contains(r#"name="marketing"> Marketing"#));
        assert!(html.contains(">Save</button>"));
        assert!(html.contains(">Accept All</button>"));
    }

    #[rstest]
    fn decided_banner_is_hidden() {
        let clock = ManualClock::starting_at(0);
        let mut jar = MemoryCookieJar::new();
        let mut banner = ConsentBanner::initialise(&jar, &clock);
        banner.accept_all(&mut jar, &clock).expect("accept");
        let html = render_cookie_banner(&banner);
        assert!(html.starts_with(r#"<div class="cookie-banner" role="dialog" hidden>"#));
        assert!(html.contains(r#"name="marketing" checked>"#));
    }

    #[rstest]
    fn basic_switch_stays_checked_for_a_stored_refusal() {
        let jar = MemoryCookieJar::from_header(
            r#"__cookie_consent={"basic":false,"analytics":false,"marketing":false}"#,
        );
        let banner = ConsentBanner::initialise(&jar, &ManualClock::starting_at(0));
        let html = render_cookie_banner(&banner);
        assert!(html.contains(r#"name="basic" checked disabled> Basic"#));
        assert!(html.contains(r#"name="analytics"> Analytics"#));
    }
}
