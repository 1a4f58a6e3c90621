//! Routes page markup.

use maud::{Markup, html};
use sitekit_core::Route;

/// Render the routes overview for one site.
///
/// Routes appear in the given order; an empty slice renders an empty-state
/// line instead of a list.
#[must_use]
pub fn render_routes_page(routes: &[Route]) -> String {
    html! {
        section class="routes" {
            header {
                h3 { "Routes" }
                p { "Information about site routes" }
            }
            @if routes.is_empty() {
                p class="routes__empty" { "No routes yet." }
            } @else {
                ul class="routes__list" {
                    @for route in routes {
                        (route_item(route))
                    }
                }
            }
        }
    }
    .into_string()
}

fn route_item(route: &Route) -> Markup {
    html! {
        li data-route-id=(route.id) {
            code { (route.path) }
            " " (route.title)
            @if let Some(description) = &route.description {
                p { (description) }
            }
        }
    }
}
