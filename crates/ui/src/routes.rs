use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::context::AppContext;
use crate::views::{ArPageView, CapabilitiesView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", ArPageView)] Home {},
        #[route("/capabilities", CapabilitiesView)] Capabilities {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    let ctx = use_context::<AppContext>();
    rsx! {
        nav { class: "sidebar",
            h1 { "{ctx.title()}" }
            ul {
                li { Link { to: Route::Home {}, "Buttons" } }
                li { Link { to: Route::Capabilities {}, "Capabilities" } }
            }
        }
    }
}
