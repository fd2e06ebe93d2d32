use dioxus::prelude::*;

use ar_core::platform::ios_version;
use ar_core::{Environment, Platform, Session};

use crate::context::AppContext;
use crate::scripts::probe_environment;

#[derive(Clone, PartialEq)]
struct Capabilities {
    env: Environment,
    platform: Platform,
    quick_look: bool,
    chrome_on_ios: bool,
}

impl Capabilities {
    fn from_environment(env: Environment) -> Self {
        let session = Session::detect(env);
        Self {
            platform: session.platform(),
            quick_look: session.quick_look_compatible(),
            chrome_on_ios: session.is_chrome_on_ios(),
            env: session.environment().clone(),
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

#[component]
pub fn CapabilitiesView() -> Element {
    let ctx = use_context::<AppContext>();
    let environment_override = ctx.environment_override();
    let caps = use_resource(move || {
        let environment_override = environment_override.clone();
        async move {
            let env = match environment_override {
                Some(env) => env,
                None => probe_environment().await,
            };
            Capabilities::from_environment(env)
        }
    });

    let Some(caps) = caps.read().clone() else {
        return rsx! {
            div { class: "page",
                h2 { "Capabilities" }
                p { "Probing…" }
            }
        };
    };

    let version = ios_version(&caps.env.user_agent)
        .map(|v| v.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    rsx! {
        div { class: "page capabilities",
            h2 { "Capabilities" }
            dl {
                dt { "User agent" }
                dd { "{caps.env.user_agent}" }
                dt { "Platform" }
                dd { "{caps.platform}" }
                dt { "Apple OS version" }
                dd { "{version}" }
                dt { "Touch events" }
                dd { {yes_no(caps.env.touch_events)} }
                dt { "AR Quick Look compatible" }
                dd { {yes_no(caps.quick_look)} }
                dt { "Chrome on iOS" }
                dd { {yes_no(caps.chrome_on_ios)} }
            }
        }
    }
}
