use dioxus::prelude::*;

use ar_core::model::names;
use services::{ArButtonElement, ButtonId};

/// Renders one `<ar-button>` with its current attributes.
///
/// The trigger stays disabled until the element has a click binding.
#[component]
pub fn ArButtonView(
    element: ArButtonElement,
    label: String,
    on_activate: EventHandler<ButtonId>,
) -> Element {
    let id = element.id();
    let attrs = element.attributes();
    let attr = |name: &str| attrs.get(name).map(str::to_owned);
    let bound = element.binding().is_some();

    rsx! {
        ar-button {
            "id": "{id}",
            "src": attr(names::SRC),
            "ios-src": attr(names::IOS_SRC),
            "link": attr(names::LINK),
            "ios-link": attr(names::IOS_LINK),
            "title": attr(names::TITLE),
            "checkout-title": attr(names::CHECKOUT_TITLE),
            "checkout-subtitle": attr(names::CHECKOUT_SUBTITLE),
            "price": attr(names::PRICE),
            "call-to-action": attr(names::CALL_TO_ACTION),
            "canonical-web-page-url": attr(names::CANONICAL_WEB_PAGE_URL),
            "allows-content-scaling": attr(names::ALLOWS_CONTENT_SCALING),
            "fallback-url": attr(names::FALLBACK_URL),
            "occlusion": attr(names::OCCLUSION),
            "ar": attr(names::AR),
            "deferred": attr(names::DEFERRED),
            button {
                class: "ar-activate",
                disabled: !bound,
                onclick: move |_| on_activate.call(id),
                "{label}"
            }
        }
    }
}
