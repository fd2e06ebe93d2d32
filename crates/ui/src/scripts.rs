use dioxus::document::eval;

use ar_core::Environment;
use services::{ArAnchor, QUICK_LOOK_TAPPED};

const ENVIRONMENT_PROBE_SCRIPT: &str = r#"
    const probe = document.createElement("a");
    const relList = probe.relList;
    return {
        user_agent: navigator.userAgent || "",
        touch_events: "ontouchend" in document,
        ar_relation_supported: !!(relList && relList.supports && relList.supports("ar")),
    };
"#;

/// Read the environment snapshot from the running page.
///
/// Falls back to an empty environment (classified as unsupported) when the
/// script cannot run.
pub async fn probe_environment() -> Environment {
    match eval(ENVIRONMENT_PROBE_SCRIPT).join::<Environment>().await {
        Ok(env) => env,
        Err(err) => {
            tracing::warn!(error = ?err, "environment probe failed");
            Environment::default()
        }
    }
}

pub async fn run_anchor_script(script: String) -> Result<(), String> {
    eval(&script).await.map(|_| ()).map_err(|e| format!("{e:?}"))
}

/// Script that inserts the anchor, clicks it and removes it again.
///
/// With a return link, a `message` listener navigates there on the Quick
/// Look tapped signal and then unregisters itself.
#[must_use]
pub fn anchor_dispatch_script(anchor: &ArAnchor, return_link: Option<&str>) -> String {
    let mut script = format!(
        r#"
    const anchor = document.createElement("a");
    anchor.setAttribute("id", {id});
"#,
        id = js_string_literal(anchor.id),
    );

    if anchor.placeholder_image {
        script.push_str("    anchor.appendChild(document.createElement(\"img\"));\n");
    }
    if let Some(rel) = anchor.rel {
        script.push_str(&format!(
            "    anchor.setAttribute(\"rel\", {});\n",
            js_string_literal(rel)
        ));
    }
    if let Some(link) = return_link {
        script.push_str(&format!(
            r#"    const onMessage = (event) => {{
        if (event.data === {tapped}) {{
            anchor.removeEventListener("message", onMessage, false);
            window.location.href = {link};
        }}
    }};
    anchor.addEventListener("message", onMessage, false);
"#,
            tapped = js_string_literal(QUICK_LOOK_TAPPED),
            link = js_string_literal(link),
        ));
    }

    script.push_str(&format!(
        r#"    anchor.setAttribute("href", {href});
    document.body.appendChild(anchor);
    anchor.click();
    anchor.remove();
"#,
        href = js_string_literal(&anchor.href),
    ));
    script
}

fn js_string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}
