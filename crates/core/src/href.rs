//! Deep-link construction for the two AR viewers.
//!
//! Both builders are pure: they validate the model source and assemble the
//! string, nothing else. Parameter order is fixed so output is reproducible.

use std::fmt;

use percent_encoding::{AsciiSet, CONTROLS, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::ConfigurationError;
use crate::model::{ArButtonConfig, QuickLookConfig, SceneViewerConfig};
use crate::platform::{Platform, Viewer};

/// Same output as JavaScript's `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// URL-valued query parameters inside an intent link. Keeps `scheme://host/path`
/// readable while escaping anything that would end the value or the intent.
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b';')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

const SCENE_VIEWER_BASE: &str = "intent://arvr.google.com/scene-viewer/1.0";
const SCENE_VIEWER_INTENT: &str =
    "#Intent;scheme=https;package=com.google.ar.core;action=android.intent.action.VIEW;";

#[must_use]
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

/// A built AR link. Recomputed from the config whenever it changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeepLink(String);

impl DeepLink {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DeepLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DeepLink {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn require_src(src: &str, viewer: Viewer) -> Result<&str, ConfigurationError> {
    if src.trim().is_empty() {
        return Err(ConfigurationError::MissingSource { viewer });
    }
    Ok(src)
}

fn push_param(href: &mut String, key: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        href.push('&');
        href.push_str(key);
        href.push('=');
        href.push_str(&encode_component(value));
    }
}

/// `<src>#&checkoutTitle=…&…` for AR Quick Look.
///
/// # Errors
///
/// Returns `ConfigurationError::MissingSource` when `src` is blank.
pub fn build_quick_look_href(config: &QuickLookConfig) -> Result<DeepLink, ConfigurationError> {
    let src = require_src(&config.src, Viewer::QuickLook)?;

    let mut href = format!("{src}#");
    push_param(&mut href, "checkoutTitle", config.checkout_title.as_deref());
    push_param(
        &mut href,
        "checkoutSubtitle",
        config.checkout_subtitle.as_deref(),
    );
    push_param(&mut href, "price", config.price.as_deref());
    push_param(&mut href, "callToAction", config.call_to_action.as_deref());
    push_param(
        &mut href,
        "canonicalWebPageURL",
        config.canonical_web_page_url.as_deref(),
    );
    if config.allows_content_scaling == Some(false) {
        href.push_str("&allowsContentScaling=0");
    }

    Ok(DeepLink(href))
}

/// `intent://arvr.google.com/scene-viewer/1.0?file=…#Intent;…;end;` for Scene Viewer.
///
/// # Errors
///
/// Returns `ConfigurationError::MissingSource` when `src` is blank.
pub fn build_scene_viewer_href(
    config: &SceneViewerConfig,
) -> Result<DeepLink, ConfigurationError> {
    let src = require_src(&config.src, Viewer::SceneViewer)?;

    let mut href = format!(
        "{SCENE_VIEWER_BASE}?file={}&mode=ar_only",
        encode_query_value(src)
    );
    if !config.occlusion {
        href.push_str("&disable_occlusion=true");
    }
    push_param(&mut href, "title", config.title.as_deref());
    if let Some(link) = config.link.as_deref().filter(|l| !l.is_empty()) {
        href.push_str("&link=");
        href.push_str(&encode_query_value(link));
    }
    href.push_str(SCENE_VIEWER_INTENT);
    href.push_str("S.browser_fallback_url=");
    href.push_str(&encode_component(config.fallback_url()));
    href.push_str(";end;");

    Ok(DeepLink(href))
}

/// Build the link for whichever viewer the platform uses.
///
/// # Errors
///
/// `UnsupportedPlatform` when the platform has no viewer, `MissingConfig`
/// when the matching branch is absent, `MissingSource` when its `src` is blank.
pub fn build_href(
    platform: Platform,
    config: &ArButtonConfig,
) -> Result<DeepLink, ConfigurationError> {
    match platform.viewer() {
        Some(Viewer::QuickLook) => config
            .ios
            .as_ref()
            .ok_or(ConfigurationError::MissingConfig {
                viewer: Viewer::QuickLook,
            })
            .and_then(build_quick_look_href),
        Some(Viewer::SceneViewer) => config
            .android
            .as_ref()
            .ok_or(ConfigurationError::MissingConfig {
                viewer: Viewer::SceneViewer,
            })
            .and_then(build_scene_viewer_href),
        None => Err(ConfigurationError::UnsupportedPlatform { platform }),
    }
}
