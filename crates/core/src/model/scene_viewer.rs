use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::model::attributes::{Attributes, names, set_optional};
use crate::platform::Viewer;

/// Where Android sends the user when ARCore is not installed.
pub const DEFAULT_FALLBACK_URL: &str = "https://developers.google.com/ar";

/// Configuration for a Scene Viewer hand-off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneViewerConfig {
    /// glTF / GLB file URL.
    pub src: String,
    /// Name shown in the viewer UI.
    pub title: Option<String>,
    /// External page; adds a button to the viewer UI.
    pub link: Option<String>,
    #[serde(rename = "fallbackURL")]
    pub fallback_url: Option<String>,
    /// Object blending with the real world.
    #[serde(default)]
    pub occlusion: bool,
}

impl SceneViewerConfig {
    #[must_use]
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn fallback_url(&self) -> &str {
        self.fallback_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_FALLBACK_URL)
    }

    /// Read the Android branch of a button's attributes.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::MissingSource` when `src` is absent or blank.
    pub fn from_attributes(attrs: &Attributes) -> Result<Self, ConfigurationError> {
        let src = attrs
            .non_empty(names::SRC)
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigurationError::MissingSource {
                viewer: Viewer::SceneViewer,
            })?;

        let owned = |name: &str| attrs.non_empty(name).map(str::to_owned);

        Ok(Self {
            src: src.to_owned(),
            title: owned(names::TITLE),
            link: owned(names::LINK),
            fallback_url: owned(names::FALLBACK_URL),
            occlusion: attrs.has(names::OCCLUSION),
        })
    }

    pub fn write_attributes(&self, attrs: &mut Attributes) {
        attrs.set(names::SRC, self.src.as_str());
        set_optional(attrs, names::TITLE, self.title.as_deref());
        set_optional(attrs, names::LINK, self.link.as_deref());
        set_optional(attrs, names::FALLBACK_URL, self.fallback_url.as_deref());
        if self.occlusion {
            attrs.set_flag(names::OCCLUSION);
        } else {
            attrs.remove(names::OCCLUSION);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_android_attributes() {
        let attrs: Attributes = [
            ("src", "chair.glb"),
            ("title", "Chair"),
            ("link", "https://shop.example"),
            ("occlusion", ""),
            ("ios-src", "chair.usdz"),
        ]
        .into_iter()
        .collect();

        let config = SceneViewerConfig::from_attributes(&attrs).unwrap();
        assert_eq!(config.src, "chair.glb");
        assert_eq!(config.title.as_deref(), Some("Chair"));
        assert_eq!(config.link.as_deref(), Some("https://shop.example"));
        assert!(config.occlusion);
        assert_eq!(config.fallback_url(), DEFAULT_FALLBACK_URL);
    }

    #[test]
    fn missing_src_is_rejected() {
        let attrs: Attributes = [("ios-src", "chair.usdz")].into_iter().collect();
        let err = SceneViewerConfig::from_attributes(&attrs).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MissingSource {
                viewer: Viewer::SceneViewer
            }
        );
    }

    #[test]
    fn custom_fallback_is_kept() {
        let attrs: Attributes = [("src", "a.glb"), ("fallback-url", "https://help.example")]
            .into_iter()
            .collect();
        let config = SceneViewerConfig::from_attributes(&attrs).unwrap();
        assert_eq!(config.fallback_url(), "https://help.example");
    }

    #[test]
    fn occlusion_flag_round_trips_through_attributes() {
        let mut attrs = Attributes::new();
        let mut config = SceneViewerConfig {
            occlusion: true,
            ..SceneViewerConfig::new("a.glb")
        };
        config.write_attributes(&mut attrs);
        assert!(attrs.has("occlusion"));

        config.occlusion = false;
        config.write_attributes(&mut attrs);
        assert!(!attrs.has("occlusion"));
        assert_eq!(SceneViewerConfig::from_attributes(&attrs).unwrap(), config);
    }
}
