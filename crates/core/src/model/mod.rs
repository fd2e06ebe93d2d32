pub mod attributes;
mod quick_look;
mod scene_viewer;

use serde::{Deserialize, Serialize};

pub use attributes::{Attributes, names};
pub use quick_look::{PLACEHOLDER_SUBTITLE, QuickLookConfig};
pub use scene_viewer::{DEFAULT_FALLBACK_URL, SceneViewerConfig};

/// Per-platform configuration handed to the programmatic configure call.
///
/// Only the branch matching the detected platform is ever applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArButtonConfig {
    #[serde(rename = "androidConf")]
    pub android: Option<SceneViewerConfig>,
    #[serde(rename = "iosConf")]
    pub ios: Option<QuickLookConfig>,
}

impl ArButtonConfig {
    #[must_use]
    pub fn android(config: SceneViewerConfig) -> Self {
        Self {
            android: Some(config),
            ios: None,
        }
    }

    #[must_use]
    pub fn ios(config: QuickLookConfig) -> Self {
        Self {
            android: None,
            ios: Some(config),
        }
    }

    #[must_use]
    pub fn with_android(mut self, config: SceneViewerConfig) -> Self {
        self.android = Some(config);
        self
    }

    #[must_use]
    pub fn with_ios(mut self, config: QuickLookConfig) -> Self {
        self.ios = Some(config);
        self
    }
}
