#![forbid(unsafe_code)]

pub mod error;
pub mod href;
pub mod model;
pub mod platform;

pub use error::ConfigurationError;
pub use href::{DeepLink, build_href, build_quick_look_href, build_scene_viewer_href};
pub use model::{ArButtonConfig, Attributes, QuickLookConfig, SceneViewerConfig};
pub use platform::{Environment, OsVersion, Platform, Session, Viewer};
