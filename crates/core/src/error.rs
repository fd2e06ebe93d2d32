use thiserror::Error;

use crate::platform::{Platform, Viewer};

/// Raised synchronously when a button cannot be configured.
///
/// These are programmer errors on the embedding page: a missing element
/// reference or a missing model source. They are never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("element cannot be null")]
    MissingElement,

    #[error("{viewer} src cannot be null, undefined or empty")]
    MissingSource { viewer: Viewer },

    #[error("no {viewer} configuration was provided")]
    MissingConfig { viewer: Viewer },

    #[error("platform {platform} has no AR viewer")]
    UnsupportedPlatform { platform: Platform },
}
