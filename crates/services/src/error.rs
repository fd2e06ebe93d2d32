//! Shared error types for the services crate.

use thiserror::Error;

use ar_core::Platform;

/// Failures reported to the embedding page instead of being returned.
///
/// Each is terminal for the click that produced it; the page decides
/// whether to show anything to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Diagnostic {
    #[error("this platform does not support AR ({platform})")]
    PlatformUnsupported { platform: Platform },
    #[error("AR is not available: {reason}")]
    ArUnavailable { reason: String },
    /// The anchor was handed off but the page failed to click it.
    #[error("AR viewer could not be opened: {0}")]
    HostFailed(HostError),
}

/// Errors emitted by an `AnchorHost` while handing an anchor to the page.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HostError {
    #[error("anchor host is unavailable: {0}")]
    Unavailable(String),
    #[error("anchor script failed: {0}")]
    Script(String),
}
