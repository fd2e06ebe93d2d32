use std::sync::{Arc, Mutex};

use ar_core::{Session, Viewer};

use crate::diagnostics::DiagnosticSinkRef;
use crate::document::ClickBinding;
use crate::error::{Diagnostic, HostError};

/// Message Quick Look posts to the anchor when its action button is tapped.
pub const QUICK_LOOK_TAPPED: &str = "_apple_ar_quicklook_button_tapped";

pub const ANCHOR_ID: &str = "ar-anchor";

/// The transient anchor the page inserts and clicks to start AR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArAnchor {
    pub id: &'static str,
    pub href: String,
    /// `Some("ar")` for Quick Look.
    pub rel: Option<&'static str>,
    /// Quick Look only recognizes the gesture when the anchor wraps an image.
    pub placeholder_image: bool,
}

impl ArAnchor {
    fn quick_look(href: &str) -> Self {
        Self {
            id: ANCHOR_ID,
            href: href.to_owned(),
            rel: Some("ar"),
            placeholder_image: true,
        }
    }

    fn scene_viewer(href: &str) -> Self {
        Self {
            id: ANCHOR_ID,
            href: href.to_owned(),
            rel: None,
            placeholder_image: false,
        }
    }
}

/// One-shot registration for the Quick Look "button tapped" message.
///
/// Consumed by the first matching message or by `cancel`. Dropping it has
/// the same effect as cancelling.
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct ReturnListener {
    link: String,
}

impl ReturnListener {
    pub fn new(link: impl Into<String>) -> Self {
        Self { link: link.into() }
    }

    #[must_use]
    pub fn link(&self) -> &str {
        &self.link
    }

    /// Feed a message posted to the anchor.
    ///
    /// # Errors
    ///
    /// Hands the listener back untouched when the message is not the
    /// Quick Look signal.
    pub fn deliver(self, data: &str) -> Result<String, Self> {
        if data == QUICK_LOOK_TAPPED {
            Ok(self.link)
        } else {
            Err(self)
        }
    }

    pub fn cancel(self) {}
}

/// The page side of activation: insert the anchor, click it, remove it.
pub trait AnchorHost: Send + Sync {
    /// # Errors
    ///
    /// Returns `HostError` if the anchor could not be handed to the page.
    fn dispatch(&self, anchor: ArAnchor, listener: Option<ReturnListener>)
    -> Result<(), HostError>;
}

pub type AnchorHostRef = Arc<dyn AnchorHost>;

/// Records anchors instead of clicking them. Used by tests and the CLI.
#[derive(Debug, Clone, Default)]
pub struct MemoryAnchorHost {
    dispatched: Arc<Mutex<Vec<ArAnchor>>>,
    pending: Arc<Mutex<Option<ReturnListener>>>,
    navigations: Arc<Mutex<Vec<String>>>,
}

impl MemoryAnchorHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn dispatched(&self) -> Vec<ArAnchor> {
        self.dispatched
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn has_pending_listener(&self) -> bool {
        self.pending.lock().is_ok_and(|guard| guard.is_some())
    }

    /// Simulate the OS posting a message to the last anchor.
    pub fn deliver_message(&self, data: &str) {
        let Ok(mut pending) = self.pending.lock() else {
            return;
        };
        let Some(listener) = pending.take() else {
            return;
        };
        match listener.deliver(data) {
            Ok(link) => {
                if let Ok(mut navigations) = self.navigations.lock() {
                    navigations.push(link);
                }
            }
            Err(listener) => *pending = Some(listener),
        }
    }

    /// Simulate the page being navigated away from.
    pub fn discard(&self) {
        let listener = self.pending.lock().ok().and_then(|mut pending| pending.take());
        if let Some(listener) = listener {
            listener.cancel();
        }
    }

    #[must_use]
    pub fn navigations(&self) -> Vec<String> {
        self.navigations
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl AnchorHost for MemoryAnchorHost {
    fn dispatch(
        &self,
        anchor: ArAnchor,
        listener: Option<ReturnListener>,
    ) -> Result<(), HostError> {
        self.dispatched
            .lock()
            .map_err(|e| HostError::Unavailable(e.to_string()))?
            .push(anchor);
        *self
            .pending
            .lock()
            .map_err(|e| HostError::Unavailable(e.to_string()))? = listener;
        Ok(())
    }
}

/// Result of one click on an AR button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// The anchor was handed to the page.
    Dispatched(ArAnchor),
    /// Nothing happened; the diagnostic was reported.
    Declined(Diagnostic),
    /// The host failed to click the anchor.
    HostFailed(HostError),
    /// The button has no binding yet (deferred or failed configuration).
    NotInitialized,
}

/// Performs the platform hand-off for a bound button.
#[derive(Clone)]
pub struct Activator {
    session: Session,
    host: AnchorHostRef,
    diagnostics: DiagnosticSinkRef,
}

impl Activator {
    #[must_use]
    pub fn new(session: Session, host: AnchorHostRef, diagnostics: DiagnosticSinkRef) -> Self {
        Self {
            session,
            host,
            diagnostics,
        }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn activate(&self, binding: &ClickBinding) -> ActivationOutcome {
        if self.session.platform().viewer().is_none() {
            return self.decline(Diagnostic::PlatformUnsupported {
                platform: self.session.platform(),
            });
        }

        let (anchor, listener) = match binding.viewer {
            Viewer::QuickLook => {
                if !(self.session.is_chrome_on_ios() || self.session.quick_look_compatible()) {
                    return self.decline(Diagnostic::ArUnavailable {
                        reason: "AR Quick Look is not supported by this browser".into(),
                    });
                }
                let listener = binding
                    .return_link
                    .as_deref()
                    .filter(|link| !link.is_empty())
                    .map(ReturnListener::new);
                (ArAnchor::quick_look(binding.href.as_str()), listener)
            }
            Viewer::SceneViewer => (ArAnchor::scene_viewer(binding.href.as_str()), None),
        };

        tracing::debug!(viewer = ?binding.viewer, href = %anchor.href, "dispatching ar anchor");
        match self.host.dispatch(anchor.clone(), listener) {
            Ok(()) => ActivationOutcome::Dispatched(anchor),
            Err(err) => {
                tracing::warn!(error = %err, "ar anchor dispatch failed");
                ActivationOutcome::HostFailed(err)
            }
        }
    }

    fn decline(&self, diagnostic: Diagnostic) -> ActivationOutcome {
        self.diagnostics.report(diagnostic.clone());
        ActivationOutcome::Declined(diagnostic)
    }
}
