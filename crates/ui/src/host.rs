use std::sync::{Arc, Mutex};

use services::{AnchorHost, ArAnchor, Diagnostic, DiagnosticSinkRef, HostError, ReturnListener};

use crate::scripts::{anchor_dispatch_script, run_anchor_script};

/// Clicks anchors in the live page through `document::eval`.
///
/// `dispatch` only queues the anchor script; `flush` runs it and must be
/// awaited from inside the Dioxus runtime (a click handler's task). Script
/// failures go to the diagnostics sink as `Diagnostic::HostFailed`.
#[derive(Clone)]
pub struct EvalAnchorHost {
    pending: Arc<Mutex<Vec<String>>>,
    diagnostics: DiagnosticSinkRef,
}

impl EvalAnchorHost {
    #[must_use]
    pub fn new(diagnostics: DiagnosticSinkRef) -> Self {
        Self {
            pending: Arc::new(Mutex::new(Vec::new())),
            diagnostics,
        }
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Run every queued anchor script in order.
    ///
    /// # Errors
    ///
    /// Returns the first script failure; the remaining scripts are dropped.
    pub async fn flush(&self) -> Result<(), HostError> {
        let scripts = self
            .pending
            .lock()
            .map(|mut guard| std::mem::take(&mut *guard))
            .map_err(|e| HostError::Unavailable(e.to_string()))?;

        for script in scripts {
            if let Err(e) = run_anchor_script(script).await {
                let err = HostError::Script(e);
                tracing::warn!(error = %err, "ar anchor script failed");
                self.diagnostics.report(Diagnostic::HostFailed(err.clone()));
                return Err(err);
            }
        }
        Ok(())
    }
}

impl AnchorHost for EvalAnchorHost {
    fn dispatch(
        &self,
        anchor: ArAnchor,
        listener: Option<ReturnListener>,
    ) -> Result<(), HostError> {
        // The listener lives on in the page script; the Rust handle only
        // carries its link across.
        let return_link = listener.map(|l| l.link().to_owned());
        let script = anchor_dispatch_script(&anchor, return_link.as_deref());
        self.pending
            .lock()
            .map_err(|e| HostError::Unavailable(e.to_string()))?
            .push(script);
        Ok(())
    }
}
