use std::sync::{Arc, Mutex};

use crate::error::Diagnostic;

/// Channel through which non-fatal AR failures reach the embedding page.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

pub type DiagnosticSinkRef = Arc<dyn DiagnosticSink>;

/// Default sink: diagnostics go to the log and nowhere else.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        tracing::error!(%diagnostic, "ar button diagnostic");
    }
}

/// Keeps every reported diagnostic so a page (or a test) can inspect them.
#[derive(Debug, Clone, Default)]
pub struct CollectingDiagnostics {
    reported: Arc<Mutex<Vec<Diagnostic>>>,
}

impl CollectingDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn reported(&self) -> Vec<Diagnostic> {
        self.reported
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn last(&self) -> Option<Diagnostic> {
        self.reported
            .lock()
            .ok()
            .and_then(|guard| guard.last().cloned())
    }

    /// Last diagnostic, dropping everything reported so far.
    pub fn take_last(&self) -> Option<Diagnostic> {
        let mut guard = self.reported.lock().ok()?;
        let last = guard.pop();
        guard.clear();
        last
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.reported.lock() {
            guard.clear();
        }
    }
}

impl DiagnosticSink for CollectingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        tracing::warn!(%diagnostic, "ar button diagnostic");
        if let Ok(mut guard) = self.reported.lock() {
            guard.push(diagnostic);
        }
    }
}

#[cfg(test)]
mod tests {
    use ar_core::Platform;

    use super::*;
    use crate::error::HostError;

    #[test]
    fn collecting_sink_keeps_order() {
        let sink = CollectingDiagnostics::new();
        sink.report(Diagnostic::PlatformUnsupported {
            platform: Platform::Other,
        });
        sink.report(Diagnostic::ArUnavailable {
            reason: "relation unsupported".into(),
        });

        let reported = sink.reported();
        assert_eq!(reported.len(), 2);
        assert!(matches!(reported[0], Diagnostic::PlatformUnsupported { .. }));
        assert_eq!(
            sink.last().map(|d| d.to_string()).as_deref(),
            Some("AR is not available: relation unsupported")
        );

        sink.clear();
        assert!(sink.reported().is_empty());
    }

    #[test]
    fn take_last_drains_the_sink() {
        let sink = CollectingDiagnostics::new();
        assert_eq!(sink.take_last(), None);

        for _ in 0..3 {
            sink.report(Diagnostic::PlatformUnsupported {
                platform: Platform::Other,
            });
        }
        sink.report(Diagnostic::HostFailed(HostError::Script("no document".into())));

        assert_eq!(
            sink.take_last(),
            Some(Diagnostic::HostFailed(HostError::Script("no document".into())))
        );
        assert!(sink.reported().is_empty());
        assert_eq!(sink.take_last(), None);
    }
}
