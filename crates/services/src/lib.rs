#![forbid(unsafe_code)]

pub mod activator;
pub mod button_service;
pub mod diagnostics;
pub mod document;
pub mod error;

pub use ar_core::Session;

pub use activator::{
    ActivationOutcome, Activator, AnchorHost, AnchorHostRef, ArAnchor, MemoryAnchorHost,
    QUICK_LOOK_TAPPED, ReturnListener,
};
pub use button_service::{ArButtonService, InitReport};
pub use diagnostics::{CollectingDiagnostics, DiagnosticSink, DiagnosticSinkRef, TracingDiagnostics};
pub use document::{ArButtonElement, ArDocument, ButtonId, ClickBinding};
pub use error::{Diagnostic, HostError};
