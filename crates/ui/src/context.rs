use std::sync::Arc;

use ar_core::{ArButtonConfig, Attributes, Environment};

/// What the composition root hands to the UI.
pub trait UiApp: Send + Sync {
    fn title(&self) -> String;

    /// Pretend to run in this environment instead of probing the webview.
    fn environment_override(&self) -> Option<Environment>;

    /// `<ar-button>` elements declared in the page markup.
    fn declared_buttons(&self) -> Vec<Attributes>;

    /// Configuration applied from code to the first deferred button.
    fn deferred_config(&self) -> Option<ArButtonConfig>;
}

#[derive(Clone)]
pub struct AppContext {
    title: String,
    environment_override: Option<Environment>,
    declared_buttons: Vec<Attributes>,
    deferred_config: Option<ArButtonConfig>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            title: app.title(),
            environment_override: app.environment_override(),
            declared_buttons: app.declared_buttons(),
            deferred_config: app.deferred_config(),
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn environment_override(&self) -> Option<Environment> {
        self.environment_override.clone()
    }

    #[must_use]
    pub fn declared_buttons(&self) -> &[Attributes] {
        &self.declared_buttons
    }

    #[must_use]
    pub fn deferred_config(&self) -> Option<ArButtonConfig> {
        self.deferred_config.clone()
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
