use std::sync::Arc;

use dioxus::prelude::*;

use ar_core::{ArButtonConfig, Attributes, Environment, Session};
use services::{
    ActivationOutcome, ArButtonService, ArDocument, ButtonId, CollectingDiagnostics, Diagnostic,
    InitReport,
};

use crate::components::ArButtonView;
use crate::context::AppContext;
use crate::host::EvalAnchorHost;
use crate::scripts::probe_environment;

/// Everything the page holds once the environment is known.
pub struct ArPage {
    pub service: ArButtonService,
    pub host: EvalAnchorHost,
    pub doc: ArDocument,
    pub report: InitReport,
}

impl ArPage {
    /// Detect the platform once, declare the buttons and auto-initialize them.
    #[must_use]
    pub fn initialize(
        env: Environment,
        declared: &[Attributes],
        diagnostics: CollectingDiagnostics,
    ) -> Self {
        let host = EvalAnchorHost::new(Arc::new(diagnostics.clone()));
        let service = ArButtonService::new(
            Session::detect(env),
            Arc::new(host.clone()),
            Arc::new(diagnostics),
        );
        let mut doc = ArDocument::new();
        for attrs in declared {
            doc.insert(attrs.clone());
        }
        let report = service.auto_init(&mut doc);
        Self {
            service,
            host,
            doc,
            report,
        }
    }

    fn configure_first_deferred(&mut self, config: ArButtonConfig) -> String {
        let target = self.report.deferred.first().copied();
        let result = self.service.configure(&mut self.doc, target, config);
        if result.is_ok() {
            self.report.deferred.retain(|id| Some(*id) != target);
        }
        match result {
            Ok(Some(href)) => format!("Configured: {href}"),
            Ok(None) => "Configured, but this platform has no AR viewer.".to_string(),
            Err(err) => format!("Configuration failed: {err}"),
        }
    }
}

fn describe(outcome: &ActivationOutcome) -> String {
    match outcome {
        ActivationOutcome::Dispatched(anchor) => format!("Opening AR: {}", anchor.href),
        ActivationOutcome::Declined(diagnostic) => diagnostic.to_string(),
        ActivationOutcome::HostFailed(err) => err.to_string(),
        ActivationOutcome::NotInitialized => "This button is not configured yet.".to_string(),
    }
}

#[component]
pub fn ArPageView() -> Element {
    let ctx = use_context::<AppContext>();
    let diagnostics = use_hook(CollectingDiagnostics::new);
    let mut page = use_signal(|| None::<ArPage>);
    let mut status = use_signal(|| None::<String>);

    let declared = ctx.declared_buttons().to_vec();
    let environment_override = ctx.environment_override();
    let probe_diagnostics = diagnostics.clone();
    let _probe = use_resource(move || {
        let declared = declared.clone();
        let environment_override = environment_override.clone();
        let diagnostics = probe_diagnostics.clone();
        async move {
            let env = match environment_override {
                Some(env) => env,
                None => probe_environment().await,
            };
            let ready = ArPage::initialize(env, &declared, diagnostics.clone());
            if let Some(diagnostic) = diagnostics.take_last() {
                status.set(Some(diagnostic.to_string()));
            }
            page.set(Some(ready));
        }
    });

    let on_activate = move |id: ButtonId| {
        let clicked = page
            .read()
            .as_ref()
            .map(|p| (p.service.click(&p.doc, id), p.host.clone()));
        let Some((outcome, host)) = clicked else {
            return;
        };
        // The outcome is already on the status line; drop the copy the sink kept.
        diagnostics.clear();
        status.set(Some(describe(&outcome)));

        if matches!(outcome, ActivationOutcome::Dispatched(_)) {
            let diagnostics = diagnostics.clone();
            spawn(async move {
                if host.flush().await.is_err() {
                    let message = diagnostics
                        .take_last()
                        .as_ref()
                        .map(Diagnostic::to_string);
                    status.set(message);
                }
            });
        }
    };

    let deferred_config = ctx.deferred_config();
    let on_configure = move |_| {
        let Some(config) = deferred_config.clone() else {
            return;
        };
        let message = page
            .write()
            .as_mut()
            .map(|p| p.configure_first_deferred(config));
        status.set(message);
    };

    let guard = page.read();
    let Some(ready) = guard.as_ref() else {
        return rsx! {
            div { class: "page",
                h2 { "AR Button" }
                p { "Detecting platform…" }
            }
        };
    };

    let platform = ready.service.session().platform();
    let has_deferred = !ready.report.deferred.is_empty();
    let elements: Vec<_> = ready.doc.iter().cloned().collect();

    rsx! {
        div { class: "page",
            h2 { "AR Button" }
            p { class: "platform", "Platform: {platform}" }
            div { class: "ar-grid",
                for (index , element) in elements.into_iter().enumerate() {
                    ArButtonView {
                        key: "{element.id()}",
                        label: format!("Activate AR #{}", index + 1),
                        element,
                        on_activate: on_activate.clone(),
                    }
                }
            }
            if has_deferred && ctx.deferred_config().is_some() {
                button { class: "configure", onclick: on_configure, "Configure deferred button" }
            }
            if let Some(message) = status() {
                p { class: "status", "{message}" }
            }
        }
    }
}
