use ar_core::model::names;
use ar_core::{
    ArButtonConfig, ConfigurationError, DeepLink, QuickLookConfig, SceneViewerConfig, Session,
    Viewer, build_quick_look_href, build_scene_viewer_href,
};

use crate::activator::{ActivationOutcome, Activator, AnchorHostRef};
use crate::diagnostics::DiagnosticSinkRef;
use crate::document::{ArButtonElement, ArDocument, ButtonId, ClickBinding};
use crate::error::Diagnostic;

/// What an auto-initialization pass did with each button.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitReport {
    pub initialized: Vec<ButtonId>,
    pub deferred: Vec<ButtonId>,
    pub failed: Vec<(ButtonId, ConfigurationError)>,
}

/// Entry points the page uses: auto-init on ready, programmatic configure,
/// clicks and capability queries.
#[derive(Clone)]
pub struct ArButtonService {
    activator: Activator,
    diagnostics: DiagnosticSinkRef,
}

impl ArButtonService {
    #[must_use]
    pub fn new(session: Session, host: AnchorHostRef, diagnostics: DiagnosticSinkRef) -> Self {
        Self {
            activator: Activator::new(session, host, diagnostics.clone()),
            diagnostics,
        }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        self.activator.session()
    }

    #[must_use]
    pub fn quick_look_compatible(&self) -> bool {
        self.session().quick_look_compatible()
    }

    #[must_use]
    pub fn is_chrome_on_ios(&self) -> bool {
        self.session().is_chrome_on_ios()
    }

    /// Initialize every declared button that is not deferred.
    ///
    /// A button with broken attributes is recorded in the report and left
    /// unbound; the others still initialize.
    pub fn auto_init(&self, doc: &mut ArDocument) -> InitReport {
        let mut report = InitReport::default();
        let platform = self.session().platform();

        if !platform.is_mobile() {
            self.diagnostics
                .report(Diagnostic::PlatformUnsupported { platform });
            return report;
        }

        for element in doc.iter_mut() {
            if element.is_deferred() {
                report.deferred.push(element.id());
                continue;
            }
            match self.init_element(element) {
                Ok(Some(_)) => report.initialized.push(element.id()),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(button = %element.id(), error = %err, "ar button not initialized");
                    report.failed.push((element.id(), err));
                }
            }
        }

        tracing::info!(
            %platform,
            initialized = report.initialized.len(),
            deferred = report.deferred.len(),
            failed = report.failed.len(),
            "ar buttons initialized"
        );
        report
    }

    /// Configure one button from code, bypassing its markup.
    ///
    /// Clears the deferred marker, writes the branch matching the detected
    /// platform onto the element and re-initializes it. When that branch is
    /// absent the element is re-initialized from its existing attributes.
    ///
    /// Returns the built link, or `None` on platforms without an AR viewer.
    ///
    /// # Errors
    ///
    /// `MissingElement` when `element` is `None` or unknown, `MissingSource`
    /// when the platform's `src` is blank.
    pub fn configure(
        &self,
        doc: &mut ArDocument,
        element: Option<ButtonId>,
        config: ArButtonConfig,
    ) -> Result<Option<DeepLink>, ConfigurationError> {
        let element = element
            .and_then(|id| doc.get_mut(id))
            .ok_or(ConfigurationError::MissingElement)?;

        element.attributes_mut().remove(names::DEFERRED);

        match self.session().platform().viewer() {
            Some(Viewer::QuickLook) => {
                if let Some(ios) = config.ios {
                    require_src(&ios.src, Viewer::QuickLook)?;
                    ios.with_programmatic_defaults()
                        .write_attributes(element.attributes_mut());
                }
            }
            Some(Viewer::SceneViewer) => {
                if let Some(android) = config.android {
                    require_src(&android.src, Viewer::SceneViewer)?;
                    android.write_attributes(element.attributes_mut());
                }
            }
            None => {
                tracing::debug!(platform = %self.session().platform(), "configure on platform without ar viewer");
                return Ok(None);
            }
        }

        match self.init_element(element) {
            Ok(href) => Ok(href),
            Err(err) => {
                element.unbind();
                Err(err)
            }
        }
    }

    /// Run the click handler of a button.
    pub fn click(&self, doc: &ArDocument, id: ButtonId) -> ActivationOutcome {
        let platform = self.session().platform();
        if platform.viewer().is_none() {
            let diagnostic = Diagnostic::PlatformUnsupported { platform };
            self.diagnostics.report(diagnostic.clone());
            return ActivationOutcome::Declined(diagnostic);
        }

        match doc.get(id).and_then(ArButtonElement::binding) {
            Some(binding) => self.activator.activate(binding),
            None => {
                tracing::debug!(button = %id, "click on uninitialized ar button");
                ActivationOutcome::NotInitialized
            }
        }
    }

    fn init_element(
        &self,
        element: &mut ArButtonElement,
    ) -> Result<Option<DeepLink>, ConfigurationError> {
        let Some(viewer) = self.session().platform().viewer() else {
            return Ok(None);
        };

        let binding = match viewer {
            Viewer::QuickLook => {
                let config = QuickLookConfig::from_attributes(element.attributes())?;
                ClickBinding {
                    viewer,
                    href: build_quick_look_href(&config)?,
                    return_link: config.link,
                }
            }
            Viewer::SceneViewer => {
                let config = SceneViewerConfig::from_attributes(element.attributes())?;
                ClickBinding {
                    viewer,
                    href: build_scene_viewer_href(&config)?,
                    return_link: None,
                }
            }
        };

        tracing::debug!(button = %element.id(), href = %binding.href, "ar button bound");
        let href = binding.href.clone();
        element.bind(binding);
        Ok(Some(href))
    }
}

fn require_src(src: &str, viewer: Viewer) -> Result<(), ConfigurationError> {
    if src.trim().is_empty() {
        return Err(ConfigurationError::MissingSource { viewer });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ar_core::{Attributes, Environment, Platform};

    use super::*;
    use crate::activator::MemoryAnchorHost;
    use crate::diagnostics::CollectingDiagnostics;

    const IOS_15: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 15_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/15.0 Mobile/15E148 Safari/604.1";
    const ANDROID: &str = "Mozilla/5.0 (Linux; Android 13; Pixel 7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Mobile Safari/537.36";
    const DESKTOP: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Safari/537.36";
    const BLACKBERRY: &str = "Mozilla/5.0 (BlackBerry; U; BlackBerry 9900; en) AppleWebKit/534.11+ (KHTML, like Gecko) Version/7.1.0.346 Mobile Safari/534.11+";

    struct Harness {
        service: ArButtonService,
        host: MemoryAnchorHost,
        diagnostics: CollectingDiagnostics,
    }

    fn harness(env: Environment) -> Harness {
        let host = MemoryAnchorHost::new();
        let diagnostics = CollectingDiagnostics::new();
        let service = ArButtonService::new(
            Session::detect(env),
            Arc::new(host.clone()),
            Arc::new(diagnostics.clone()),
        );
        Harness {
            service,
            host,
            diagnostics,
        }
    }

    fn ios() -> Harness {
        harness(Environment::new(IOS_15).with_ar_relation(true))
    }

    fn android() -> Harness {
        harness(Environment::new(ANDROID))
    }

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs.iter().copied().collect()
    }

    #[test]
    fn android_scenario_through_configure() {
        let h = android();
        let mut doc = ArDocument::new();
        let id = doc.insert(Attributes::new());

        let config = ArButtonConfig::android(SceneViewerConfig {
            title: Some("Chair".into()),
            link: Some("https://x.example".into()),
            ..SceneViewerConfig::new("model.glb")
        });
        let href = h.service.configure(&mut doc, Some(id), config).unwrap().unwrap();

        assert_eq!(
            href.as_str(),
            "intent://arvr.google.com/scene-viewer/1.0?file=model.glb&mode=ar_only&disable_occlusion=true&title=Chair&link=https://x.example#Intent;scheme=https;package=com.google.ar.core;action=android.intent.action.VIEW;S.browser_fallback_url=https%3A%2F%2Fdevelopers.google.com%2Far;end;"
        );
        assert_eq!(doc.get(id).unwrap().ar_marker(), Some("scene-viewer"));
    }

    #[test]
    fn ios_scenario_through_configure() {
        let h = ios();
        let mut doc = ArDocument::new();
        let id = doc.insert(Attributes::new());

        let config = ArButtonConfig::ios(QuickLookConfig {
            price: Some("$10".into()),
            ..QuickLookConfig::new("model.usdz")
        });
        let href = h.service.configure(&mut doc, Some(id), config).unwrap().unwrap();

        assert_eq!(href.as_str(), "model.usdz#&price=%2410&allowsContentScaling=0");
        let element = doc.get(id).unwrap();
        assert_eq!(element.ar_marker(), Some("quick-look"));
        assert_eq!(element.attributes().get("allows-content-scaling"), Some("0"));
    }

    #[test]
    fn configure_applies_only_the_platform_branch() {
        let h = android();
        let mut doc = ArDocument::new();
        let id = doc.insert(Attributes::new());

        let config = ArButtonConfig::default()
            .with_android(SceneViewerConfig::new("chair.glb"))
            .with_ios(QuickLookConfig::new("chair.usdz"));
        h.service.configure(&mut doc, Some(id), config).unwrap();

        let element = doc.get(id).unwrap();
        assert_eq!(element.attributes().get("src"), Some("chair.glb"));
        assert!(!element.attributes().has("ios-src"));
    }

    #[test]
    fn configure_requires_an_element() {
        let h = ios();
        let mut doc = ArDocument::new();
        let config = ArButtonConfig::ios(QuickLookConfig::new("a.usdz"));

        assert_eq!(
            h.service.configure(&mut doc, None, config.clone()),
            Err(ConfigurationError::MissingElement)
        );
        assert_eq!(
            h.service
                .configure(&mut doc, Some(ButtonId::new(42)), config),
            Err(ConfigurationError::MissingElement)
        );
    }

    #[test]
    fn configure_requires_a_source_on_both_platforms() {
        let h = ios();
        let mut doc = ArDocument::new();
        let id = doc.insert(Attributes::new());
        let err = h
            .service
            .configure(&mut doc, Some(id), ArButtonConfig::ios(QuickLookConfig::new("")))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MissingSource {
                viewer: Viewer::QuickLook
            }
        );

        let h = android();
        let mut doc = ArDocument::new();
        let id = doc.insert(Attributes::new());
        let err = h
            .service
            .configure(
                &mut doc,
                Some(id),
                ArButtonConfig::android(SceneViewerConfig::new(" ")),
            )
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MissingSource {
                viewer: Viewer::SceneViewer
            }
        );
        assert!(doc.get(id).unwrap().binding().is_none());
    }

    #[test]
    fn configure_without_matching_branch_uses_markup() {
        let h = android();
        let mut doc = ArDocument::new();
        let id = doc.insert(attrs(&[("src", "chair.glb"), ("deferred", "")]));

        let href = h
            .service
            .configure(
                &mut doc,
                Some(id),
                ArButtonConfig::ios(QuickLookConfig::new("chair.usdz")),
            )
            .unwrap()
            .unwrap();
        assert!(href.as_str().contains("file=chair.glb"));
        assert!(!doc.get(id).unwrap().is_deferred());
    }

    #[test]
    fn deferred_buttons_wait_for_configure() {
        let h = android();
        let mut doc = ArDocument::new();
        let eager = doc.insert(attrs(&[("src", "a.glb")]));
        let deferred = doc.insert(attrs(&[("src", "b.glb"), ("deferred", "")]));

        let report = h.service.auto_init(&mut doc);
        assert_eq!(report.initialized, vec![eager]);
        assert_eq!(report.deferred, vec![deferred]);
        assert!(doc.get(deferred).unwrap().binding().is_none());
        assert_eq!(
            h.service.click(&doc, deferred),
            ActivationOutcome::NotInitialized
        );

        h.service
            .configure(
                &mut doc,
                Some(deferred),
                ArButtonConfig::android(SceneViewerConfig::new("c.glb")),
            )
            .unwrap();
        let element = doc.get(deferred).unwrap();
        assert!(!element.is_deferred());
        assert!(element.binding().unwrap().href.as_str().contains("file=c.glb"));
    }

    #[test]
    fn auto_init_reads_markup_and_clicks_dispatch() {
        let h = ios();
        let mut doc = ArDocument::new();
        let id = doc.insert(attrs(&[
            ("ios-src", "chair.usdz"),
            ("checkout-title", "Chair"),
            ("ios-link", "https://shop.example"),
        ]));

        let report = h.service.auto_init(&mut doc);
        assert_eq!(report.initialized, vec![id]);

        let outcome = h.service.click(&doc, id);
        let ActivationOutcome::Dispatched(anchor) = outcome else {
            panic!("expected dispatch, got {outcome:?}");
        };
        assert_eq!(anchor.href, "chair.usdz#&checkoutTitle=Chair");
        assert_eq!(anchor.rel, Some("ar"));

        h.host.deliver_message(crate::activator::QUICK_LOOK_TAPPED);
        assert_eq!(h.host.navigations(), vec!["https://shop.example".to_string()]);
    }

    #[test]
    fn auto_init_keeps_going_past_broken_buttons() {
        let h = android();
        let mut doc = ArDocument::new();
        let broken = doc.insert(attrs(&[("title", "No source")]));
        let good = doc.insert(attrs(&[("src", "a.glb")]));

        let report = h.service.auto_init(&mut doc);
        assert_eq!(report.initialized, vec![good]);
        assert_eq!(
            report.failed,
            vec![(
                broken,
                ConfigurationError::MissingSource {
                    viewer: Viewer::SceneViewer
                }
            )]
        );
    }

    #[test]
    fn desktop_reports_once_and_binds_nothing() {
        let h = harness(Environment::new(DESKTOP));
        let mut doc = ArDocument::new();
        let id = doc.insert(attrs(&[("src", "a.glb")]));
        doc.insert(attrs(&[("src", "b.glb")]));

        let report = h.service.auto_init(&mut doc);
        assert!(report.initialized.is_empty());
        assert_eq!(
            h.diagnostics.reported(),
            vec![Diagnostic::PlatformUnsupported {
                platform: Platform::Other
            }]
        );

        let outcome = h.service.click(&doc, id);
        assert!(matches!(outcome, ActivationOutcome::Declined(_)));
        assert!(h.host.dispatched().is_empty());
    }

    #[test]
    fn mobile_without_viewer_skips_binding() {
        let h = harness(Environment::new(BLACKBERRY));
        let mut doc = ArDocument::new();
        let id = doc.insert(attrs(&[("src", "a.glb")]));

        let report = h.service.auto_init(&mut doc);
        assert!(report.initialized.is_empty());
        assert!(report.failed.is_empty());
        assert_eq!(
            h.service
                .configure(&mut doc, Some(id), ArButtonConfig::default()),
            Ok(None)
        );
        assert!(matches!(
            h.service.click(&doc, id),
            ActivationOutcome::Declined(Diagnostic::PlatformUnsupported { .. })
        ));
    }

    #[test]
    fn buttons_do_not_affect_each_other() {
        let h = android();
        let mut doc = ArDocument::new();
        let a = doc.insert(attrs(&[("src", "a.glb")]));
        let b = doc.insert(attrs(&[("src", "b.glb"), ("title", "B")]));
        h.service.auto_init(&mut doc);

        h.service
            .configure(
                &mut doc,
                Some(a),
                ArButtonConfig::android(SceneViewerConfig::new("a2.glb")),
            )
            .unwrap();

        let b_href = doc.get(b).unwrap().binding().unwrap().href.clone();
        assert!(b_href.as_str().contains("file=b.glb&"));
        assert!(b_href.as_str().contains("title=B"));
    }

    #[test]
    fn capability_queries_reflect_session() {
        let h = ios();
        assert!(h.service.quick_look_compatible());
        assert!(!h.service.is_chrome_on_ios());

        let h = android();
        assert!(!h.service.quick_look_compatible());
    }
}
