use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;

use ar_core::{ArButtonConfig, Attributes, Environment};

use crate::context::{UiApp, build_app_context};
use crate::views::{ArPageView, CapabilitiesView};

#[derive(Clone, Default)]
pub struct TestApp {
    pub environment: Option<Environment>,
    pub declared: Vec<Attributes>,
    pub deferred_config: Option<ArButtonConfig>,
}

impl UiApp for TestApp {
    fn title(&self) -> String {
        "AR Button".to_string()
    }

    fn environment_override(&self) -> Option<Environment> {
        self.environment.clone()
    }

    fn declared_buttons(&self) -> Vec<Attributes> {
        self.declared.clone()
    }

    fn deferred_config(&self) -> Option<ArButtonConfig> {
        self.deferred_config.clone()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Buttons,
    Capabilities,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewHarnessRoot(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    match props.view {
        ViewKind::Buttons => rsx! { ArPageView {} },
        ViewKind::Capabilities => rsx! { CapabilitiesView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        for _ in 0..3 {
            let _ = tokio::time::timeout(
                std::time::Duration::from_millis(50),
                self.dom.wait_for_work(),
            )
            .await;
            self.dom.render_immediate(&mut NoOpMutations);
            self.dom.process_events();
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, app: TestApp) -> ViewHarness {
    let dom = VirtualDom::new_with_props(
        ViewHarnessRoot,
        ViewHarnessProps {
            app: Arc::new(app),
            view,
        },
    );
    ViewHarness { dom }
}
