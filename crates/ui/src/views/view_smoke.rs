use ar_core::{ArButtonConfig, Attributes, Environment, SceneViewerConfig};

use super::test_harness::{TestApp, ViewKind, setup_view_harness};

const ANDROID: &str = "Mozilla/5.0 (Linux; Android 13; Pixel 7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Mobile Safari/537.36";
const IOS_CHROME: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) CriOS/106.0.5249.92 Mobile/15E148 Safari/604.1";
const DESKTOP: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Safari/537.36";

fn attrs(pairs: &[(&str, &str)]) -> Attributes {
    pairs.iter().copied().collect()
}

fn demo_app(user_agent: &str) -> TestApp {
    TestApp {
        environment: Some(Environment::new(user_agent)),
        declared: vec![
            attrs(&[("src", "chair.glb"), ("ios-src", "chair.usdz"), ("title", "Chair")]),
            attrs(&[("deferred", "")]),
        ],
        deferred_config: Some(ArButtonConfig::android(SceneViewerConfig::new("lamp.glb"))),
    }
}

#[tokio::test(flavor = "current_thread")]
async fn buttons_view_binds_declared_buttons_on_android() {
    let mut harness = setup_view_harness(ViewKind::Buttons, demo_app(ANDROID));
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();

    assert!(html.contains("Platform: Android"), "missing platform in {html}");
    assert!(html.contains("<ar-button"), "missing ar-button element in {html}");
    assert!(html.contains(r#"ar="scene-viewer""#), "missing ar marker in {html}");
    assert!(
        html.contains("Configure deferred button"),
        "missing configure action in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn buttons_view_reports_unsupported_desktop() {
    let mut harness = setup_view_harness(ViewKind::Buttons, demo_app(DESKTOP));
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();

    assert!(html.contains("Platform: unsupported"), "missing platform in {html}");
    assert!(
        html.contains("this platform does not support AR"),
        "missing diagnostic in {html}"
    );
    assert!(!html.contains(r#"ar="scene-viewer""#), "unexpected binding in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn capabilities_view_shows_probe_results() {
    let mut harness = setup_view_harness(ViewKind::Capabilities, demo_app(IOS_CHROME));
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();

    assert!(html.contains("iOS"), "missing platform in {html}");
    assert!(html.contains("16.0"), "missing os version in {html}");
    assert!(html.contains("Chrome on iOS"), "missing chrome row in {html}");
}
