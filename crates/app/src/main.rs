use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use ar_core::model::names;
use ar_core::{
    ArButtonConfig, Attributes, ConfigurationError, Environment, QuickLookConfig,
    SceneViewerConfig, Session,
};
use dioxus::LaunchBuilder;
use services::{
    ActivationOutcome, ArButtonService, ArDocument, MemoryAnchorHost, TracingDiagnostics,
};
use tracing_subscriber::prelude::*;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidAttribute { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidAttribute { raw } => {
                write!(f, "invalid --attr value (expected key=value): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

//
// ─── DESKTOP APP ───────────────────────────────────────────────────────────────
//

const DEMO_MODEL_GLB: &str = "https://modelviewer.dev/shared-assets/models/Astronaut.glb";
const DEMO_MODEL_USDZ: &str = "https://modelviewer.dev/shared-assets/models/Astronaut.usdz";

struct DesktopApp {
    environment: Option<Environment>,
}

impl UiApp for DesktopApp {
    fn title(&self) -> String {
        "AR Button".to_string()
    }

    fn environment_override(&self) -> Option<Environment> {
        self.environment.clone()
    }

    fn declared_buttons(&self) -> Vec<Attributes> {
        let plain: Attributes = [
            (names::SRC, DEMO_MODEL_GLB),
            (names::IOS_SRC, DEMO_MODEL_USDZ),
            (names::TITLE, "Astronaut"),
        ]
        .into_iter()
        .collect();

        let shop: Attributes = [
            (names::SRC, DEMO_MODEL_GLB),
            (names::IOS_SRC, DEMO_MODEL_USDZ),
            (names::TITLE, "Astronaut"),
            (names::LINK, "https://shop.example.com/astronaut"),
            (names::CHECKOUT_TITLE, "Astronaut figure"),
            (names::PRICE, "$25"),
            (names::CALL_TO_ACTION, "Add to cart"),
            (names::OCCLUSION, ""),
        ]
        .into_iter()
        .collect();

        let deferred: Attributes = [(names::DEFERRED, "")].into_iter().collect();

        vec![plain, shop, deferred]
    }

    fn deferred_config(&self) -> Option<ArButtonConfig> {
        let mut android = SceneViewerConfig::new(DEMO_MODEL_GLB);
        android.title = Some("Astronaut (configured)".to_string());
        android.link = Some("https://shop.example.com/astronaut".to_string());

        let mut ios = QuickLookConfig::new(DEMO_MODEL_USDZ);
        ios.checkout_title = Some("Astronaut (configured)".to_string());
        ios.link = Some("https://shop.example.com/astronaut".to_string());

        Some(ArButtonConfig::android(android).with_ios(ios))
    }
}

//
// ─── ARGUMENTS ─────────────────────────────────────────────────────────────────
//

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui   [--user-agent <ua> [--touch] [--ar-relation]]");
    eprintln!("  cargo run -p app -- href [--user-agent <ua>] [--touch] [--no-ar-relation]");
    eprintln!("                           [--attr key=value]... [--config <file.json>] [--click]");
    eprintln!();
    eprintln!("ui probes the webview unless --user-agent is given.");
    eprintln!("href assumes the AR relation is supported unless --no-ar-relation is given.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  AR_USER_AGENT, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Href,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "href" => Some(Self::Href),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct UiArgs {
    environment: Option<Environment>,
}

impl UiArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut user_agent = std::env::var("AR_USER_AGENT").ok();
        let mut touch = false;
        let mut ar_relation = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--user-agent" => user_agent = Some(require_value(args, "--user-agent")?),
                "--touch" => touch = true,
                "--ar-relation" => ar_relation = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let environment = user_agent.map(|ua| {
            Environment::new(ua)
                .with_touch_events(touch)
                .with_ar_relation(ar_relation)
        });
        Ok(Self { environment })
    }
}

#[derive(Debug)]
struct HrefArgs {
    environment: Environment,
    attributes: Attributes,
    config: Option<PathBuf>,
    click: bool,
}

impl HrefArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut user_agent = std::env::var("AR_USER_AGENT").unwrap_or_default();
        let mut touch = false;
        let mut ar_relation = true;
        let mut attributes = Attributes::new();
        let mut config = None;
        let mut click = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--user-agent" => user_agent = require_value(args, "--user-agent")?,
                "--touch" => touch = true,
                "--no-ar-relation" => ar_relation = false,
                "--attr" => {
                    let raw = require_value(args, "--attr")?;
                    let (key, value) = parse_attribute(&raw)?;
                    attributes.set(key, value);
                }
                "--config" => config = Some(PathBuf::from(require_value(args, "--config")?)),
                "--click" => click = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            environment: Environment::new(user_agent)
                .with_touch_events(touch)
                .with_ar_relation(ar_relation),
            attributes,
            config,
            click,
        })
    }
}

/// `key=value`, or a bare `key` for boolean attributes such as `occlusion`.
fn parse_attribute(raw: &str) -> Result<(String, String), ArgsError> {
    let (key, value) = raw.split_once('=').unwrap_or((raw, ""));
    let key = key.trim();
    if key.is_empty() {
        return Err(ArgsError::InvalidAttribute {
            raw: raw.to_string(),
        });
    }
    Ok((key.to_string(), value.to_string()))
}

//
// ─── LINK CHECKS ───────────────────────────────────────────────────────────────
//

/// Deep links are emitted as-is; relative links only warn.
fn warn_if_not_absolute(field: &str, value: Option<&str>) {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return;
    };
    if let Err(err) = url::Url::parse(value) {
        tracing::warn!(field, value, error = %err, "link is not an absolute URL");
    }
}

fn check_attribute_links(attrs: &Attributes) {
    for name in [
        names::LINK,
        names::IOS_LINK,
        names::FALLBACK_URL,
        names::CANONICAL_WEB_PAGE_URL,
    ] {
        warn_if_not_absolute(name, attrs.get(name));
    }
}

fn check_config_links(config: &ArButtonConfig) {
    if let Some(android) = &config.android {
        warn_if_not_absolute("androidConf.link", android.link.as_deref());
        warn_if_not_absolute("androidConf.fallbackURL", android.fallback_url.as_deref());
    }
    if let Some(ios) = &config.ios {
        warn_if_not_absolute("iosConf.link", ios.link.as_deref());
        warn_if_not_absolute(
            "iosConf.canonicalWebPageURL",
            ios.canonical_web_page_url.as_deref(),
        );
    }
}

//
// ─── COMMANDS ──────────────────────────────────────────────────────────────────
//

fn run_href(args: HrefArgs) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::detect(args.environment);
    let platform = session.platform();
    tracing::debug!(
        %platform,
        quick_look = session.quick_look_compatible(),
        chrome_on_ios = session.is_chrome_on_ios(),
        "platform detected"
    );

    let host = Arc::new(MemoryAnchorHost::new());
    let service = ArButtonService::new(session, host.clone(), Arc::new(TracingDiagnostics));

    check_attribute_links(&args.attributes);
    let mut doc = ArDocument::new();
    let id = doc.insert(args.attributes);

    let href = match args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)?;
            let config: ArButtonConfig = serde_json::from_str(&raw)?;
            check_config_links(&config);
            service.configure(&mut doc, Some(id), config)?
        }
        None => {
            let mut report = service.auto_init(&mut doc);
            if let Some((_, err)) = report.failed.pop() {
                return Err(err.into());
            }
            if report.deferred.contains(&id) {
                eprintln!("button is deferred; pass --config to configure it");
                return Ok(());
            }
            doc.get(id)
                .and_then(|element| element.binding())
                .map(|binding| binding.href.clone())
        }
    };

    let Some(href) = href else {
        return Err(ConfigurationError::UnsupportedPlatform { platform }.into());
    };
    println!("{href}");

    if args.click {
        match service.click(&doc, id) {
            ActivationOutcome::Dispatched(anchor) => {
                let rel = anchor.rel.unwrap_or("-");
                println!("dispatched anchor rel={rel} href={}", anchor.href);
                if host.has_pending_listener() {
                    println!("return listener registered");
                }
            }
            ActivationOutcome::Declined(diagnostic) => eprintln!("declined: {diagnostic}"),
            ActivationOutcome::HostFailed(err) => return Err(err.into()),
            ActivationOutcome::NotInitialized => eprintln!("button is not initialized"),
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: launching UI when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let report_usage = |e: ArgsError| {
        eprintln!("{e}");
        print_usage();
        e
    };

    match cmd {
        Command::Ui => {
            let parsed = UiArgs::parse(&mut iter).map_err(report_usage)?;
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                environment: parsed.environment,
            });
            let context = build_app_context(&app);
            launch(context);
            Ok(())
        }
        Command::Href => {
            let parsed = HrefArgs::parse(&mut iter).map_err(report_usage)?;
            run_href(parsed)
        }
    }
}

#[cfg(feature = "desktop")]
fn launch(context: ui::AppContext) {
    use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("AR Button")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
}

#[cfg(all(feature = "web", not(feature = "desktop")))]
fn launch(context: ui::AppContext) {
    LaunchBuilder::web().with_context(context).launch(App);
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
