use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

//
// ─── ENVIRONMENT SNAPSHOT ──────────────────────────────────────────────────────
//

/// What the page can observe about the browser it runs in.
///
/// The three fields are read once from the host (`navigator.userAgent`,
/// `'ontouchend' in document` and `relList.supports('ar')` on a scratch
/// anchor). Everything in this module is a pure function over this value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub user_agent: String,
    #[serde(default)]
    pub touch_events: bool,
    #[serde(default)]
    pub ar_relation_supported: bool,
}

impl Environment {
    #[must_use]
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            touch_events: false,
            ar_relation_supported: false,
        }
    }

    #[must_use]
    pub fn with_touch_events(mut self, touch_events: bool) -> Self {
        self.touch_events = touch_events;
        self
    }

    #[must_use]
    pub fn with_ar_relation(mut self, supported: bool) -> Self {
        self.ar_relation_supported = supported;
        self
    }
}

//
// ─── PLATFORM CLASSIFICATION ───────────────────────────────────────────────────
//

static ANDROID: LazyLock<Regex> = LazyLock::new(|| case_insensitive("android"));
static APPLE_DEVICE: LazyLock<Regex> = LazyLock::new(|| case_insensitive("iphone|ipad|ipod"));
static BLACKBERRY: LazyLock<Regex> = LazyLock::new(|| case_insensitive("blackberry"));
static OPERA_MINI: LazyLock<Regex> = LazyLock::new(|| case_insensitive("opera mini"));
static WINDOWS_MOBILE: LazyLock<Regex> = LazyLock::new(|| case_insensitive("iemobile|wpdesktop"));
static CHROME_IOS: LazyLock<Regex> = LazyLock::new(|| case_insensitive(r"crios[/\s][\d.]+"));
static APPLE_OS_VERSION: LazyLock<Regex> =
    LazyLock::new(|| case_insensitive(r"\b([0-9]+)_([0-9]+)(?:_([0-9]+))?\b"));

fn case_insensitive(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).expect("static user agent pattern")
}

/// Which AR viewer a platform hands off to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Viewer {
    /// Apple AR Quick Look, reached through an anchor with `rel="ar"`.
    QuickLook,
    /// Google Scene Viewer, reached through an `intent://` link.
    SceneViewer,
}

impl Viewer {
    /// Value stored in the button's `ar` attribute once it is initialized.
    #[must_use]
    pub fn marker(self) -> &'static str {
        match self {
            Viewer::QuickLook => "quick-look",
            Viewer::SceneViewer => "scene-viewer",
        }
    }
}

impl fmt::Display for Viewer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Viewer::QuickLook => f.write_str("iOS"),
            Viewer::SceneViewer => f.write_str("Android"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Ios,
    /// iPadOS 13+ identifies itself as a Macintosh; told apart by touch support.
    IpadOs,
    Android,
    BlackBerry,
    OperaMini,
    WindowsMobile,
    /// Desktop browsers and anything unrecognized.
    Other,
}

impl Platform {
    /// Classify the environment into exactly one platform.
    #[must_use]
    pub fn detect(env: &Environment) -> Self {
        let ua = env.user_agent.as_str();
        if APPLE_DEVICE.is_match(ua) {
            Platform::Ios
        } else if ua.contains("Mac") && env.touch_events {
            Platform::IpadOs
        } else if ANDROID.is_match(ua) {
            Platform::Android
        } else if BLACKBERRY.is_match(ua) {
            Platform::BlackBerry
        } else if OPERA_MINI.is_match(ua) {
            Platform::OperaMini
        } else if WINDOWS_MOBILE.is_match(ua) {
            Platform::WindowsMobile
        } else {
            Platform::Other
        }
    }

    #[must_use]
    pub fn is_mobile(self) -> bool {
        !matches!(self, Platform::Other)
    }

    #[must_use]
    pub fn is_apple(self) -> bool {
        matches!(self, Platform::Ios | Platform::IpadOs)
    }

    #[must_use]
    pub fn viewer(self) -> Option<Viewer> {
        match self {
            Platform::Ios | Platform::IpadOs => Some(Viewer::QuickLook),
            Platform::Android => Some(Viewer::SceneViewer),
            Platform::BlackBerry
            | Platform::OperaMini
            | Platform::WindowsMobile
            | Platform::Other => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Ios => "iOS",
            Platform::IpadOs => "iPadOS",
            Platform::Android => "Android",
            Platform::BlackBerry => "BlackBerry",
            Platform::OperaMini => "Opera Mini",
            Platform::WindowsMobile => "Windows Mobile",
            Platform::Other => "unsupported",
        };
        f.write_str(name)
    }
}

//
// ─── CAPABILITY PROBES ─────────────────────────────────────────────────────────
//

/// Apple OS version as written in the agent string (`major_minor[_patch]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct OsVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: Option<u32>,
}

impl fmt::Display for OsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.patch {
            Some(patch) => write!(f, "{}.{}.{}", self.major, self.minor, patch),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}

/// First `major_minor[_patch]` token in the agent, if any.
#[must_use]
pub fn ios_version(user_agent: &str) -> Option<OsVersion> {
    let caps = APPLE_OS_VERSION.captures(user_agent)?;
    let major = caps.get(1)?.as_str().parse().ok()?;
    let minor = caps.get(2)?.as_str().parse().ok()?;
    let patch = caps.get(3).and_then(|m| m.as_str().parse().ok());
    Some(OsVersion {
        major,
        minor,
        patch,
    })
}

/// Whether Quick Look can be reached through an `rel="ar"` anchor.
///
/// On iOS the relation probe alone is not enough: releases up to 12 report
/// the relation but cannot open AR content.
#[must_use]
pub fn quick_look_compatible(env: &Environment) -> bool {
    if !env.ar_relation_supported {
        return false;
    }
    if APPLE_DEVICE.is_match(&env.user_agent) {
        return ios_version(&env.user_agent).is_some_and(|v| v.major > 12);
    }
    true
}

/// Chrome on iOS runs on WebKit and hands `rel="ar"` anchors to Quick Look
/// even when the relation probe is inconclusive.
#[must_use]
pub fn is_chrome_on_ios(user_agent: &str) -> bool {
    CHROME_IOS.is_match(user_agent)
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Detection result for one page session, passed to whoever needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    env: Environment,
    platform: Platform,
}

impl Session {
    #[must_use]
    pub fn detect(env: Environment) -> Self {
        let platform = Platform::detect(&env);
        Self { env, platform }
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform
    }

    #[must_use]
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    #[must_use]
    pub fn quick_look_compatible(&self) -> bool {
        quick_look_compatible(&self.env)
    }

    #[must_use]
    pub fn is_chrome_on_ios(&self) -> bool {
        is_chrome_on_ios(&self.env.user_agent)
    }
}
