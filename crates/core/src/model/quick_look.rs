use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::model::attributes::{Attributes, names, set_optional};
use crate::platform::Viewer;

/// Quick Look rejects an empty subtitle when a title is shown; HANGUL FILLER
/// renders as blank but is a non-empty string.
pub const PLACEHOLDER_SUBTITLE: &str = "\u{3164}";

/// Configuration for an AR Quick Look hand-off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickLookConfig {
    /// USDZ / Reality file URL.
    pub src: String,
    /// Page opened when the Quick Look action button is tapped.
    pub link: Option<String>,
    pub checkout_title: Option<String>,
    pub checkout_subtitle: Option<String>,
    pub price: Option<String>,
    pub call_to_action: Option<String>,
    /// Link used by the native share sheet.
    #[serde(rename = "canonicalWebPageURL")]
    pub canonical_web_page_url: Option<String>,
    /// `None` leaves scaling at Quick Look's default (enabled).
    pub allows_content_scaling: Option<bool>,
}

impl QuickLookConfig {
    #[must_use]
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            ..Self::default()
        }
    }

    /// Read the iOS branch of a button's attributes.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::MissingSource` when `ios-src` is absent or blank.
    pub fn from_attributes(attrs: &Attributes) -> Result<Self, ConfigurationError> {
        let src = attrs
            .non_empty(names::IOS_SRC)
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigurationError::MissingSource {
                viewer: Viewer::QuickLook,
            })?;

        let owned = |name: &str| attrs.non_empty(name).map(str::to_owned);

        let allows_content_scaling = match attrs.get(names::ALLOWS_CONTENT_SCALING) {
            Some("0") => Some(false),
            Some("1") => Some(true),
            _ => None,
        };

        Ok(Self {
            src: src.to_owned(),
            link: owned(names::IOS_LINK).or_else(|| owned(names::LINK)),
            checkout_title: owned(names::CHECKOUT_TITLE),
            checkout_subtitle: owned(names::CHECKOUT_SUBTITLE),
            price: owned(names::PRICE),
            call_to_action: owned(names::CALL_TO_ACTION),
            canonical_web_page_url: owned(names::CANONICAL_WEB_PAGE_URL),
            allows_content_scaling,
        })
    }

    /// Write this config back onto the element as it would be declared in markup.
    pub fn write_attributes(&self, attrs: &mut Attributes) {
        attrs.set(names::IOS_SRC, self.src.as_str());
        set_optional(attrs, names::IOS_LINK, self.link.as_deref());
        set_optional(attrs, names::CHECKOUT_TITLE, self.checkout_title.as_deref());
        set_optional(
            attrs,
            names::CHECKOUT_SUBTITLE,
            self.checkout_subtitle.as_deref(),
        );
        set_optional(attrs, names::PRICE, self.price.as_deref());
        set_optional(attrs, names::CALL_TO_ACTION, self.call_to_action.as_deref());
        set_optional(
            attrs,
            names::CANONICAL_WEB_PAGE_URL,
            self.canonical_web_page_url.as_deref(),
        );
        match self.allows_content_scaling {
            Some(true) => attrs.set(names::ALLOWS_CONTENT_SCALING, "1"),
            Some(false) => attrs.set(names::ALLOWS_CONTENT_SCALING, "0"),
            None => {
                attrs.remove(names::ALLOWS_CONTENT_SCALING);
            }
        }
    }

    /// Apply the defaults used when a page configures a button from code.
    ///
    /// Content scaling is only enabled on an explicit `true`, and a checkout
    /// title always travels with a non-empty subtitle.
    #[must_use]
    pub fn with_programmatic_defaults(mut self) -> Self {
        self.allows_content_scaling = Some(self.allows_content_scaling == Some(true));
        if self.checkout_title.is_some() && self.checkout_subtitle.is_none() {
            self.checkout_subtitle = Some(PLACEHOLDER_SUBTITLE.to_owned());
        }
        self
    }
}
