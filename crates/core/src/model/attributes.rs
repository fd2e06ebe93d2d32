use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Attribute names understood on an `<ar-button>` element.
pub mod names {
    pub const SRC: &str = "src";
    pub const IOS_SRC: &str = "ios-src";
    pub const LINK: &str = "link";
    pub const IOS_LINK: &str = "ios-link";
    pub const TITLE: &str = "title";
    pub const CHECKOUT_TITLE: &str = "checkout-title";
    pub const CHECKOUT_SUBTITLE: &str = "checkout-subtitle";
    pub const PRICE: &str = "price";
    pub const CALL_TO_ACTION: &str = "call-to-action";
    pub const CANONICAL_WEB_PAGE_URL: &str = "canonical-web-page-url";
    pub const ALLOWS_CONTENT_SCALING: &str = "allows-content-scaling";
    pub const FALLBACK_URL: &str = "fallback-url";
    pub const OCCLUSION: &str = "occlusion";
    pub const AR: &str = "ar";
    pub const DEFERRED: &str = "deferred";
}

/// String key/value view of an element's attributes.
///
/// This is the only shape the host page's markup is exchanged in; typed
/// configs read from and write to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes(BTreeMap<String, String>);

impl Attributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Attribute value, treating an empty string as absent.
    #[must_use]
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Presence-only attribute such as `occlusion` or `deferred`.
    pub fn set_flag(&mut self, name: impl Into<String>) {
        self.set(name, String::new());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

pub(crate) fn set_optional(attrs: &mut Attributes, name: &str, value: Option<&str>) {
    match value {
        Some(v) if !v.is_empty() => attrs.set(name, v),
        _ => {
            attrs.remove(name);
        }
    }
}
