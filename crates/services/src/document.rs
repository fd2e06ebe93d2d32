use std::fmt;

use ar_core::model::names;
use ar_core::{Attributes, DeepLink, Viewer};

/// Identifies one `<ar-button>` element within an `ArDocument`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ButtonId(u64);

impl ButtonId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ButtonId({})", self.0)
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ar-button-{}", self.0)
    }
}

/// What a click on an initialized button does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickBinding {
    pub viewer: Viewer,
    pub href: DeepLink,
    /// Page opened after the Quick Look action button is tapped.
    pub return_link: Option<String>,
}

/// One declared `<ar-button>` and the click binding built from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArButtonElement {
    id: ButtonId,
    attributes: Attributes,
    binding: Option<ClickBinding>,
}

impl ArButtonElement {
    #[must_use]
    pub fn id(&self) -> ButtonId {
        self.id
    }

    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    #[must_use]
    pub fn binding(&self) -> Option<&ClickBinding> {
        self.binding.as_ref()
    }

    #[must_use]
    pub fn is_deferred(&self) -> bool {
        self.attributes.has(names::DEFERRED)
    }

    /// `quick-look` or `scene-viewer` once initialized.
    #[must_use]
    pub fn ar_marker(&self) -> Option<&str> {
        self.attributes.get(names::AR)
    }

    pub(crate) fn bind(&mut self, binding: ClickBinding) {
        self.attributes.set(names::AR, binding.viewer.marker());
        self.binding = Some(binding);
    }

    pub(crate) fn unbind(&mut self) {
        self.attributes.remove(names::AR);
        self.binding = None;
    }
}

/// The page's AR buttons in document order.
#[derive(Debug, Clone, Default)]
pub struct ArDocument {
    buttons: Vec<ArButtonElement>,
    next_id: u64,
}

impl ArDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a button with the given markup attributes.
    pub fn insert(&mut self, attributes: Attributes) -> ButtonId {
        self.next_id += 1;
        let id = ButtonId::new(self.next_id);
        self.buttons.push(ArButtonElement {
            id,
            attributes,
            binding: None,
        });
        id
    }

    #[must_use]
    pub fn get(&self, id: ButtonId) -> Option<&ArButtonElement> {
        self.buttons.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: ButtonId) -> Option<&mut ArButtonElement> {
        self.buttons.iter_mut().find(|b| b.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArButtonElement> {
        self.buttons.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut ArButtonElement> {
        self.buttons.iter_mut()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }
}
