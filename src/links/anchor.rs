use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// A hyperlink on the page, seen through the one attribute that holds its URL.
///
/// Equality is structural: two anchor lists compare equal when every anchor
/// looks the same, regardless of which handles they are.
pub trait Anchor: Clone + PartialEq + Send + Sync + 'static {
    fn link_value(&self) -> String;

    fn set_link_value(&self, value: &str);
}

/// Attributes and text of an `<a>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorElement {
    pub attributes: BTreeMap<String, String>,
    pub text: String,
}

/// Shared handle to an anchor element with the link attribute resolved once.
///
/// Clones point at the same element, so a rewrite through one handle is
/// visible through every other.
#[derive(Clone)]
pub struct ElementAnchor {
    element: Arc<RwLock<AnchorElement>>,
    attribute: Arc<str>,
}

impl ElementAnchor {
    pub fn new(element: AnchorElement, attribute: &str) -> Self {
        Self {
            element: Arc::new(RwLock::new(element)),
            attribute: Arc::from(attribute),
        }
    }

    /// Standalone anchor carrying only its link attribute.
    pub fn detached(attribute: &str, value: &str) -> Self {
        let mut element = AnchorElement::default();
        element
            .attributes
            .insert(attribute.to_string(), value.to_string());
        Self::new(element, attribute)
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn text(&self) -> String {
        self.snapshot().text
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.element
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .attributes
            .get(name)
            .cloned()
    }

    pub fn snapshot(&self) -> AnchorElement {
        self.element
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn same_element(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.element, &other.element)
    }
}

impl Anchor for ElementAnchor {
    fn link_value(&self) -> String {
        self.get(&self.attribute).unwrap_or_default()
    }

    fn set_link_value(&self, value: &str) {
        self.element
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .attributes
            .insert(self.attribute.to_string(), value.to_string());
    }
}

impl PartialEq for ElementAnchor {
    fn eq(&self, other: &Self) -> bool {
        if self.attribute != other.attribute {
            return false;
        }
        // Same element: skip locking it twice.
        if self.same_element(other) {
            return true;
        }
        self.snapshot() == other.snapshot()
    }
}

impl fmt::Debug for ElementAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementAnchor")
            .field("attribute", &self.attribute)
            .field("link", &self.link_value())
            .finish()
    }
}
