use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use html5ever::{LocalName, Namespace, QualName};
use kuchiki::{Attribute, ExpandedName, NodeRef};
use tracing::trace;

use super::element::HtmlElement;
use super::error::DomError;
use super::listeners;

pub(crate) const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

const RESERVED_CUSTOM_ELEMENT_NAMES: &[&str] = &[
    "annotation-xml",
    "color-profile",
    "font-face",
    "font-face-src",
    "font-face-uri",
    "font-face-format",
    "font-face-name",
    "missing-glyph",
];

pub(crate) struct DocumentInner {
    root: NodeRef,
    created: Cell<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementCreationOptions {
    /// Customized built-in element name (`<button is="fancy-button">`).
    pub is: Option<String>,
    /// Keep the tag name as given instead of lower-casing it.
    pub preserve_case: bool,
}

/// An HTML document with an `html`/`head`/`body` skeleton.
#[derive(Clone)]
pub struct Document {
    inner: Rc<DocumentInner>,
}

thread_local! {
    static AMBIENT: Document = Document::new();
}

impl Document {
    pub fn new() -> Self {
        let document = Self {
            inner: Rc::new(DocumentInner {
                root: NodeRef::new_document(),
                created: Cell::new(0),
            }),
        };

        let html = document.new_element("html");
        let head = document.new_element("head");
        let body = document.new_element("body");
        html.node().append(head.node().clone());
        html.node().append(body.node().clone());
        document.inner.root.append(html.node().clone());
        document
    }

    /// The document elements are created in when the caller names none.
    pub fn ambient() -> Self {
        AMBIENT.with(Document::clone)
    }

    pub(crate) fn from_inner(inner: Rc<DocumentInner>) -> Self {
        Self { inner }
    }

    pub fn create_element(
        &self,
        tag_name: &str,
        options: ElementCreationOptions,
    ) -> Result<HtmlElement, DomError> {
        if !is_valid_name(tag_name) {
            return Err(DomError::InvalidCharacter(tag_name.to_string()));
        }

        let local_name = if options.preserve_case {
            tag_name.to_string()
        } else {
            tag_name.to_ascii_lowercase()
        };
        let element = self.new_element(&local_name);
        if let Some(is) = options.is {
            element.set_attribute("is", &is)?;
        }
        self.inner.created.set(self.inner.created.get() + 1);
        trace!(target: "dom", tag = %element.local_name(), "created element");
        Ok(element)
    }

    fn new_element(&self, local_name: &str) -> HtmlElement {
        let name = QualName::new(
            None,
            Namespace::from(HTML_NAMESPACE),
            LocalName::from(local_name),
        );
        let node = NodeRef::new_element(name, Vec::<(ExpandedName, Attribute)>::new());
        listeners::set_owner(&node, &self.inner);
        HtmlElement::from_element_node(node)
    }

    pub fn document_element(&self) -> Option<HtmlElement> {
        self.inner.root.children().find_map(HtmlElement::from_node)
    }

    pub fn head(&self) -> Option<HtmlElement> {
        self.top_level("head")
    }

    pub fn body(&self) -> Option<HtmlElement> {
        self.top_level("body")
    }

    fn top_level(&self, local_name: &str) -> Option<HtmlElement> {
        self.document_element()?
            .children()
            .into_iter()
            .find(|child| child.local_name() == local_name)
    }

    /// Number of elements made through [`Document::create_element`].
    pub fn created_elements(&self) -> usize {
        self.inner.created.get()
    }

    pub fn to_html(&self) -> String {
        self.inner
            .root
            .children()
            .map(|child| child.to_string())
            .collect()
    }

    pub fn ptr_eq(&self, other: &Document) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("created_elements", &self.created_elements())
            .finish()
    }
}

pub(crate) fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_alphabetic() || first == '_' || first == ':') {
        return false;
    }
    chars.all(|ch| ch.is_alphanumeric() || matches!(ch, '-' | '.' | '_' | ':') || !ch.is_ascii())
}

pub fn is_valid_custom_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_lowercase()
        && name.contains('-')
        && chars.all(|ch| {
            ch.is_ascii_lowercase()
                || ch.is_ascii_digit()
                || matches!(ch, '-' | '.' | '_')
                || !ch.is_ascii()
        })
        && !RESERVED_CUSTOM_ELEMENT_NAMES.contains(&name)
}
