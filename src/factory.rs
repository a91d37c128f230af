use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::config::Config;
use crate::dom::{
    is_valid_custom_element_name, Document, DomError, ElementCreationOptions, HtmlElement,
};
use crate::guards;
use crate::prototype::{EventTarget, Evented};
use crate::value::Value;

/// What the factory hands back: a host element with its event namespace.
pub type Element = Evented<HtmlElement>;

/// Keys that mark an object passed as content as a full options record.
pub const OPTION_KEYS: [&str; 6] = [
    "style",
    "attributes",
    "content",
    "webComponentName",
    "useDocument",
    "children",
];

#[derive(Debug, Clone, Default)]
pub struct ElementOptions {
    pub style: BTreeMap<String, String>,
    pub attributes: BTreeMap<String, String>,
    pub content: Option<String>,
    pub web_component_name: Option<String>,
    pub use_document: Option<Document>,
    pub children: Vec<HtmlElement>,
}

impl ElementOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(name.into(), value.into());
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn web_component(mut self, name: impl Into<String>) -> Self {
        self.web_component_name = Some(name.into());
        self
    }

    pub fn document(mut self, document: &Document) -> Self {
        self.use_document = Some(document.clone());
        self
    }

    pub fn child(mut self, child: &impl EventTarget) -> Self {
        self.children.push(child.target_element().clone());
        self
    }

    /// True for non-null objects exposing at least one of [`OPTION_KEYS`].
    pub fn is_options_record(value: &Value) -> bool {
        guards::is_object(value) && OPTION_KEYS.iter().any(|key| value.get(key).is_some())
    }

    /// Reads an options record. Unusable members fall back to defaults.
    pub fn from_value(value: &Value) -> Self {
        let content = match value.get("content") {
            Some(Value::String(content)) => Some(content.clone()),
            Some(Value::Undefined) | None => None,
            Some(other) => {
                debug!(target: "elements", content = ?other, "ignoring non-string content");
                None
            }
        };

        Self {
            style: string_map(value.get("style")),
            attributes: string_map(value.get("attributes")),
            content,
            web_component_name: value
                .get("webComponentName")
                .and_then(Value::as_str)
                .map(str::to_string),
            use_document: match value.get("useDocument") {
                Some(Value::Document(document)) => Some(document.clone()),
                _ => None,
            },
            children: children(value.get("children")),
        }
    }

    /// Folds the positional arguments of `create` into one record. An
    /// options record passed as content wins and the rest are ignored.
    pub fn normalize(
        content_or_options: Value,
        style: Option<BTreeMap<String, String>>,
        attributes: Option<BTreeMap<String, String>>,
        web_component_name: Option<String>,
        use_document: Option<Document>,
        children: Vec<HtmlElement>,
    ) -> Self {
        if Self::is_options_record(&content_or_options) {
            return Self::from_value(&content_or_options);
        }

        Self {
            style: style.unwrap_or_default(),
            attributes: attributes.unwrap_or_default(),
            content: match content_or_options {
                Value::String(content) => Some(content),
                _ => None,
            },
            web_component_name,
            use_document,
            children,
        }
    }
}

fn string_map(value: Option<&Value>) -> BTreeMap<String, String> {
    let Some(Value::Object(map)) = value else {
        return BTreeMap::new();
    };
    map.iter()
        .filter_map(|(name, value)| {
            let text = value.to_display_string();
            if text.is_none() {
                warn!(target: "elements", name = %name, "skipping non-primitive option value");
            }
            Some((name.clone(), text?))
        })
        .collect()
}

fn children(value: Option<&Value>) -> Vec<HtmlElement> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let child = item.as_element().cloned();
            if child.is_none() {
                warn!(target: "elements", child = ?item, "skipping non-element child");
            }
            child
        })
        .collect()
}

/// Second argument of [`ElementFactory::create`].
#[derive(Debug, Clone, Default)]
pub enum Content {
    #[default]
    Empty,
    Text(String),
    Options(ElementOptions),
    /// Normalised at build time; see [`ElementOptions::normalize`].
    Value(Value),
}

impl Content {
    pub fn into_options(self) -> ElementOptions {
        match self {
            Content::Empty => ElementOptions::default(),
            Content::Text(text) => ElementOptions::default().content(text),
            Content::Options(options) => options,
            Content::Value(value) => {
                ElementOptions::normalize(value, None, None, None, None, Vec::new())
            }
        }
    }
}

impl From<()> for Content {
    fn from(_: ()) -> Self {
        Content::Empty
    }
}

impl From<&str> for Content {
    fn from(value: &str) -> Self {
        Content::Text(value.to_string())
    }
}

impl From<String> for Content {
    fn from(value: String) -> Self {
        Content::Text(value)
    }
}

impl From<ElementOptions> for Content {
    fn from(value: ElementOptions) -> Self {
        Content::Options(value)
    }
}

impl From<Value> for Content {
    fn from(value: Value) -> Self {
        Content::Value(value)
    }
}

/// Builds configured elements with their event namespace installed.
#[derive(Debug, Clone)]
pub struct ElementFactory {
    document: Document,
    config: Config,
}

impl ElementFactory {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            document: Document::ambient(),
            config,
        }
    }

    /// Document used when an options record names none.
    pub fn with_document(mut self, document: Document) -> Self {
        self.document = document;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn create(&self, tag_name: &str, content: impl Into<Content>) -> Result<Element, DomError> {
        self.build(tag_name, content.into().into_options())
    }

    /// Positional form of [`ElementFactory::create`].
    #[allow(clippy::too_many_arguments)]
    pub fn create_with(
        &self,
        tag_name: &str,
        content_or_options: impl Into<Value>,
        style: Option<BTreeMap<String, String>>,
        attributes: Option<BTreeMap<String, String>>,
        web_component_name: Option<&str>,
        use_document: Option<&Document>,
        children: &[HtmlElement],
    ) -> Result<Element, DomError> {
        let options = ElementOptions::normalize(
            content_or_options.into(),
            style,
            attributes,
            web_component_name.map(str::to_string),
            use_document.cloned(),
            children.to_vec(),
        );
        self.build(tag_name, options)
    }

    /// Creates the element, installs the event namespace, then applies
    /// attributes, style, text content and children in that order.
    pub fn build(&self, tag_name: &str, options: ElementOptions) -> Result<Element, DomError> {
        if let Some(name) = &options.web_component_name {
            if self.config.validate_web_component_names && !is_valid_custom_element_name(name) {
                return Err(DomError::InvalidCustomElementName(name.clone()));
            }
        }

        let document = options.use_document.as_ref().unwrap_or(&self.document);
        let host = document.create_element(
            tag_name,
            ElementCreationOptions {
                is: options.web_component_name.clone(),
                preserve_case: !self.config.lowercase_tag_names,
            },
        )?;
        let element = Evented::install(host);

        for (name, value) in &options.attributes {
            element.set_attribute(name, value)?;
        }
        for (name, value) in &options.style {
            element.set_style_property(name, value);
        }
        if let Some(content) = &options.content {
            element.set_text_content(content);
        }
        for child in &options.children {
            element.append_child(child)?;
        }

        debug!(
            target: "elements",
            tag = %element.local_name(),
            attributes = options.attributes.len(),
            style = options.style.len(),
            children = options.children.len(),
            "created element"
        );
        Ok(element)
    }
}

impl Default for ElementFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_record_detection() {
        assert!(ElementOptions::is_options_record(&Value::object([(
            "content",
            Value::from("x")
        )])));
        assert!(ElementOptions::is_options_record(&Value::object([(
            "children",
            Value::Array(Vec::new())
        )])));
        assert!(!ElementOptions::is_options_record(&Value::object([(
            "title",
            Value::from("x")
        )])));
        assert!(!ElementOptions::is_options_record(&Value::from("content")));
        assert!(!ElementOptions::is_options_record(&Value::Null));
    }

    #[test]
    fn normalize_prefers_options_record() {
        let options = ElementOptions::normalize(
            Value::object([
                ("content", Value::from("from record")),
                ("style", Value::object([("color", Value::from("red"))])),
            ]),
            None,
            Some(BTreeMap::from([("id".to_string(), "ignored".to_string())])),
            Some("ignored-name".to_string()),
            None,
            Vec::new(),
        );
        assert_eq!(options.content.as_deref(), Some("from record"));
        assert_eq!(options.style.get("color").map(String::as_str), Some("red"));
        assert!(options.attributes.is_empty());
        assert!(options.web_component_name.is_none());
    }

    #[test]
    fn normalize_uses_positionals_verbatim() {
        let options = ElementOptions::normalize(
            Value::from("hello"),
            Some(BTreeMap::from([("margin".to_string(), "0".to_string())])),
            None,
            None,
            None,
            Vec::new(),
        );
        assert_eq!(options.content.as_deref(), Some("hello"));
        assert_eq!(options.style.len(), 1);

        let untitled = ElementOptions::normalize(
            Value::object([("title", Value::from("not an option"))]),
            None,
            None,
            None,
            None,
            Vec::new(),
        );
        assert!(untitled.content.is_none());
    }

    #[test]
    fn from_value_reads_every_member() {
        let document = Document::new();
        let child = document
            .create_element("i", ElementCreationOptions::default())
            .expect("create child");
        let options = ElementOptions::from_value(&Value::object([
            ("attributes", Value::object([("tabindex", Value::Number(0.0))])),
            ("content", Value::Number(3.0)),
            ("webComponentName", Value::from("x-card")),
            ("useDocument", Value::from(document.clone())),
            (
                "children",
                Value::array([Value::from(&child), Value::from("skip me")]),
            ),
        ]));
        assert_eq!(options.attributes.get("tabindex").map(String::as_str), Some("0"));
        assert!(options.content.is_none());
        assert_eq!(options.web_component_name.as_deref(), Some("x-card"));
        assert!(options.use_document.expect("document").ptr_eq(&document));
        assert_eq!(options.children.len(), 1);
    }

    #[test]
    fn tag_case_follows_config() {
        let document = Document::new();
        let lowering = ElementFactory::new().with_document(document.clone());
        assert_eq!(
            lowering.create("DIV", ()).expect("create div").local_name(),
            "div"
        );

        let preserving = ElementFactory::with_config(Config {
            lowercase_tag_names: false,
            ..Config::default()
        })
        .with_document(document);
        let element = preserving.create("DIV", ()).expect("create DIV");
        assert_eq!(element.local_name(), "DIV");
        assert_eq!(element.outer_html(), "<DIV></DIV>");
    }

    #[test]
    fn invalid_web_component_name_depends_on_config() {
        let document = Document::new();
        let strict = ElementFactory::new().with_document(document.clone());
        let err = strict
            .create("button", ElementOptions::new().web_component("Fancy"))
            .unwrap_err();
        assert_eq!(err, DomError::InvalidCustomElementName("Fancy".to_string()));
        assert_eq!(document.created_elements(), 0);

        let lenient = ElementFactory::with_config(Config {
            validate_web_component_names: false,
            ..Config::default()
        })
        .with_document(document);
        let element = lenient
            .create("button", ElementOptions::new().web_component("Fancy"))
            .expect("lenient create");
        assert_eq!(element.is_value().as_deref(), Some("Fancy"));
    }
}
