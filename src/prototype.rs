//! Per-instance event namespace.
//!
//! [`Evented`] stands in front of an element: the reserved [`EVENT_KEY`]
//! answers with the element's [`EventRegistry`], every other member is
//! forwarded to the wrapped value untouched. Nothing shared between
//! elements is modified.

use std::cell::OnceCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use tracing::trace;

use crate::dom::HtmlElement;
use crate::events::EventRegistry;
use crate::value::Value;

pub const EVENT_KEY: &str = "event";
pub const ORIGINAL_PROTOTYPE_KEY: &str = "originalPrototype";

/// Anything backed by a host element that listeners can be bound on.
pub trait EventTarget {
    fn target_element(&self) -> &HtmlElement;
}

impl EventTarget for HtmlElement {
    fn target_element(&self) -> &HtmlElement {
        self
    }
}

/// String-keyed member lookup.
pub trait PropertyAccess {
    /// `Value::Undefined` for unknown keys.
    fn property(&self, key: &str) -> Value;

    fn enumerable_keys(&self) -> Vec<String>;
}

const ELEMENT_PROPERTIES: &[&str] = &[
    "tagName",
    "localName",
    "id",
    "className",
    "textContent",
    "innerHTML",
    "outerHTML",
    "parentElement",
    "children",
    "attributes",
    "style",
    "isConnected",
];

impl PropertyAccess for HtmlElement {
    fn property(&self, key: &str) -> Value {
        match key {
            "tagName" => Value::String(self.tag_name()),
            "localName" => Value::String(self.local_name()),
            "id" => Value::String(self.id()),
            "className" => Value::String(self.class_name()),
            "textContent" => Value::String(self.text_content()),
            "innerHTML" => Value::String(self.inner_html()),
            "outerHTML" => Value::String(self.outer_html()),
            "parentElement" => self.parent_element().map(Value::Element).unwrap_or(Value::Null),
            "children" => Value::array(self.children().into_iter().map(Value::Element)),
            "attributes" => Value::object(
                self.attributes()
                    .into_iter()
                    .map(|(name, value)| (name, Value::String(value))),
            ),
            "style" => Value::object(
                self.style()
                    .into_iter()
                    .map(|(name, value)| (name, Value::String(value))),
            ),
            "isConnected" => Value::Bool(self.is_connected()),
            _ => Value::Undefined,
        }
    }

    fn enumerable_keys(&self) -> Vec<String> {
        ELEMENT_PROPERTIES.iter().map(|key| key.to_string()).collect()
    }
}

/// An element with an event namespace installed.
///
/// The registry belongs to the element node: it is created on first use and
/// every handle to the same element, wrapped once or several times, sees
/// the same one.
pub struct Evented<T> {
    original: T,
    events: Rc<OnceCell<EventRegistry>>,
}

impl<T: EventTarget> Evented<T> {
    pub fn install(original: T) -> Self {
        trace!(
            target: "events",
            tag = %original.target_element().local_name(),
            "installed event namespace"
        );
        Self {
            original,
            events: Rc::new(OnceCell::new()),
        }
    }

    /// The element's event registry, created on first access.
    pub fn event(&self) -> &EventRegistry {
        self.events
            .get_or_init(|| EventRegistry::for_element(self.original.target_element()))
    }

    /// The value this namespace was installed over.
    pub fn original_prototype(&self) -> &T {
        &self.original
    }

    pub fn into_original(self) -> T {
        self.original
    }
}

impl<T> Deref for Evented<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.original
    }
}

impl<T: EventTarget> EventTarget for Evented<T> {
    fn target_element(&self) -> &HtmlElement {
        self.original.target_element()
    }
}

impl<T: EventTarget + PropertyAccess> PropertyAccess for Evented<T> {
    fn property(&self, key: &str) -> Value {
        match key {
            EVENT_KEY => Value::Registry(self.event().clone()),
            ORIGINAL_PROTOTYPE_KEY => Value::Element(self.original.target_element().clone()),
            _ => self.original.property(key),
        }
    }

    fn enumerable_keys(&self) -> Vec<String> {
        self.original
            .enumerable_keys()
            .into_iter()
            .filter(|key| key != EVENT_KEY && key != ORIGINAL_PROTOTYPE_KEY)
            .collect()
    }
}

impl<T: Clone> Clone for Evented<T> {
    fn clone(&self) -> Self {
        Self {
            original: self.original.clone(),
            events: Rc::clone(&self.events),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Evented<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evented")
            .field("original", &self.original)
            .field("events", &self.events.get())
            .finish()
    }
}
