//! Dynamically typed values handed to the event namespace and the factory.
//!
//! Bindings and construction options may arrive in several structurally
//! different shapes. `Value` is the closed set of shapes the type guards in
//! [`crate::guards`] know how to classify.

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

use crate::dom::{Document, Event, EventKey, HtmlElement, Listener, Symbol};
use crate::events::{EventContext, EventRegistry};
use crate::prototype::{EventTarget, Evented};

#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Symbol(Symbol),
    /// Boxed string primitive.
    StringObject(String),
    /// Boxed number primitive.
    NumberObject(f64),
    Function(Listener),
    Element(HtmlElement),
    Document(Document),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
    Context(EventContext),
    Registry(EventRegistry),
}

impl Value {
    pub fn function(callback: impl Fn(&Event) + 'static) -> Self {
        Value::Function(Listener::new(callback))
    }

    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(items.into_iter().collect())
    }

    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    pub fn from_json(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(value) => Value::Bool(value),
            JsonValue::Number(number) => Value::Number(number.as_f64().unwrap_or(f64::NAN)),
            JsonValue::String(value) => Value::String(value),
            JsonValue::Array(items) => Value::Array(items.into_iter().map(Value::from_json).collect()),
            JsonValue::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from_json(value)))
                    .collect(),
            ),
        }
    }

    /// Member lookup on object values; every other shape has no members.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_listener(&self) -> Option<&Listener> {
        match self {
            Value::Function(listener) => Some(listener),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&HtmlElement> {
        match self {
            Value::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_context(&self) -> Option<&EventContext> {
        match self {
            Value::Context(context) => Some(context),
            _ => None,
        }
    }

    pub fn as_registry(&self) -> Option<&EventRegistry> {
        match self {
            Value::Registry(registry) => Some(registry),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(value) => *value,
            Value::Number(value) => *value != 0.0 && !value.is_nan(),
            Value::String(value) => !value.is_empty(),
            _ => true,
        }
    }

    /// Converts string, symbol and boxed string/number values into an
    /// event-type key.
    pub fn to_event_key(&self) -> Option<EventKey> {
        match self {
            Value::String(value) | Value::StringObject(value) => Some(EventKey::Name(value.clone())),
            Value::Symbol(symbol) => Some(EventKey::Symbol(symbol.clone())),
            Value::NumberObject(value) => Some(EventKey::Name(format_number(*value))),
            _ => None,
        }
    }

    /// Text form of primitive values, as used for attribute and style values.
    pub fn to_display_string(&self) -> Option<String> {
        match self {
            Value::String(value) | Value::StringObject(value) => Some(value.clone()),
            Value::Number(value) | Value::NumberObject(value) => Some(format_number(*value)),
            Value::Bool(value) => Some(value.to_string()),
            _ => None,
        }
    }
}

fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{value:.0}")
    } else if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        value.to_string()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::StringObject(a), Value::StringObject(b)) => a == b,
            (Value::NumberObject(a), Value::NumberObject(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Element(a), Value::Element(b)) => a.ptr_eq(b),
            (Value::Document(a), Value::Document(b)) => a.ptr_eq(b),
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Context(a), Value::Context(b)) => a.same_binding(b),
            (Value::Registry(a), Value::Registry(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<Symbol> for Value {
    fn from(value: Symbol) -> Self {
        Value::Symbol(value)
    }
}

impl From<EventKey> for Value {
    fn from(value: EventKey) -> Self {
        match value {
            EventKey::Name(name) => Value::String(name),
            EventKey::Symbol(symbol) => Value::Symbol(symbol),
        }
    }
}

impl From<Listener> for Value {
    fn from(value: Listener) -> Self {
        Value::Function(value)
    }
}

impl From<&Listener> for Value {
    fn from(value: &Listener) -> Self {
        Value::Function(value.clone())
    }
}

impl From<HtmlElement> for Value {
    fn from(value: HtmlElement) -> Self {
        Value::Element(value)
    }
}

impl From<&HtmlElement> for Value {
    fn from(value: &HtmlElement) -> Self {
        Value::Element(value.clone())
    }
}

impl<T: EventTarget> From<&Evented<T>> for Value {
    fn from(value: &Evented<T>) -> Self {
        Value::Element(value.target_element().clone())
    }
}

impl From<Document> for Value {
    fn from(value: Document) -> Self {
        Value::Document(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<EventContext> for Value {
    fn from(value: EventContext) -> Self {
        Value::Context(value)
    }
}

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        Value::from_json(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Undefined)
    }
}
