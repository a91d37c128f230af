//! Pure predicates classifying [`Value`]s.
//!
//! None of these panic or mutate their input. The composite guards decide
//! which binding shape an event-namespace write carries; see
//! [`crate::events::Binding::classify`] for the order they are tried in.

use crate::events::EVENT_CONTEXT_TAG;
use crate::value::Value;

/// Non-null, non-callable object values.
pub fn is_object(value: &Value) -> bool {
    matches!(
        value,
        Value::StringObject(_)
            | Value::NumberObject(_)
            | Value::Element(_)
            | Value::Document(_)
            | Value::Array(_)
            | Value::Object(_)
            | Value::Context(_)
            | Value::Registry(_)
    )
}

pub fn is_string_or_symbol(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Symbol(_))
}

/// Anything usable as an event-type key, boxed strings and numbers included.
pub fn is_key(value: &Value) -> bool {
    is_string_or_symbol(value) || matches!(value, Value::StringObject(_) | Value::NumberObject(_))
}

pub fn is_function(value: &Value) -> bool {
    matches!(value, Value::Function(_))
}

pub fn is_bool_or_object(value: &Value) -> bool {
    matches!(value, Value::Bool(_)) || is_object(value)
}

pub fn is_element(value: &Value) -> bool {
    matches!(value, Value::Element(_))
}

pub fn is_event_context(value: &Value) -> bool {
    matches!(value, Value::Context(context) if context.tag() == EVENT_CONTEXT_TAG)
}

/// `[element, type, listener, options?]`
pub fn is_event_params(value: &Value) -> bool {
    let Value::Array(items) = value else {
        return false;
    };
    items.len() >= 3
        && is_element(&items[0])
        && is_key(&items[1])
        && is_function(&items[2])
        && items
            .get(3)
            .map(|options| options.is_undefined() || is_bool_or_object(options))
            .unwrap_or(true)
}

/// `{ onElement, type, listener, options? }`
pub fn is_event_config(value: &Value) -> bool {
    if !matches!(value, Value::Object(_)) {
        return false;
    }
    let member = |key: &str| value.get(key).unwrap_or(&Value::Undefined);
    is_element(member("onElement"))
        && is_key(member("type"))
        && is_function(member("listener"))
        && {
            let options = member("options");
            options.is_undefined() || is_bool_or_object(options)
        }
}
