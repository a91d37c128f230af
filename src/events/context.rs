use std::fmt;

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::dom::{
    AddEventListenerOptions, Event, EventInit, EventKey, HtmlElement, Listener, ListenerOptions,
    WeakElement,
};
use crate::guards;
use crate::value::Value;

/// Marker carried by every event context so the type guards can tell a
/// context apart from a look-alike object.
pub const EVENT_CONTEXT_TAG: &str = "EventContext";

/// One bound event: which element, which type, which listener, and how it
/// was registered. The element is held weakly.
#[derive(Clone)]
pub struct EventContext {
    element: WeakElement,
    event_type: EventKey,
    listener: Listener,
    use_capture: Option<bool>,
    options: Option<AddEventListenerOptions>,
}

impl EventContext {
    pub fn new(
        element: &HtmlElement,
        event_type: impl Into<EventKey>,
        listener: Listener,
        options: Option<ListenerOptions>,
    ) -> Self {
        Self::with_element(element.downgrade(), event_type.into(), listener, options)
    }

    pub(crate) fn with_element(
        element: WeakElement,
        event_type: EventKey,
        listener: Listener,
        options: Option<ListenerOptions>,
    ) -> Self {
        let (use_capture, options) = match options {
            Some(ListenerOptions::Capture(capture)) => (Some(capture), None),
            Some(ListenerOptions::Options(options)) => (None, Some(options)),
            None => (None, None),
        };
        Self {
            element,
            event_type,
            listener,
            use_capture,
            options,
        }
    }

    /// Reads a fourth binding argument: booleans select capture, any object
    /// is read as `{ capture, once, passive }` with missing flags false, and
    /// anything else is ignored.
    pub fn options_from_value(value: &Value) -> Option<ListenerOptions> {
        match value {
            Value::Bool(capture) => Some(ListenerOptions::Capture(*capture)),
            _ if guards::is_object(value) => {
                if !matches!(value, Value::Object(_)) {
                    debug!(target: "events", options = ?value, "options object carries no flags");
                }
                let flag = |key: &str| value.get(key).map(Value::is_truthy).unwrap_or(false);
                Some(ListenerOptions::Options(AddEventListenerOptions {
                    capture: flag("capture"),
                    once: flag("once"),
                    passive: flag("passive"),
                }))
            }
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        EVENT_CONTEXT_TAG
    }

    pub fn element(&self) -> Option<HtmlElement> {
        self.element.upgrade()
    }

    pub fn event_type(&self) -> &EventKey {
        &self.event_type
    }

    pub fn listener(&self) -> &Listener {
        &self.listener
    }

    pub fn use_capture(&self) -> Option<bool> {
        self.use_capture
    }

    pub fn options(&self) -> Option<AddEventListenerOptions> {
        self.options
    }

    /// What the native add/remove calls receive: the capture flag when set,
    /// otherwise the options record.
    pub fn native_options(&self) -> Option<ListenerOptions> {
        self.use_capture
            .map(ListenerOptions::Capture)
            .or(self.options.map(ListenerOptions::Options))
    }

    pub fn apply(&self) {
        let Some(element) = self.element() else {
            debug!(target: "events", event = %self.event_type, "element dropped; nothing to apply");
            return;
        };
        element.add_event_listener(&self.event_type, &self.listener, self.native_options());
    }

    /// Unregisters the listener. Without an override the context's own
    /// capture flag or options are used so the matching registration goes.
    pub fn remove(&self, options: Option<ListenerOptions>) {
        let Some(element) = self.element() else {
            debug!(target: "events", event = %self.event_type, "element dropped; nothing to remove");
            return;
        };
        let options = options.or_else(|| self.native_options());
        element.remove_event_listener(&self.event_type, &self.listener, options);
    }

    /// Dispatches a cancelable, non-bubbling custom event carrying `detail`.
    pub fn fire(&self, event_type: impl Into<EventKey>, detail: JsonValue) -> bool {
        self.fire_with(event_type, EventInit::custom(detail))
    }

    pub fn fire_with(&self, event_type: impl Into<EventKey>, init: EventInit) -> bool {
        let Some(element) = self.element() else {
            return false;
        };
        element.dispatch_event(&Event::new(event_type, init))
    }

    /// Same element, type, listener and registration flags.
    pub fn same_binding(&self, other: &EventContext) -> bool {
        let same_element = match (self.element(), other.element()) {
            (Some(a), Some(b)) => a.ptr_eq(&b),
            (None, None) => true,
            _ => false,
        };
        same_element
            && self.event_type == other.event_type
            && self.listener.ptr_eq(&other.listener)
            && self.use_capture == other.use_capture
            && self.options == other.options
    }
}

impl fmt::Debug for EventContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventContext")
            .field("element", &self.element)
            .field("type", &self.event_type)
            .field("listener", &self.listener)
            .field("use_capture", &self.use_capture)
            .field("options", &self.options)
            .finish()
    }
}
