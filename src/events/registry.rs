use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use super::context::EventContext;
use crate::dom::{EventKey, HtmlElement, Listener, ListenerOptions, WeakElement};
use crate::guards;
use crate::value::Value;

/// The four accepted shapes of an event-namespace write.
#[derive(Clone, Debug)]
pub enum Binding {
    /// A context built by the caller, stored as is.
    Context(EventContext),
    /// A bare listener bound on the owning element.
    Listener(Listener),
    /// `[element, type, listener, options?]`; binds on `element`, which may
    /// differ from the element owning the registry.
    Params {
        element: HtmlElement,
        event_type: EventKey,
        listener: Listener,
        options: Option<ListenerOptions>,
    },
    /// `{ onElement, type, listener, options? }`; binds on the owning
    /// element. `on_element` is accepted but not used for registration.
    Config {
        on_element: HtmlElement,
        event_type: EventKey,
        listener: Listener,
        options: Option<ListenerOptions>,
    },
}

impl Binding {
    pub fn from_context(context: EventContext) -> Self {
        Binding::Context(context)
    }

    pub fn from_listener(listener: Listener) -> Self {
        Binding::Listener(listener)
    }

    pub fn from_params(
        element: &HtmlElement,
        event_type: impl Into<EventKey>,
        listener: Listener,
        options: Option<ListenerOptions>,
    ) -> Self {
        Binding::Params {
            element: element.clone(),
            event_type: event_type.into(),
            listener,
            options,
        }
    }

    pub fn from_config(
        on_element: &HtmlElement,
        event_type: impl Into<EventKey>,
        listener: Listener,
        options: Option<ListenerOptions>,
    ) -> Self {
        Binding::Config {
            on_element: on_element.clone(),
            event_type: event_type.into(),
            listener,
            options,
        }
    }

    /// Picks the first matching shape in the order context, function,
    /// params array, config object.
    pub fn classify(value: &Value) -> Option<Self> {
        if guards::is_event_context(value) {
            return value.as_context().cloned().map(Binding::Context);
        }
        if guards::is_function(value) {
            return value.as_listener().cloned().map(Binding::Listener);
        }
        if guards::is_event_params(value) {
            let Value::Array(items) = value else {
                return None;
            };
            return Some(Binding::Params {
                element: items[0].as_element()?.clone(),
                event_type: items[1].to_event_key()?,
                listener: items[2].as_listener()?.clone(),
                options: items.get(3).and_then(EventContext::options_from_value),
            });
        }
        if guards::is_event_config(value) {
            return Some(Binding::Config {
                on_element: value.get("onElement")?.as_element()?.clone(),
                event_type: value.get("type")?.to_event_key()?,
                listener: value.get("listener")?.as_listener()?.clone(),
                options: value
                    .get("options")
                    .and_then(EventContext::options_from_value),
            });
        }
        None
    }

    fn into_context(self, owner: &WeakElement, key: &EventKey) -> EventContext {
        match self {
            Binding::Context(context) => context,
            Binding::Listener(listener) => {
                EventContext::with_element(owner.clone(), key.clone(), listener, None)
            }
            Binding::Params {
                element,
                event_type,
                listener,
                options,
            } => EventContext::new(&element, event_type, listener, options),
            Binding::Config {
                on_element: _,
                event_type,
                listener,
                options,
            } => EventContext::with_element(owner.clone(), event_type, listener, options),
        }
    }
}

struct RegistryInner {
    owner: WeakElement,
    entries: RefCell<HashMap<EventKey, EventContext>>,
}

/// Per-element map from event type to its current binding. Writes and
/// deletes keep the element's native listeners in step with the map.
///
/// Clones share the same map.
#[derive(Clone)]
pub struct EventRegistry {
    inner: Rc<RegistryInner>,
}

impl EventRegistry {
    pub(crate) fn new(owner: &HtmlElement) -> Self {
        Self {
            inner: Rc::new(RegistryInner {
                owner: owner.downgrade(),
                entries: RefCell::new(HashMap::new()),
            }),
        }
    }

    /// The registry belonging to `element`, created on first request and
    /// kept for as long as the element node lives.
    pub fn for_element(element: &HtmlElement) -> Self {
        element.extension(|| {
            debug!(target: "events", tag = %element.local_name(), "created event registry");
            EventRegistry::new(element)
        })
    }

    pub fn owner(&self) -> Option<HtmlElement> {
        self.inner.owner.upgrade()
    }

    /// The bound listener, not its context.
    pub fn get(&self, event_type: impl Into<EventKey>) -> Option<Listener> {
        self.inner
            .entries
            .borrow()
            .get(&event_type.into())
            .map(|context| context.listener().clone())
    }

    /// Classifies `value` and binds it. Returns `false`, leaving any
    /// existing binding in place, when the value matches no known shape.
    pub fn set(&self, event_type: impl Into<EventKey>, value: impl Into<Value>) -> bool {
        let event_type = event_type.into();
        match Binding::classify(&value.into()) {
            Some(binding) => self.bind(event_type, binding),
            None => {
                warn!(
                    target: "events",
                    event = %event_type,
                    "rejected binding that matches no known shape"
                );
                false
            }
        }
    }

    /// Stores the binding and registers it natively. A binding it replaces
    /// is dropped from the map without being unregistered.
    pub fn bind(&self, event_type: impl Into<EventKey>, binding: Binding) -> bool {
        let event_type = event_type.into();
        let context = binding.into_context(&self.inner.owner, &event_type);
        let replaced = self
            .inner
            .entries
            .borrow_mut()
            .insert(event_type.clone(), context.clone())
            .is_some();
        debug!(
            target: "events",
            event = %event_type,
            registered_as = %context.event_type(),
            replaced,
            "bound event"
        );
        context.apply();
        true
    }

    pub fn delete(&self, event_type: impl Into<EventKey>) -> bool {
        let event_type = event_type.into();
        let Some(context) = self.inner.entries.borrow().get(&event_type).cloned() else {
            return false;
        };
        context.remove(None);
        self.inner.entries.borrow_mut().remove(&event_type);
        debug!(target: "events", event = %event_type, "unbound event");
        true
    }

    pub fn contains(&self, event_type: impl Into<EventKey>) -> bool {
        self.inner.entries.borrow().contains_key(&event_type.into())
    }

    pub fn context(&self, event_type: impl Into<EventKey>) -> Option<EventContext> {
        self.inner.entries.borrow().get(&event_type.into()).cloned()
    }

    pub fn types(&self) -> Vec<EventKey> {
        self.inner.entries.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.borrow().is_empty()
    }

    pub fn ptr_eq(&self, other: &EventRegistry) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("owner", &self.inner.owner)
            .field("types", &self.types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::dom::{Document, ElementCreationOptions, Event, EventInit, Symbol};

    fn element(document: &Document, tag: &str) -> HtmlElement {
        document
            .create_element(tag, ElementCreationOptions::default())
            .expect("create element")
    }

    fn counting_listener() -> (Rc<Cell<usize>>, Listener) {
        let hits = Rc::new(Cell::new(0));
        let seen = Rc::clone(&hits);
        (hits, Listener::new(move |_| seen.set(seen.get() + 1)))
    }

    #[test]
    fn classify_follows_precedence() {
        let document = Document::new();
        let el = element(&document, "div");
        let listener = Listener::new(|_| {});

        let context = EventContext::new(&el, "a", listener.clone(), None);
        assert!(matches!(
            Binding::classify(&Value::from(context)),
            Some(Binding::Context(_))
        ));
        assert!(matches!(
            Binding::classify(&Value::from(&listener)),
            Some(Binding::Listener(_))
        ));
        assert!(matches!(
            Binding::classify(&Value::array([
                Value::from(&el),
                Value::from("a"),
                Value::from(&listener),
                Value::Bool(true),
            ])),
            Some(Binding::Params {
                options: Some(ListenerOptions::Capture(true)),
                ..
            })
        ));
        assert!(matches!(
            Binding::classify(&Value::object([
                ("onElement", Value::from(&el)),
                ("type", Value::from("a")),
                ("listener", Value::from(&listener)),
            ])),
            Some(Binding::Config { options: None, .. })
        ));
        assert!(Binding::classify(&Value::from("nope")).is_none());
        assert!(Binding::classify(&Value::Undefined).is_none());
    }

    #[test]
    fn symbol_keys_bind_and_dispatch() {
        let document = Document::new();
        let el = element(&document, "div");
        let registry = EventRegistry::new(&el);
        let ready = Symbol::new("ready");
        let (hits, listener) = counting_listener();

        assert!(registry.set(&ready, &listener));
        assert!(registry.contains(&ready));
        el.dispatch_event(&Event::new(&ready, EventInit::default()));
        assert_eq!(hits.get(), 1);

        let lookalike = Symbol::new("ready");
        assert!(registry.get(&lookalike).is_none());
    }

    #[test]
    fn boxed_number_type_in_params() {
        let document = Document::new();
        let el = element(&document, "div");
        let registry = EventRegistry::new(&el);
        let (hits, listener) = counting_listener();

        assert!(registry.set(
            "tick",
            Value::array([
                Value::from(&el),
                Value::NumberObject(42.0),
                Value::from(&listener),
            ])
        ));
        el.dispatch_event(&Event::new("42", EventInit::default()));
        assert_eq!(hits.get(), 1);
        assert_eq!(registry.context("tick").expect("context").event_type(), &EventKey::from("42"));
    }

    #[test]
    fn inspection_helpers() {
        let document = Document::new();
        let el = element(&document, "div");
        let registry = EventRegistry::new(&el);
        assert!(registry.is_empty());
        assert!(registry.owner().expect("owner").ptr_eq(&el));

        registry.set("a", Value::function(|_| {}));
        registry.set("b", Value::function(|_| {}));
        let mut types = registry.types();
        types.sort_by_key(|key| key.to_string());
        assert_eq!(types, vec![EventKey::from("a"), EventKey::from("b")]);
        assert_eq!(registry.len(), 2);
        assert!(registry.clone().ptr_eq(&registry));
    }

    #[test]
    fn registry_is_shared_by_every_handle_to_an_element() {
        let document = Document::new();
        let el = element(&document, "div");
        let registry = EventRegistry::for_element(&el);
        assert!(EventRegistry::for_element(&el.clone()).ptr_eq(&registry));
        assert!(!EventRegistry::for_element(&element(&document, "div")).ptr_eq(&registry));
        assert!(!EventRegistry::new(&el).ptr_eq(&registry));
    }

    #[test]
    fn delete_removes_capture_registration() {
        let document = Document::new();
        let el = element(&document, "div");
        let registry = EventRegistry::new(&el);
        let listener = Listener::new(|_| {});
        registry.bind(
            "focus",
            Binding::from_params(&el, "focus", listener, Some(true.into())),
        );
        assert_eq!(el.listener_count("focus"), 1);
        assert!(registry.delete("focus"));
        assert_eq!(el.listener_count("focus"), 0);
        assert!(!registry.delete("focus"));
    }
}
