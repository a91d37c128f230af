use std::cell::{Cell, RefCell};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value as JsonValue;

use super::element::HtmlElement;

static NEXT_SYMBOL_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique event-type key. Two symbols are equal only if one is a
/// clone of the other, whatever their descriptions say.
#[derive(Clone)]
pub struct Symbol {
    id: u64,
    description: Option<Rc<str>>,
}

impl Symbol {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
            description: Some(Rc::from(description.into())),
        }
    }

    pub fn anonymous() -> Self {
        Self {
            id: NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
            description: None,
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description().unwrap_or(""))
    }
}

/// The key an event listener is registered under.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKey {
    Name(String),
    Symbol(Symbol),
}

impl EventKey {
    pub fn as_name(&self) -> Option<&str> {
        match self {
            EventKey::Name(name) => Some(name),
            EventKey::Symbol(_) => None,
        }
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKey::Name(name) => f.write_str(name),
            EventKey::Symbol(symbol) => write!(f, "{symbol}"),
        }
    }
}

impl From<&str> for EventKey {
    fn from(value: &str) -> Self {
        EventKey::Name(value.to_string())
    }
}

impl From<String> for EventKey {
    fn from(value: String) -> Self {
        EventKey::Name(value)
    }
}

impl From<&String> for EventKey {
    fn from(value: &String) -> Self {
        EventKey::Name(value.clone())
    }
}

impl From<Symbol> for EventKey {
    fn from(value: Symbol) -> Self {
        EventKey::Symbol(value)
    }
}

impl From<&Symbol> for EventKey {
    fn from(value: &Symbol) -> Self {
        EventKey::Symbol(value.clone())
    }
}

impl From<&EventKey> for EventKey {
    fn from(value: &EventKey) -> Self {
        value.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPhase {
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventInit {
    pub bubbles: bool,
    pub cancelable: bool,
    pub detail: JsonValue,
}

impl EventInit {
    /// Init used for events synthesised by an event context: cancelable,
    /// non-bubbling, carrying `detail`.
    pub fn custom(detail: JsonValue) -> Self {
        Self {
            bubbles: false,
            cancelable: true,
            detail,
        }
    }

    pub fn bubbling(mut self) -> Self {
        self.bubbles = true;
        self
    }
}

pub struct Event {
    event_type: EventKey,
    init: EventInit,
    target: RefCell<Option<HtmlElement>>,
    current_target: RefCell<Option<HtmlElement>>,
    phase: Cell<EventPhase>,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
    immediate_propagation_stopped: Cell<bool>,
    in_passive_listener: Cell<bool>,
}

impl Event {
    pub fn new(event_type: impl Into<EventKey>, init: EventInit) -> Self {
        Self {
            event_type: event_type.into(),
            init,
            target: RefCell::new(None),
            current_target: RefCell::new(None),
            phase: Cell::new(EventPhase::None),
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
            immediate_propagation_stopped: Cell::new(false),
            in_passive_listener: Cell::new(false),
        }
    }

    pub fn custom(event_type: impl Into<EventKey>, detail: JsonValue) -> Self {
        Self::new(event_type, EventInit::custom(detail))
    }

    pub fn event_type(&self) -> &EventKey {
        &self.event_type
    }

    pub fn detail(&self) -> &JsonValue {
        &self.init.detail
    }

    pub fn bubbles(&self) -> bool {
        self.init.bubbles
    }

    pub fn cancelable(&self) -> bool {
        self.init.cancelable
    }

    pub fn target(&self) -> Option<HtmlElement> {
        self.target.borrow().clone()
    }

    pub fn current_target(&self) -> Option<HtmlElement> {
        self.current_target.borrow().clone()
    }

    pub fn event_phase(&self) -> EventPhase {
        self.phase.get()
    }

    /// Has no effect on non-cancelable events or inside passive listeners.
    pub fn prevent_default(&self) {
        if self.init.cancelable && !self.in_passive_listener.get() {
            self.default_prevented.set(true);
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn stop_immediate_propagation(&self) {
        self.propagation_stopped.set(true);
        self.immediate_propagation_stopped.set(true);
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    pub(crate) fn immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped.get()
    }

    pub(crate) fn begin_dispatch(&self, target: &HtmlElement) {
        *self.target.borrow_mut() = Some(target.clone());
        self.propagation_stopped.set(false);
        self.immediate_propagation_stopped.set(false);
    }

    pub(crate) fn finish_dispatch(&self) {
        *self.current_target.borrow_mut() = None;
        self.phase.set(EventPhase::None);
    }

    pub(crate) fn set_phase(&self, phase: EventPhase) {
        self.phase.set(phase);
    }

    pub(crate) fn set_current_target(&self, node: &HtmlElement) {
        *self.current_target.borrow_mut() = Some(node.clone());
    }

    pub(crate) fn set_in_passive_listener(&self, passive: bool) {
        self.in_passive_listener.set(passive);
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("type", &self.event_type)
            .field("phase", &self.phase.get())
            .field("bubbles", &self.init.bubbles)
            .field("cancelable", &self.init.cancelable)
            .field("default_prevented", &self.default_prevented.get())
            .finish()
    }
}
