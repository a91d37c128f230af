use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use kuchiki::{Node, NodeRef};

use super::document::DocumentInner;
use super::event::{Event, EventKey};

/// A shared callback. Identity, not behaviour, decides equality, so the
/// same `Listener` can be added and later removed.
#[derive(Clone)]
pub struct Listener(Rc<dyn Fn(&Event)>);

impl Listener {
    pub fn new(callback: impl Fn(&Event) + 'static) -> Self {
        Self(Rc::new(callback))
    }

    pub fn call(&self, event: &Event) {
        (self.0)(event)
    }

    pub fn ptr_eq(&self, other: &Listener) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddEventListenerOptions {
    pub capture: bool,
    pub once: bool,
    pub passive: bool,
}

/// Third argument of the native add/remove calls: a bare capture flag or a
/// full options record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerOptions {
    Capture(bool),
    Options(AddEventListenerOptions),
}

impl ListenerOptions {
    pub fn capture(&self) -> bool {
        match self {
            ListenerOptions::Capture(capture) => *capture,
            ListenerOptions::Options(options) => options.capture,
        }
    }

    pub fn once(&self) -> bool {
        matches!(self, ListenerOptions::Options(options) if options.once)
    }

    pub fn passive(&self) -> bool {
        matches!(self, ListenerOptions::Options(options) if options.passive)
    }
}

impl From<bool> for ListenerOptions {
    fn from(value: bool) -> Self {
        ListenerOptions::Capture(value)
    }
}

impl From<AddEventListenerOptions> for ListenerOptions {
    fn from(value: AddEventListenerOptions) -> Self {
        ListenerOptions::Options(value)
    }
}

#[derive(Clone)]
pub(crate) struct ListenerEntry {
    pub(crate) listener: Listener,
    pub(crate) capture: bool,
    pub(crate) once: bool,
    pub(crate) passive: bool,
    removed: Rc<Cell<bool>>,
}

impl ListenerEntry {
    pub(crate) fn is_removed(&self) -> bool {
        self.removed.get()
    }

    fn matches(&self, listener: &Listener, capture: bool) -> bool {
        self.capture == capture && self.listener.ptr_eq(listener)
    }
}

struct NodeRecord {
    node: Weak<Node>,
    owner: Option<Weak<DocumentInner>>,
    listeners: HashMap<EventKey, Vec<ListenerEntry>>,
    /// Per-element state owned by higher layers, dropped with the record.
    extension: Option<Box<dyn Any>>,
}

impl NodeRecord {
    fn new(node: &NodeRef) -> Self {
        Self {
            node: Rc::downgrade(&node.0),
            owner: None,
            listeners: HashMap::new(),
            extension: None,
        }
    }

    fn is_for(&self, node: &NodeRef) -> bool {
        self.node
            .upgrade()
            .map(|live| Rc::ptr_eq(&live, &node.0))
            .unwrap_or(false)
    }
}

const PRUNE_INTERVAL: usize = 256;

thread_local! {
    static RECORDS: RefCell<HashMap<usize, NodeRecord>> = RefCell::new(HashMap::new());
}

fn node_key(node: &NodeRef) -> usize {
    Rc::as_ptr(&node.0) as usize
}

fn with_record<T>(node: &NodeRef, f: impl FnOnce(&mut NodeRecord) -> T) -> T {
    RECORDS.with(|records| {
        let mut records = records.borrow_mut();
        let key = node_key(node);
        // A dead record at this address belonged to a freed node.
        if records.get(&key).is_some_and(|record| !record.is_for(node)) {
            records.remove(&key);
        }
        if !records.contains_key(&key)
            && records.len() >= PRUNE_INTERVAL
            && records.len() % PRUNE_INTERVAL == 0
        {
            records.retain(|_, record| record.node.strong_count() > 0);
        }
        let record = records
            .entry(key)
            .or_insert_with(|| NodeRecord::new(node));
        f(record)
    })
}

fn peek_record<T>(node: &NodeRef, f: impl FnOnce(&NodeRecord) -> T) -> Option<T> {
    RECORDS.with(|records| {
        let records = records.borrow();
        records
            .get(&node_key(node))
            .filter(|record| record.is_for(node))
            .map(f)
    })
}

pub(crate) fn set_owner(node: &NodeRef, owner: &Rc<DocumentInner>) {
    with_record(node, |record| record.owner = Some(Rc::downgrade(owner)));
}

pub(crate) fn owner(node: &NodeRef) -> Option<Rc<DocumentInner>> {
    peek_record(node, |record| record.owner.as_ref().and_then(Weak::upgrade)).flatten()
}

/// Returns the value attached to `node`, attaching `init()` on first use.
/// `init` runs outside the record table so it may touch other nodes.
pub(crate) fn extension<T: Clone + 'static>(node: &NodeRef, init: impl FnOnce() -> T) -> T {
    let existing = peek_record(node, |record| {
        record
            .extension
            .as_deref()
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    })
    .flatten();
    if let Some(value) = existing {
        return value;
    }

    let value = init();
    with_record(node, |record| {
        if let Some(current) = record
            .extension
            .as_deref()
            .and_then(|current| current.downcast_ref::<T>())
        {
            return current.clone();
        }
        record.extension = Some(Box::new(value.clone()));
        value
    })
}

/// Returns `false` when the (listener, capture) pair is already registered.
pub(crate) fn add(
    node: &NodeRef,
    event_type: &EventKey,
    listener: &Listener,
    options: Option<ListenerOptions>,
) -> bool {
    let capture = options.map(|options| options.capture()).unwrap_or(false);
    with_record(node, |record| {
        let bucket = record.listeners.entry(event_type.clone()).or_default();
        if bucket.iter().any(|entry| entry.matches(listener, capture)) {
            return false;
        }
        bucket.push(ListenerEntry {
            listener: listener.clone(),
            capture,
            once: options.map(|options| options.once()).unwrap_or(false),
            passive: options.map(|options| options.passive()).unwrap_or(false),
            removed: Rc::new(Cell::new(false)),
        });
        true
    })
}

pub(crate) fn remove(
    node: &NodeRef,
    event_type: &EventKey,
    listener: &Listener,
    options: Option<ListenerOptions>,
) -> bool {
    let capture = options.map(|options| options.capture()).unwrap_or(false);
    with_record(node, |record| {
        let Some(bucket) = record.listeners.get_mut(event_type) else {
            return false;
        };
        let Some(position) = bucket
            .iter()
            .position(|entry| entry.matches(listener, capture))
        else {
            return false;
        };
        let entry = bucket.remove(position);
        entry.removed.set(true);
        if bucket.is_empty() {
            record.listeners.remove(event_type);
        }
        true
    })
}

pub(crate) fn remove_entry(node: &NodeRef, event_type: &EventKey, entry: &ListenerEntry) {
    remove(
        node,
        event_type,
        &entry.listener,
        Some(ListenerOptions::Capture(entry.capture)),
    );
}

/// Copies the live entries for one phase so callbacks may add or remove
/// listeners while the copy is being walked.
pub(crate) fn snapshot(node: &NodeRef, event_type: &EventKey, capture: bool) -> Vec<ListenerEntry> {
    peek_record(node, |record| {
        record
            .listeners
            .get(event_type)
            .map(|bucket| {
                bucket
                    .iter()
                    .filter(|entry| entry.capture == capture)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    })
    .unwrap_or_default()
}

pub(crate) fn count(node: &NodeRef, event_type: &EventKey) -> usize {
    peek_record(node, |record| {
        record
            .listeners
            .get(event_type)
            .map(Vec::len)
            .unwrap_or(0)
    })
    .unwrap_or(0)
}
