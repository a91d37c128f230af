use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use kuchiki::{ElementData, Node, NodeRef};
use tracing::trace;

use super::document::{is_valid_name, Document, HTML_NAMESPACE};
use super::error::DomError;
use super::event::{Event, EventKey, EventPhase};
use super::listeners::{self, Listener, ListenerOptions};
use super::style;

/// Handle to one element node. Clones share the node.
#[derive(Clone)]
pub struct HtmlElement {
    node: NodeRef,
}

/// Non-owning reference to an element.
#[derive(Clone)]
pub struct WeakElement(Weak<Node>);

impl WeakElement {
    pub fn upgrade(&self) -> Option<HtmlElement> {
        self.0
            .upgrade()
            .map(|node| HtmlElement::from_element_node(NodeRef(node)))
    }
}

impl fmt::Debug for WeakElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(element) => write!(f, "WeakElement({element:?})"),
            None => f.write_str("WeakElement(<dropped>)"),
        }
    }
}

impl HtmlElement {
    pub(crate) fn from_node(node: NodeRef) -> Option<Self> {
        node.as_element()?;
        Some(Self { node })
    }

    /// Callers guarantee `node` is an element node.
    pub(crate) fn from_element_node(node: NodeRef) -> Self {
        debug_assert!(node.as_element().is_some());
        Self { node }
    }

    pub(crate) fn node(&self) -> &NodeRef {
        &self.node
    }

    fn data(&self) -> &ElementData {
        match self.node.as_element() {
            Some(data) => data,
            None => unreachable!("HtmlElement always wraps an element node"),
        }
    }

    pub fn downgrade(&self) -> WeakElement {
        WeakElement(Rc::downgrade(&self.node.0))
    }

    pub fn ptr_eq(&self, other: &HtmlElement) -> bool {
        Rc::ptr_eq(&self.node.0, &other.node.0)
    }

    pub fn local_name(&self) -> String {
        self.data().name.local.to_string()
    }

    pub fn tag_name(&self) -> String {
        let name = &self.data().name;
        if &*name.ns == HTML_NAMESPACE {
            name.local.to_ascii_uppercase().to_string()
        } else {
            name.local.to_string()
        }
    }

    pub fn is_value(&self) -> Option<String> {
        self.get_attribute("is")
    }

    pub fn id(&self) -> String {
        self.get_attribute("id").unwrap_or_default()
    }

    pub fn class_name(&self) -> String {
        self.get_attribute("class").unwrap_or_default()
    }

    pub fn owner_document(&self) -> Option<Document> {
        listeners::owner(&self.node).map(Document::from_inner)
    }

    pub fn is_connected(&self) -> bool {
        self.node
            .ancestors()
            .any(|ancestor| ancestor.as_document().is_some())
    }

    // Attributes

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.data()
            .attributes
            .borrow()
            .get(name.to_ascii_lowercase())
            .map(str::to_string)
    }

    pub fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomError> {
        if !is_valid_name(name) {
            return Err(DomError::InvalidCharacter(name.to_string()));
        }
        self.data()
            .attributes
            .borrow_mut()
            .insert(name.to_ascii_lowercase(), value.to_string());
        Ok(())
    }

    pub fn remove_attribute(&self, name: &str) -> bool {
        self.data()
            .attributes
            .borrow_mut()
            .remove(name.to_ascii_lowercase())
            .is_some()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.data()
            .attributes
            .borrow()
            .contains(name.to_ascii_lowercase())
    }

    pub fn attributes(&self) -> BTreeMap<String, String> {
        self.data()
            .attributes
            .borrow()
            .map
            .iter()
            .map(|(name, attribute)| (name.local.to_string(), attribute.value.clone()))
            .collect()
    }

    // Inline style

    pub fn style(&self) -> Vec<(String, String)> {
        style::parse(&self.get_attribute("style").unwrap_or_default())
    }

    pub fn style_property(&self, name: &str) -> Option<String> {
        let name = style::property_name(name);
        self.style()
            .into_iter()
            .find(|(property, _)| *property == name)
            .map(|(_, value)| value)
    }

    /// Setting an empty value removes the declaration.
    pub fn set_style_property(&self, name: &str, value: &str) {
        let name = style::property_name(name);
        let value = value.trim();
        let mut declarations = self.style();
        match declarations.iter().position(|(property, _)| *property == name) {
            Some(index) if value.is_empty() => {
                declarations.remove(index);
            }
            Some(index) => declarations[index].1 = value.to_string(),
            None if value.is_empty() => return,
            None => declarations.push((name, value.to_string())),
        }
        self.write_style(&declarations);
    }

    pub fn remove_style_property(&self, name: &str) -> Option<String> {
        let name = style::property_name(name);
        let mut declarations = self.style();
        let index = declarations
            .iter()
            .position(|(property, _)| *property == name)?;
        let (_, value) = declarations.remove(index);
        self.write_style(&declarations);
        Some(value)
    }

    fn write_style(&self, declarations: &[(String, String)]) {
        let mut attributes = self.data().attributes.borrow_mut();
        if declarations.is_empty() {
            attributes.remove("style");
        } else {
            attributes.insert("style", style::serialize(declarations));
        }
    }

    // Body

    pub fn text_content(&self) -> String {
        self.node.text_contents()
    }

    /// Replaces every child with a single text node holding `text`.
    pub fn set_text_content(&self, text: &str) {
        for child in self.node.children().collect::<Vec<_>>() {
            child.detach();
        }
        if !text.is_empty() {
            self.node.append(NodeRef::new_text(text));
        }
    }

    pub fn inner_html(&self) -> String {
        self.node
            .children()
            .map(|child| child.to_string())
            .collect()
    }

    pub fn outer_html(&self) -> String {
        self.node.to_string()
    }

    // Tree

    pub fn append_child(&self, child: &HtmlElement) -> Result<(), DomError> {
        if child.ptr_eq(self)
            || self
                .node
                .ancestors()
                .any(|ancestor| Rc::ptr_eq(&ancestor.0, &child.node.0))
        {
            return Err(DomError::HierarchyRequest);
        }
        self.node.append(child.node.clone());
        Ok(())
    }

    pub fn children(&self) -> Vec<HtmlElement> {
        self.node.children().filter_map(HtmlElement::from_node).collect()
    }

    pub fn parent_element(&self) -> Option<HtmlElement> {
        self.node.parent().and_then(HtmlElement::from_node)
    }

    // Events

    pub fn add_event_listener(
        &self,
        event_type: impl Into<EventKey>,
        listener: &Listener,
        options: Option<ListenerOptions>,
    ) {
        let event_type = event_type.into();
        let added = listeners::add(&self.node, &event_type, listener, options);
        trace!(target: "dom", event = %event_type, added, "addEventListener");
    }

    pub fn remove_event_listener(
        &self,
        event_type: impl Into<EventKey>,
        listener: &Listener,
        options: Option<ListenerOptions>,
    ) {
        let event_type = event_type.into();
        let removed = listeners::remove(&self.node, &event_type, listener, options);
        trace!(target: "dom", event = %event_type, removed, "removeEventListener");
    }

    /// State attached to this element node rather than to a handle. Every
    /// handle to the same node sees the same value.
    pub(crate) fn extension<T: Clone + 'static>(&self, init: impl FnOnce() -> T) -> T {
        listeners::extension(&self.node, init)
    }

    pub fn listener_count(&self, event_type: impl Into<EventKey>) -> usize {
        listeners::count(&self.node, &event_type.into())
    }

    /// Runs the capture, target and bubble phases for `event` with this
    /// element as target. Returns `false` if a listener cancelled it.
    pub fn dispatch_event(&self, event: &Event) -> bool {
        event.begin_dispatch(self);
        let path: Vec<HtmlElement> = self
            .node
            .ancestors()
            .filter_map(HtmlElement::from_node)
            .collect();
        trace!(
            target: "dom",
            event = %event.event_type(),
            depth = path.len(),
            "dispatching event"
        );

        event.set_phase(EventPhase::Capturing);
        for node in path.iter().rev() {
            if event.propagation_stopped() {
                break;
            }
            invoke_listeners(node, event, true);
        }

        if !event.propagation_stopped() {
            event.set_phase(EventPhase::AtTarget);
            invoke_listeners(self, event, true);
            if !event.propagation_stopped() {
                invoke_listeners(self, event, false);
            }
        }

        if event.bubbles() {
            event.set_phase(EventPhase::Bubbling);
            for node in &path {
                if event.propagation_stopped() {
                    break;
                }
                invoke_listeners(node, event, false);
            }
        }

        event.finish_dispatch();
        !event.default_prevented()
    }
}

fn invoke_listeners(node: &HtmlElement, event: &Event, capture: bool) {
    let entries = listeners::snapshot(&node.node, event.event_type(), capture);
    if entries.is_empty() {
        return;
    }

    event.set_current_target(node);
    for entry in entries {
        if entry.is_removed() {
            continue;
        }
        if entry.once {
            listeners::remove_entry(&node.node, event.event_type(), &entry);
        }
        event.set_in_passive_listener(entry.passive);
        entry.listener.call(event);
        event.set_in_passive_listener(false);
        if event.immediate_propagation_stopped() {
            break;
        }
    }
}

impl PartialEq for HtmlElement {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for HtmlElement {}

impl fmt::Debug for HtmlElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HtmlElement(<{}>)", self.local_name())
    }
}
