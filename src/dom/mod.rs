//! In-memory host document used by the element factory and the event layer.
//!
//! The tree itself is a `kuchiki` node graph. Listener registration, owner
//! tracking and event dispatch live beside the tree in a per-thread record
//! table keyed by node identity, mirroring how an `EventTarget` keeps its
//! listener buckets outside the markup.

mod document;
mod element;
mod error;
mod event;
mod listeners;
mod style;

pub use document::{is_valid_custom_element_name, Document, ElementCreationOptions};
pub use element::{HtmlElement, WeakElement};
pub use error::DomError;
pub use event::{Event, EventInit, EventKey, EventPhase, Symbol};
pub use listeners::{AddEventListenerOptions, Listener, ListenerOptions};
