//! Declarative element construction with a per-element event namespace.
//!
//! ```no_run
//! use elemental::{Tags, Value};
//!
//! let tags = Tags::default();
//! let button = tags.button("Save").expect("create button");
//! button.event().set("click", Value::function(|_| println!("saved")));
//! ```

pub mod config;
pub mod dom;
pub mod events;
pub mod facade;
pub mod factory;
pub mod guards;
pub mod logging;
pub mod prototype;
pub mod value;

pub use config::Config;
pub use dom::{Document, DomError, Event, EventInit, EventKey, HtmlElement, Listener, Symbol};
pub use events::{Binding, EventContext, EventRegistry};
pub use facade::Tags;
pub use factory::{Content, Element, ElementFactory, ElementOptions};
pub use prototype::{EventTarget, Evented, PropertyAccess};
pub use value::Value;
