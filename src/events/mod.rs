mod context;
mod registry;

pub use context::{EventContext, EVENT_CONTEXT_TAG};
pub use registry::{Binding, EventRegistry};
