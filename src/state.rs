mod bindings;
mod document;
mod store;
mod targets;
mod tasks;

pub use bindings::{resource_types, Binding};
pub use document::StateDocument;
pub use store::PersistedState;
pub use targets::StackTarget;
pub use tasks::TrackedTask;
