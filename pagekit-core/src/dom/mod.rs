//! In-memory document model

mod document;
mod selector;
mod spec;

pub use document::{Document, NodeId};
pub use selector::Selector;
pub use spec::NodeSpec;
