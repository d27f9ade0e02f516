//! Single delegated listener: every page event is resolved here once

mod intent;
mod resolver;

pub use intent::{DropdownIntent, Intent, ModalIntent, NavigationIntent, Resolution};
pub use resolver::resolve;
