//! Page widgets
//!
//! Each widget owns the nodes it created and mutates the document the same
//! way the stylesheet expects; none of them listens for events directly.

mod dropdown;
mod modal;
mod nav_shell;
mod overlay;
mod tabs;

pub use dropdown::{Dropdown, DropdownHit, DropdownRegistry, SelectOption};
pub use modal::{CloseHook, FeedbackKind, ModalController, ModalState, OpenHook};
pub use nav_shell::NavigationShell;
pub use overlay::{Overlay, OverlayOwner, ScrollLock};
pub use tabs::Tabs;
