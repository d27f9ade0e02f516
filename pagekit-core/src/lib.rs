//! pagekit Core Library
//!
//! Headless interaction layer of a marketing landing page:
//! - Modal dialogs with backdrop, scroll lock and timed feedback panels
//! - Styled dropdowns replacing native selects
//! - Burger navigation and tab switching
//! - Validated, asynchronous form submission with optional redirect
//!
//! The page is an in-memory [`Document`]; widgets mutate it the way the
//! stylesheet expects. A host (browser shim, test harness, CLI) feeds it
//! [`DomEvent`]s, drives its virtual clock and performs the network round
//! trip through a [`FormTransport`].
//!
//! ```no_run
//! use pagekit_core::{DomEvent, Document, NodeSpec, NoopHost, Page, PageConfig};
//!
//! # fn main() -> pagekit_core::CoreResult<()> {
//! let markup: NodeSpec = serde_json::from_str(r#"{"tag": "body"}"#)?;
//! let mut page = Page::mount(Document::from_spec(&markup), PageConfig::default())?;
//! if let Some(trigger) = page.query(".register__open")? {
//!     page.handle(DomEvent::Click { target: trigger });
//! }
//! page.advance(std::time::Duration::from_secs(3), &mut NoopHost);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatch;
pub mod dom;
pub mod error;
pub mod page;
pub mod scheduler;
pub mod services;
pub mod traits;
pub mod types;
mod update;
pub mod widgets;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use config::{ClassNames, Messages, ModalConfig, PageConfig};
pub use dom::{Document, NodeId, NodeSpec, Selector};
pub use error::{CoreError, CoreResult};
pub use page::Page;
pub use traits::{BrowserHost, FormTransport, FormValidator, NoopHost};
pub use types::{DomEvent, EventResponse, Key, PageSnapshot, SubmissionOutcome};
pub use widgets::{FeedbackKind, ModalState};
