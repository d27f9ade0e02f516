//! Host collaborator trait definitions

mod browser_host;
mod form_validator;

pub use browser_host::{BrowserHost, NoopHost};
pub use form_validator::FormValidator;

// Re-export transport 库的 trait
pub use pagekit_transport::FormTransport;
