//! # pagekit-transport
//!
//! Network side of the pagekit form pipeline: a modal form is serialized into a
//! [`FormSubmission`] and handed to a [`FormTransport`], which performs the
//! round trip and returns the parsed [`SubmissionReply`].
//!
//! ## Feature Flags
//!
//! - **`rustls`** *(default)*: use rustls for HTTPS.
//! - **`native-tls`**: use the platform's native TLS implementation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pagekit_transport::{
//!     FormPayload, FormSubmission, FormTransport, HttpFormTransport, HttpTransportConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = HttpFormTransport::new(HttpTransportConfig::default())?;
//!
//!     let mut payload = FormPayload::new();
//!     payload.push("name", "Ada");
//!     payload.push("email", "ada@example.com");
//!
//!     let submission = FormSubmission::new("https://example.com/ajax/form.php", payload);
//!     let reply = transport.submit(&submission).await?;
//!     if let Some(link) = reply.redirect_for("ticket") {
//!         println!("redirect to {link}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every failure is a [`TransportError`]:
//!
//! - [`TransportError::NetworkError`] / [`TransportError::Timeout`]: the endpoint was not reached
//! - [`TransportError::HttpStatus`]: the endpoint answered with a non-2xx status
//! - [`TransportError::ParseError`]: a 2xx body that is not JSON
//!
//! Submissions are never retried automatically; the visitor re-submits.

mod error;
mod http_client;
mod http_transport;
mod traits;
mod types;
mod utils;

pub use error::{Result, TransportError};
pub use http_transport::{HttpFormTransport, HttpTransportConfig};
pub use traits::FormTransport;
pub use types::{FormField, FormPayload, FormSubmission, SubmissionReply};

pub use utils::log_sanitizer;
