use async_trait::async_trait;

use crate::error::Result;
use crate::types::{FormSubmission, SubmissionReply};

/// Form submission transport Trait
///
/// Implementations:
/// - [`HttpFormTransport`](crate::HttpFormTransport): multipart `POST` over HTTP(S)
/// - test doubles in downstream crates
#[async_trait]
pub trait FormTransport: Send + Sync {
    /// Transport identifier (used in logs)
    fn id(&self) -> &'static str;

    /// Send one submission and parse the success body.
    ///
    /// # Arguments
    /// * `submission` - action URL and serialized fields
    ///
    /// # Errors
    /// Any non-2xx status, network failure or malformed body.
    async fn submit(&self, submission: &FormSubmission) -> Result<SubmissionReply>;
}
