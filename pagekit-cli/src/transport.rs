//! Offline transport for dry runs

use async_trait::async_trait;
use pagekit_transport::{FormSubmission, FormTransport, SubmissionReply, TransportError};
use serde_json::Value;

/// Answers every submission with the same canned reply
pub struct CannedTransport {
    reply: Value,
    status: Option<u16>,
}

impl CannedTransport {
    /// Succeeds with `reply`
    pub fn replying(reply: Value) -> Self {
        Self { reply, status: None }
    }

    /// Fails as if the endpoint answered `status`
    pub fn failing(status: u16) -> Self {
        Self {
            reply: Value::Null,
            status: Some(status),
        }
    }
}

#[async_trait]
impl FormTransport for CannedTransport {
    fn id(&self) -> &'static str {
        "canned"
    }

    async fn submit(&self, submission: &FormSubmission) -> pagekit_transport::Result<SubmissionReply> {
        tracing::debug!("[canned] {} -> {}", submission.id, submission.action);
        match self.status {
            Some(status) => Err(TransportError::HttpStatus {
                endpoint: submission.action.clone(),
                status,
                body: None,
            }),
            None => Ok(SubmissionReply::from_value(self.reply.clone())),
        }
    }
}
