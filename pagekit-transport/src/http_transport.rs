//! Multipart HTTP transport

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::Form;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, TransportError};
use crate::http_client;
use crate::traits::FormTransport;
use crate::types::{FormPayload, FormSubmission, SubmissionReply};
use crate::utils::log_sanitizer::mask_value;

const TRANSPORT_ID: &str = "http";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// HTTP transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpTransportConfig {
    /// Base URL that relative form actions are resolved against
    /// (the page URL in a browser).
    pub base_url: Option<String>,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// Optional `User-Agent` header.
    pub user_agent: Option<String>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

/// `FormTransport` backed by `reqwest`
///
/// Sends each submission as `multipart/form-data`, treats any non-2xx status
/// as a failure and parses the success body as JSON.
#[derive(Debug, Clone)]
pub struct HttpFormTransport {
    client: Client,
    base_url: Option<Url>,
}

impl HttpFormTransport {
    /// Build the transport and its HTTP client
    pub fn new(config: HttpTransportConfig) -> Result<Self> {
        let mut builder = Client::builder().timeout(Duration::from_secs(config.timeout_secs));
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        let client = builder.build().map_err(|e| TransportError::ClientInit {
            detail: e.to_string(),
        })?;

        let base_url = config
            .base_url
            .as_deref()
            .map(|raw| {
                Url::parse(raw).map_err(|e| TransportError::InvalidEndpoint {
                    endpoint: raw.to_string(),
                    detail: e.to_string(),
                })
            })
            .transpose()?;

        Ok(Self { client, base_url })
    }

    /// Resolve a form action into the absolute URL the browser would post to
    pub fn resolve_endpoint(&self, action: &str) -> Result<Url> {
        resolve_endpoint(self.base_url.as_ref(), action)
    }
}

pub(crate) fn resolve_endpoint(base: Option<&Url>, action: &str) -> Result<Url> {
    let invalid = |detail: String| TransportError::InvalidEndpoint {
        endpoint: action.to_string(),
        detail,
    };

    match Url::parse(action) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let Some(base) = base else {
                return Err(invalid("relative action without a base URL".to_string()));
            };
            // An empty action posts back to the page itself.
            base.join(action).map_err(|e| invalid(e.to_string()))
        }
        Err(e) => Err(invalid(e.to_string())),
    }
}

fn multipart_form(payload: &FormPayload) -> Form {
    payload.iter().fold(Form::new(), |form, field| {
        form.text(field.name.clone(), field.value.clone())
    })
}

#[async_trait]
impl FormTransport for HttpFormTransport {
    fn id(&self) -> &'static str {
        TRANSPORT_ID
    }

    async fn submit(&self, submission: &FormSubmission) -> Result<SubmissionReply> {
        let endpoint = self.resolve_endpoint(&submission.action)?;
        let endpoint_str = endpoint.as_str().to_string();

        log::info!(
            "[{TRANSPORT_ID}] Submission {} -> {endpoint_str} ({} fields)",
            submission.id,
            submission.payload.len()
        );
        for field in &submission.payload {
            log::debug!("[{TRANSPORT_ID}] {}: {}", field.name, mask_value(&field.value));
        }

        let request = self
            .client
            .post(endpoint)
            .multipart(multipart_form(&submission.payload));

        let body = http_client::send(request, &endpoint_str)
            .await?
            .into_success(&endpoint_str)?;
        http_client::parse_reply(&body, &endpoint_str)
    }
}
