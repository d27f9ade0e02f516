use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for form submission round trips.
///
/// Each variant names the `endpoint` it was talking to. All variants are
/// serializable so hosts can forward them as structured events.
///
/// # Taxonomy
///
/// - [`NetworkError`](Self::NetworkError), [`Timeout`](Self::Timeout) and
///   [`HttpStatus`](Self::HttpStatus) are transport failures: the endpoint was not
///   reached or refused the submission.
/// - [`ParseError`](Self::ParseError) is a response failure: the endpoint accepted
///   the submission but answered with a body that is not structured data.
///
/// None of them are retried; the page shows its error panel and the visitor
/// decides whether to submit again.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum TransportError {
    /// The form action could not be turned into an absolute URL.
    #[error("[{endpoint}] Invalid endpoint: {detail}")]
    InvalidEndpoint {
        /// Raw form action.
        endpoint: String,
        /// Why it was rejected.
        detail: String,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client initialization failed: {detail}")]
    ClientInit {
        /// Error details.
        detail: String,
    },

    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    #[error("[{endpoint}] Network error: {detail}")]
    NetworkError {
        /// Endpoint the submission was sent to.
        endpoint: String,
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    #[error("[{endpoint}] Timeout: {detail}")]
    Timeout {
        /// Endpoint the submission was sent to.
        endpoint: String,
        /// Error details.
        detail: String,
    },

    /// The endpoint answered with a non-success status.
    #[error("[{endpoint}] HTTP error: {status}")]
    HttpStatus {
        /// Endpoint the submission was sent to.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Response body, truncated for logging.
        body: Option<String>,
    },

    /// The success body could not be parsed as JSON.
    #[error("[{endpoint}] Parse error: {detail}")]
    ParseError {
        /// Endpoint the submission was sent to.
        endpoint: String,
        /// Details about the parse failure.
        detail: String,
    },
}

impl TransportError {
    /// 是否为预期行为（表单配置错误、服务端拒绝等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::HttpStatus { status, .. } => (400..500).contains(status),
            Self::InvalidEndpoint { .. } => true,
            _ => false,
        }
    }

    /// Whether the failure happened after the endpoint accepted the submission.
    #[must_use]
    pub fn is_response_failure(&self) -> bool {
        matches!(self, Self::ParseError { .. })
    }

    /// HTTP status code, when the endpoint answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Transport Result type alias
pub type Result<T> = std::result::Result<T, TransportError>;
