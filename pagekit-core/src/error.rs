//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use pagekit_transport::TransportError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Selector text outside the supported subset
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// A required node is missing from the document
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// No modal registered under this name
    #[error("Modal not found: {0}")]
    ModalNotFound(String),

    /// A single-select control without options cannot be replaced
    #[error("Select has no options: {0}")]
    EmptySelect(String),

    /// The most recent validation pass did not succeed
    #[error("Validation failed: {0} field(s) invalid")]
    ValidationFailed(usize),

    /// Completion reported for a submission the page never started
    #[error("Unknown submission: {0}")]
    UnknownSubmission(String),

    /// Configuration error
    #[error("Config error: {0}")]
    ConfigError(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Transport error (converting from library)
    #[error("{0}")]
    Transport(#[from] TransportError),
}

impl CoreError {
    /// Whether it is expected behavior (visitor input, missing optional markup, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::ValidationFailed(_) | Self::ElementNotFound(_) | Self::EmptySelect(_) => true,
            Self::Transport(e) => e.is_expected(),
            _ => false,
        }
    }

    /// Whether the visitor gets a blocking alert for this failure.
    ///
    /// Validation failures are shown inline by the validator; only round-trip
    /// failures (transport or response) are alerted.
    #[must_use]
    pub fn raises_alert(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::SerializationError(e.to_string())
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
