//! Results handed back to the host

use serde::Serialize;

use pagekit_transport::{FormSubmission, TransportError};

use crate::widgets::ModalState;

/// What the host must do after [`Page::handle`](crate::Page::handle)
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    /// The browser default action must be suppressed
    pub default_prevented: bool,
    /// A submission passed the gate and must be sent through a transport
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission: Option<FormSubmission>,
    /// Fields that failed validation on a blocked submit
    pub invalid_fields: usize,
}

/// How a submission round trip ended
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum SubmissionOutcome {
    /// Reply accepted, form reset
    #[serde(rename_all = "camelCase")]
    Success {
        modal: String,
        /// Navigation scheduled after the feedback delay
        #[serde(skip_serializing_if = "Option::is_none")]
        redirect: Option<String>,
    },
    /// Transport or response failure, visitor alerted
    #[serde(rename_all = "camelCase")]
    Failure { modal: String, error: TransportError },
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Observable page state, for logs and reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    pub modals: Vec<ModalSnapshot>,
    pub nav_open: bool,
    pub scroll_locked: bool,
    pub overlays: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_dropdown: Option<usize>,
    pub pending_timers: usize,
    pub now_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalSnapshot {
    pub name: String,
    pub state: ModalState,
}
