//! Intents: what an input event means for the page
//!
//! The resolver translates each [`DomEvent`](crate::types::DomEvent) into an
//! ordered list of intents once; the update layer is the only place that
//! applies them.

use serde::Serialize;

use crate::dom::NodeId;
use crate::types::{DropdownId, ModalId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "intent", rename_all = "camelCase")]
pub enum Intent {
    Dropdown(DropdownIntent),
    Modal(ModalIntent),
    Navigation(NavigationIntent),
    /// Show the pane of this tab button
    ActivateTab { button: NodeId },
    /// Validate and submit a pipeline form
    SubmitForm { form: NodeId },
    SetValue { target: NodeId, value: String },
    SetChecked { target: NodeId, checked: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum DropdownIntent {
    Toggle { dropdown: DropdownId },
    Select { dropdown: DropdownId, index: usize },
    /// Click outside every dropdown
    CloseAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ModalIntent {
    Open { modal: ModalId, trigger: NodeId },
    Close { modal: ModalId },
    /// Escape: close whatever modal is visible
    CloseVisible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum NavigationIntent {
    Toggle,
    Close,
}

/// Resolver output for one event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub intents: Vec<Intent>,
    pub prevent_default: bool,
}

impl Resolution {
    pub(crate) fn push(&mut self, intent: Intent) {
        self.intents.push(intent);
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}
