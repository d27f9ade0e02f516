//! Input events fed to a page by its host

use serde::{Deserialize, Serialize};

use crate::dom::NodeId;

/// Keyboard key, as reported in `KeyboardEvent.key`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Other(String),
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Self::Escape,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        match key {
            Key::Escape => "Escape".into(),
            Key::Enter => "Enter".into(),
            Key::Tab => "Tab".into(),
            Key::Other(name) => name,
        }
    }
}

/// Event delivered to the page's single delegated listener
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DomEvent {
    Click { target: NodeId },
    KeyDown { key: Key },
    Submit { form: NodeId },
    /// Text typed into a control
    Input { target: NodeId, value: String },
    /// Checkbox or radio toggled
    Check { target: NodeId, checked: bool },
}

impl DomEvent {
    /// Element the event is addressed to; `None` for keyboard events
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Self::Click { target } | Self::Input { target, .. } | Self::Check { target, .. } => Some(*target),
            Self::Submit { form } => Some(*form),
            Self::KeyDown { .. } => None,
        }
    }
}

/// `change` notification raised on a native select after a dropdown pick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub source: NodeId,
    pub value: String,
}
