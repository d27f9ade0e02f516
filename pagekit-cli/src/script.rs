//! Scripted visitor session
//!
//! A script is a JSON array of steps; element steps address their target by
//! selector and resolve against the live document when they run.

use std::path::Path;

use anyhow::{Context, Result};
use pagekit_core::{DomEvent, Key, Page};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum Step {
    Click { selector: String },
    Key { key: Key },
    Input { selector: String, value: String },
    Check { selector: String, checked: bool },
    Submit { selector: String },
    /// Let `ms` milliseconds pass while in-flight submissions complete
    Wait { ms: u64 },
    OpenModal { name: String },
    CloseModal { name: String },
    CloseAll,
}

impl Step {
    /// Short label for logs
    pub fn label(&self) -> String {
        match self {
            Self::Click { selector } => format!("click {selector}"),
            Self::Key { key } => format!("key {key:?}"),
            Self::Input { selector, .. } => format!("input {selector}"),
            Self::Check { selector, checked } => format!("check {selector}={checked}"),
            Self::Submit { selector } => format!("submit {selector}"),
            Self::Wait { ms } => format!("wait {ms}ms"),
            Self::OpenModal { name } => format!("open {name}"),
            Self::CloseModal { name } => format!("close {name}"),
            Self::CloseAll => "close all".to_string(),
        }
    }

    /// DOM event for element steps; `None` for steps driven through the page API
    pub fn to_event(&self, page: &Page) -> Result<Option<DomEvent>> {
        let event = match self {
            Self::Click { selector } => DomEvent::Click {
                target: locate(page, selector)?,
            },
            Self::Key { key } => DomEvent::KeyDown { key: key.clone() },
            Self::Input { selector, value } => DomEvent::Input {
                target: locate(page, selector)?,
                value: value.clone(),
            },
            Self::Check { selector, checked } => DomEvent::Check {
                target: locate(page, selector)?,
                checked: *checked,
            },
            Self::Submit { selector } => DomEvent::Submit {
                form: locate(page, selector)?,
            },
            Self::Wait { .. } | Self::OpenModal { .. } | Self::CloseModal { .. } | Self::CloseAll => {
                return Ok(None);
            }
        };
        Ok(Some(event))
    }
}

fn locate(page: &Page, selector: &str) -> Result<pagekit_core::NodeId> {
    page.query(selector)
        .with_context(|| format!("bad selector {selector:?}"))?
        .with_context(|| format!("nothing matches {selector:?}"))
}

pub fn load(path: &Path) -> Result<Vec<Step>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid script {}", path.display()))
}
