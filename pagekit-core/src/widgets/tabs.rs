//! Tab switching inside `.tab` containers

use crate::config::ClassNames;
use crate::dom::{Document, NodeId, Selector};
use crate::error::CoreResult;

/// Delegated tab controller; holds no per-container state
#[derive(Debug)]
pub struct Tabs {
    container: Selector,
    button: Selector,
    pane: Selector,
    active_button: Selector,
    shown_pane: Selector,
    button_active: String,
    pane_show: String,
}

impl Tabs {
    pub fn new(classes: &ClassNames) -> CoreResult<Self> {
        Ok(Self {
            container: Selector::parse(&format!(".{}", classes.tab))?,
            button: Selector::parse(&format!(".{}", classes.tab_button))?,
            pane: Selector::parse(&format!(".{}", classes.tab_pane))?,
            active_button: Selector::parse(&format!(".{}", classes.tab_button_active))?,
            shown_pane: Selector::parse(&format!(".{}", classes.tab_pane_show))?,
            button_active: classes.tab_button_active.clone(),
            pane_show: classes.tab_pane_show.clone(),
        })
    }

    /// Tab button at or above `target`
    pub fn button_for(&self, doc: &Document, target: NodeId) -> Option<NodeId> {
        doc.closest(target, &self.button)
    }

    /// Show the pane named by the button's `data-target-id`
    ///
    /// Returns `false` when the button is already active, sits outside a
    /// `.tab`, or names a pane that does not exist.
    pub fn activate(&self, doc: &mut Document, button: NodeId) -> bool {
        if doc.has_class(button, &self.button_active) {
            return false;
        }
        let Some(container) = doc.closest(button, &self.container) else {
            return false;
        };
        let Some(target) = doc.data(button, "target-id").map(str::to_string) else {
            return false;
        };
        let Some(pane) = doc
            .query_selector_all(container, &self.pane)
            .into_iter()
            .find(|pane| doc.data(*pane, "id") == Some(target.as_str()))
        else {
            return false;
        };

        for current in doc.query_selector_all(container, &self.active_button) {
            doc.remove_class(current, &self.button_active);
        }
        for current in doc.query_selector_all(container, &self.shown_pane) {
            doc.remove_class(current, &self.pane_show);
        }
        doc.add_class(button, &self.button_active);
        doc.add_class(pane, &self.pane_show);
        log::debug!("[Tabs] switched to {target}");
        true
    }
}
