//! Event → intent translation
//!
//! Click precedence:
//! 1. dropdown option row → select it
//! 2. dropdown face → toggle it
//! 3. otherwise close open dropdowns, then at most one of: close the visible
//!    modal (close button or its backdrop), open a modal (trigger match),
//!    toggle or close the navigation, switch a tab, submit a pipeline form

use super::intent::{DropdownIntent, Intent, ModalIntent, NavigationIntent, Resolution};
use crate::dom::NodeId;
use crate::page::Page;
use crate::types::{DomEvent, Key};
use crate::widgets::DropdownHit;

pub fn resolve(page: &Page, event: &DomEvent) -> Resolution {
    let mut resolution = Resolution::default();
    match event {
        DomEvent::Click { target } => resolve_click(page, *target, &mut resolution),
        DomEvent::KeyDown { key: Key::Escape } => {
            resolution.prevent_default = true;
            resolution.push(Intent::Modal(ModalIntent::CloseVisible));
        }
        DomEvent::KeyDown { .. } => {}
        DomEvent::Submit { form } => {
            if page.pipeline_for(*form).is_some() {
                resolution.prevent_default = true;
                resolution.push(Intent::SubmitForm { form: *form });
            }
        }
        DomEvent::Input { target, value } => resolution.push(Intent::SetValue {
            target: *target,
            value: value.clone(),
        }),
        DomEvent::Check { target, checked } => resolution.push(Intent::SetChecked {
            target: *target,
            checked: *checked,
        }),
    }
    resolution
}

fn resolve_click(page: &Page, target: NodeId, resolution: &mut Resolution) {
    let doc = page.document();

    match page.dropdowns().hit(doc, target) {
        Some(DropdownHit::Row { dropdown, index }) => {
            resolution.push(Intent::Dropdown(DropdownIntent::Select { dropdown, index }));
            return;
        }
        Some(DropdownHit::Face { dropdown }) => {
            resolution.push(Intent::Dropdown(DropdownIntent::Toggle { dropdown }));
            return;
        }
        None => {}
    }

    if page.dropdowns().open_dropdown().is_some() {
        resolution.push(Intent::Dropdown(DropdownIntent::CloseAll));
    }

    if let Some(modal) = page
        .modals()
        .iter()
        .find(|m| m.state().is_visible() && m.is_close_target(doc, target))
    {
        resolution.push(Intent::Modal(ModalIntent::Close { modal: modal.id() }));
        return;
    }

    if let Some((modal, trigger)) = page
        .modals()
        .iter()
        .find_map(|m| m.trigger_for(doc, target).map(|trigger| (m.id(), trigger)))
    {
        resolution.push(Intent::Modal(ModalIntent::Open { modal, trigger }));
        return;
    }

    if let Some(nav) = page.navigation() {
        if nav.is_toggle_target(doc, target) {
            resolution.push(Intent::Navigation(NavigationIntent::Toggle));
            return;
        }
        if nav.is_open() && (nav.is_leaf_target(doc, target) || nav.overlay().contains(doc, target)) {
            resolution.push(Intent::Navigation(NavigationIntent::Close));
            return;
        }
    }

    if let Some(button) = page.tabs().button_for(doc, target) {
        resolution.push(Intent::ActivateTab { button });
        return;
    }

    if let Some(form) = submit_button_form(page, target) {
        resolution.prevent_default = true;
        resolution.push(Intent::SubmitForm { form });
    }
}

/// Pipeline form submitted by clicking `target` (a submit button inside it)
fn submit_button_form(page: &Page, target: NodeId) -> Option<NodeId> {
    let doc = page.document();
    let mut cursor = Some(target);
    let button = loop {
        let node = cursor?;
        let is_submit = match doc.tag(node) {
            "button" => matches!(doc.attr(node, "type"), None | Some("submit")),
            "input" => matches!(doc.attr(node, "type"), Some("submit" | "image")),
            _ => false,
        };
        if is_submit {
            break node;
        }
        cursor = doc.parent(node);
    };
    page.pipelines()
        .iter()
        .map(|p| p.form())
        .find(|form| doc.is_descendant_of(button, *form))
}
