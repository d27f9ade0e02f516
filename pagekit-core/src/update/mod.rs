//! Update 层：意图处理
//!
//! The only code that mutates a mounted page in response to input. Each
//! [`Intent`] maps to one state change; larger groups are delegated to the
//! submodules.

mod dropdown;
mod form;
mod modal;
mod navigation;

pub(crate) use modal::open as open_modal;

use crate::dispatch::Intent;
use crate::page::Page;
use crate::types::EventResponse;

/// Apply one intent, recording host-facing effects in `response`
pub fn update(page: &mut Page, intent: Intent, response: &mut EventResponse) {
    match intent {
        Intent::Dropdown(msg) => dropdown::update(page, msg),
        Intent::Modal(msg) => modal::update(page, msg),
        Intent::Navigation(msg) => navigation::update(page, msg),

        Intent::ActivateTab { button } => {
            page.tabs.activate(&mut page.doc, button);
        }

        Intent::SubmitForm { form } => form::submit(page, form, response),

        Intent::SetValue { target, value } => {
            page.doc.set_value(target, &value);
            form::revalidate_owner(page, target);
        }

        Intent::SetChecked { target, checked } => {
            page.doc.set_checked(target, checked);
            form::revalidate_owner(page, target);
        }
    }
}
