use crate::dispatch::ModalIntent;
use crate::dom::NodeId;
use crate::page::Page;
use crate::types::ModalId;

pub fn update(page: &mut Page, msg: ModalIntent) {
    match msg {
        ModalIntent::Open { modal, trigger } => open(page, modal, Some(trigger)),

        ModalIntent::Close { modal } => {
            if let Some(controller) = page.modals.get_mut(modal.index()) {
                controller.close(&mut page.doc, &mut page.lock, &mut page.scheduler);
            }
        }

        ModalIntent::CloseVisible => {
            for controller in &mut page.modals {
                controller.close(&mut page.doc, &mut page.lock, &mut page.scheduler);
            }
        }
    }
}

/// Open `modal`, first closing every other visible modal and the navigation
pub fn open(page: &mut Page, modal: ModalId, trigger: Option<NodeId>) {
    if page
        .modals
        .get(modal.index())
        .is_none_or(|m| m.state().is_visible())
    {
        return;
    }
    for other in page.modals.iter_mut().filter(|m| m.id() != modal) {
        other.close(&mut page.doc, &mut page.lock, &mut page.scheduler);
    }
    if let Some(nav) = page.nav.as_mut().filter(|nav| nav.is_open()) {
        nav.close(&mut page.doc, &mut page.lock);
    }
    if let Some(controller) = page.modals.get_mut(modal.index()) {
        controller.open(&mut page.doc, &mut page.lock, trigger);
    }
}
