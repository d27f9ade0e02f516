//! Modal dialog controller

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use super::overlay::{Overlay, OverlayOwner, ScrollLock};
use crate::config::{ClassNames, ModalConfig, PageConfig};
use crate::dom::{Document, NodeId, Selector};
use crate::error::CoreResult;
use crate::scheduler::{Scheduler, TimerId, TimerTask};
use crate::types::ModalId;

/// Modal lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ModalState {
    Closed,
    Open,
    ShowingSuccess,
    ShowingError,
}

impl ModalState {
    /// Any state in which the modal is visible
    pub fn is_visible(self) -> bool {
        self != Self::Closed
    }
}

/// Which feedback panel replaces the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FeedbackKind {
    Success,
    Error,
}

/// Called after the modal opens, with the trigger that opened it (`None` when opened from code)
pub type OpenHook = Box<dyn FnMut(&mut Document, Option<NodeId>)>;
/// Called after the modal closes
pub type CloseHook = Box<dyn FnMut(&mut Document)>;

#[derive(Default)]
struct ModalHooks {
    on_open: Option<OpenHook>,
    on_close: Option<CloseHook>,
}

impl fmt::Debug for ModalHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalHooks")
            .field("on_open", &self.on_open.is_some())
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}

/// Feedback currently on screen, with the timer that will revert it
#[derive(Debug, Clone, Copy)]
struct ActiveFeedback {
    timer: TimerId,
    form: NodeId,
    panel: NodeId,
}

/// One named modal
#[derive(Debug)]
pub struct ModalController {
    id: ModalId,
    name: String,
    root: NodeId,
    open_selector: Option<Selector>,
    has_form: bool,
    state: ModalState,
    overlay: Overlay,
    close_button: NodeId,
    feedback: Option<ActiveFeedback>,
    /// Pending navigation started from the success panel
    redirect: Option<TimerId>,
    hooks: ModalHooks,
    type_field: Selector,
    type_data_key: String,
    classes: ClassNames,
}

impl ModalController {
    /// Bind to the modal root and inject its close button
    ///
    /// Returns `Ok(None)` when the root is not in the document.
    pub fn mount(
        doc: &mut Document,
        id: ModalId,
        modal: &ModalConfig,
        config: &PageConfig,
    ) -> CoreResult<Option<Self>> {
        let selector = Selector::parse(&modal.selector)?;
        let open_selector = modal
            .open_selector
            .as_deref()
            .map(Selector::parse)
            .transpose()?;
        let type_field = Selector::parse(&format!("[name=\"{}\"]", config.type_field_name))?;

        let Some(root) = doc.query_selector(doc.root(), &selector) else {
            log::warn!("[Modal] {} not found ({}), skipped", modal.name, modal.selector);
            return Ok(None);
        };

        let close_button = inject_close_button(doc, root, config);
        log::debug!("[Modal] mounted {} at {root}", modal.name);

        Ok(Some(Self {
            id,
            name: modal.name.clone(),
            root,
            open_selector,
            has_form: modal.has_form,
            state: ModalState::Closed,
            overlay: Overlay::new(OverlayOwner::Modal(id), config.classes.overlay.clone()),
            close_button,
            feedback: None,
            redirect: None,
            hooks: ModalHooks::default(),
            type_field,
            type_data_key: config.type_data_key.clone(),
            classes: config.classes.clone(),
        }))
    }

    pub fn id(&self) -> ModalId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn has_form(&self) -> bool {
        self.has_form
    }

    pub fn close_button(&self) -> NodeId {
        self.close_button
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// Pending feedback revert timer
    pub fn feedback_timer(&self) -> Option<TimerId> {
        self.feedback.map(|f| f.timer)
    }

    /// Pending redirect timer
    pub fn redirect_timer(&self) -> Option<TimerId> {
        self.redirect
    }

    pub fn set_on_open(&mut self, hook: impl FnMut(&mut Document, Option<NodeId>) + 'static) {
        self.hooks.on_open = Some(Box::new(hook));
    }

    pub fn set_on_close(&mut self, hook: impl FnMut(&mut Document) + 'static) {
        self.hooks.on_close = Some(Box::new(hook));
    }

    /// First `<form>` inside the modal
    pub fn form(&self, doc: &Document) -> Option<NodeId> {
        doc.descendants(self.root)
            .into_iter()
            .find(|node| doc.tag(*node) == "form")
    }

    /// Element matching the open selector at or above `target`
    pub fn trigger_for(&self, doc: &Document, target: NodeId) -> Option<NodeId> {
        self.open_selector
            .as_ref()
            .and_then(|selector| doc.closest(target, selector))
    }

    /// Whether clicking `target` closes this modal (close button or backdrop)
    pub fn is_close_target(&self, doc: &Document, target: NodeId) -> bool {
        target == self.close_button
            || doc.is_descendant_of(target, self.close_button)
            || self.overlay.contains(doc, target)
    }

    /// `Closed → Open`; ignored in any other state
    pub fn open(&mut self, doc: &mut Document, lock: &mut ScrollLock, trigger: Option<NodeId>) -> bool {
        if self.state != ModalState::Closed {
            log::debug!("[Modal] {} already {:?}, open ignored", self.name, self.state);
            return false;
        }
        doc.add_class(self.root, &self.classes.active);
        self.overlay.add(doc, lock);
        self.state = ModalState::Open;

        if let Some(hook) = self.hooks.on_open.as_mut() {
            hook(doc, trigger);
        }

        if let Some(trigger) = trigger {
            let value = doc.data(trigger, &self.type_data_key).map(str::to_string);
            let field = doc.query_selector(self.root, &self.type_field);
            if let (Some(value), Some(field)) = (value, field) {
                doc.set_value(field, &value);
            }
        }

        log::info!("[Modal] {} opened", self.name);
        true
    }

    /// Any visible state `→ Closed`, cancelling a pending feedback revert
    pub fn close(&mut self, doc: &mut Document, lock: &mut ScrollLock, scheduler: &mut Scheduler) -> bool {
        if self.state == ModalState::Closed {
            return false;
        }
        self.cancel_feedback(doc, scheduler);
        self.cancel_redirect(scheduler);
        self.hide(doc, lock);
        if let Some(hook) = self.hooks.on_close.as_mut() {
            hook(doc);
        }
        log::info!("[Modal] {} closed", self.name);
        true
    }

    /// `Open → ShowingSuccess | ShowingError`
    ///
    /// No-op when the modal is not `Open` or lacks the form or the panel.
    pub fn show_feedback(
        &mut self,
        doc: &mut Document,
        scheduler: &mut Scheduler,
        kind: FeedbackKind,
        delay: Duration,
    ) -> bool {
        if self.state != ModalState::Open {
            log::debug!("[Modal] {} is {:?}, feedback skipped", self.name, self.state);
            return false;
        }
        let panel_class = match kind {
            FeedbackKind::Success => &self.classes.modal_success,
            FeedbackKind::Error => &self.classes.modal_error,
        };
        let panel = doc
            .descendants(self.root)
            .into_iter()
            .find(|node| doc.has_class(*node, panel_class));
        let (Some(form), Some(panel)) = (self.form(doc), panel) else {
            log::debug!("[Modal] {} has no form or {panel_class} panel", self.name);
            return false;
        };

        doc.add_class(panel, &self.classes.active);
        doc.add_class(form, &self.classes.hide);
        let timer = scheduler.schedule(delay, TimerTask::RevertFeedback { modal: self.id });
        self.feedback = Some(ActiveFeedback { timer, form, panel });
        self.state = match kind {
            FeedbackKind::Success => ModalState::ShowingSuccess,
            FeedbackKind::Error => ModalState::ShowingError,
        };
        true
    }

    /// Navigate to `url` once `delay` has passed, unless the modal is closed first
    ///
    /// Only the success panel starts a redirect; in any other state nothing
    /// is scheduled.
    pub fn schedule_redirect(&mut self, scheduler: &mut Scheduler, delay: Duration, url: String) -> bool {
        if self.state != ModalState::ShowingSuccess {
            log::debug!("[Modal] {} is {:?}, redirect skipped", self.name, self.state);
            return false;
        }
        self.cancel_redirect(scheduler);
        let timer = scheduler.schedule(delay, TimerTask::Redirect { modal: self.id, url });
        self.redirect = Some(timer);
        true
    }

    /// Fired redirect timer; `false` for a timer this modal no longer owns
    pub fn finish_redirect(&mut self, timer: TimerId) -> bool {
        if self.redirect != Some(timer) {
            return false;
        }
        self.redirect = None;
        true
    }

    /// Fired feedback timer: restore the form and close
    ///
    /// Stale timers (already cancelled or superseded) are ignored.
    pub fn finish_feedback(&mut self, doc: &mut Document, lock: &mut ScrollLock, timer: TimerId) -> bool {
        if self.feedback.map(|f| f.timer) != Some(timer) {
            return false;
        }
        if let Some(feedback) = self.feedback.take() {
            self.restore_panels(doc, feedback);
        }
        self.hide(doc, lock);
        if let Some(hook) = self.hooks.on_close.as_mut() {
            hook(doc);
        }
        log::info!("[Modal] {} feedback finished", self.name);
        true
    }

    /// Silent return to `Closed` for a page-wide close; hooks do not run
    pub fn reset(&mut self, doc: &mut Document, lock: &mut ScrollLock, scheduler: &mut Scheduler) {
        self.cancel_feedback(doc, scheduler);
        self.cancel_redirect(scheduler);
        self.hide(doc, lock);
    }

    fn hide(&mut self, doc: &mut Document, lock: &mut ScrollLock) {
        doc.remove_class(self.root, &self.classes.active);
        self.overlay.remove(doc, lock);
        self.state = ModalState::Closed;
    }

    fn cancel_feedback(&mut self, doc: &mut Document, scheduler: &mut Scheduler) {
        if let Some(feedback) = self.feedback.take() {
            scheduler.cancel(feedback.timer);
            self.restore_panels(doc, feedback);
        }
    }

    fn cancel_redirect(&mut self, scheduler: &mut Scheduler) {
        if let Some(timer) = self.redirect.take() {
            scheduler.cancel(timer);
            log::info!("[Modal] {} redirect cancelled", self.name);
        }
    }

    fn restore_panels(&self, doc: &mut Document, feedback: ActiveFeedback) {
        doc.remove_class(feedback.panel, &self.classes.active);
        doc.remove_class(feedback.form, &self.classes.hide);
    }
}

/// `button.modal__close > svg > use`, appended to the modal root
fn inject_close_button(doc: &mut Document, root: NodeId, config: &PageConfig) -> NodeId {
    let button = doc.create_element("button");
    doc.add_class(button, &config.classes.modal_close);
    doc.set_attr(button, "type", "button");

    let svg = doc.create_element("svg");
    doc.set_attr(svg, "width", "28");
    doc.set_attr(svg, "height", "28");
    doc.set_attr(svg, "viewBox", "0 0 28 28");

    let icon = doc.create_element("use");
    doc.set_attr(icon, "href", &config.close_icon_href);

    doc.append_child(svg, icon);
    doc.append_child(button, svg);
    doc.append_child(root, button);
    button
}
