//! Page composition root
//!
//! A [`Page`] owns the document and every widget mounted on it. Hosts feed it
//! events with [`Page::handle`], move its clock with [`Page::advance`] and
//! report network results with [`Page::complete_submission`]; nothing else
//! mutates it.

use std::collections::HashMap;
use std::time::Duration;

use pagekit_transport::{FormSubmission, SubmissionReply, TransportError};
use uuid::Uuid;

use crate::config::PageConfig;
use crate::dispatch;
use crate::dom::{Document, NodeId, Selector};
use crate::error::{CoreError, CoreResult};
use crate::scheduler::{duration_ms, Scheduler, TimerTask};
use crate::services::{redirect_target, FormPipeline, PendingSubmission, RuleValidator};
use crate::traits::{BrowserHost, FormTransport, FormValidator};
use crate::types::{
    ChangeEvent, DomEvent, EventResponse, ModalId, ModalSnapshot, PageSnapshot, SubmissionOutcome,
};
use crate::update;
use crate::widgets::{
    DropdownRegistry, FeedbackKind, ModalController, ModalState, NavigationShell, ScrollLock, Tabs,
};

type ChangeListener = Box<dyn FnMut(&ChangeEvent)>;

pub struct Page {
    pub(crate) config: PageConfig,
    pub(crate) doc: Document,
    pub(crate) lock: ScrollLock,
    pub(crate) scheduler: Scheduler,
    pub(crate) modals: Vec<ModalController>,
    pub(crate) dropdowns: DropdownRegistry,
    pub(crate) nav: Option<NavigationShell>,
    pub(crate) tabs: Tabs,
    pub(crate) pipelines: Vec<FormPipeline>,
    pub(crate) pending: HashMap<Uuid, PendingSubmission>,
    pub(crate) validator: Box<dyn FormValidator>,
    change_listeners: Vec<ChangeListener>,
    modal_selector: Selector,
    overlay_selector: Selector,
}

impl Page {
    /// Mount every widget the config describes on `doc`
    ///
    /// Missing markup is skipped with a log line; only malformed selectors fail.
    pub fn mount(mut doc: Document, config: PageConfig) -> CoreResult<Self> {
        let classes = &config.classes;
        let lock = ScrollLock::new(classes.no_scroll.clone());
        let nav = NavigationShell::mount(&doc, classes)?;

        let mut modals = Vec::new();
        let mut pipelines = Vec::new();
        for modal in &config.modals {
            let id = ModalId(modals.len());
            let Some(controller) = ModalController::mount(&mut doc, id, modal, &config)? else {
                continue;
            };
            if modal.has_form {
                match controller.form(&doc) {
                    Some(form) => {
                        pipelines.push(FormPipeline::new(&doc, id, form, &config.messages));
                    }
                    None => log::warn!("[Modal] {} has no form, submissions disabled", modal.name),
                }
            }
            modals.push(controller);
        }

        let mut dropdowns = DropdownRegistry::new(classes.clone());
        dropdowns.mount_all(&mut doc, &Selector::parse(&config.dropdown_selector)?);

        let tabs = Tabs::new(classes)?;
        let modal_selector = Selector::parse(&format!(".{}", classes.modal))?;
        let overlay_selector = Selector::parse(&format!(".{}", classes.overlay))?;

        log::info!(
            "[Page] mounted: {} modal(s), {} form(s), {} dropdown(s), navigation {}",
            modals.len(),
            pipelines.len(),
            dropdowns.len(),
            if nav.is_some() { "on" } else { "off" }
        );

        Ok(Self {
            config,
            doc,
            lock,
            scheduler: Scheduler::new(),
            modals,
            dropdowns,
            nav,
            tabs,
            pipelines,
            pending: HashMap::new(),
            validator: Box::new(RuleValidator::new()?),
            change_listeners: Vec::new(),
            modal_selector,
            overlay_selector,
        })
    }

    /// Replace the built-in rule engine
    #[must_use]
    pub fn with_validator(mut self, validator: impl FormValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    /// Register a listener for `change` notifications raised by dropdown picks
    pub fn on_change(&mut self, listener: impl FnMut(&ChangeEvent) + 'static) {
        self.change_listeners.push(Box::new(listener));
    }

    pub(crate) fn notify_change(&mut self, change: &ChangeEvent) {
        for listener in &mut self.change_listeners {
            listener(change);
        }
    }

    // ===== input =====

    /// Deliver one event to the page's delegated listener
    ///
    /// Events addressed to a node this document never created are dropped.
    pub fn handle(&mut self, event: DomEvent) -> EventResponse {
        if let Some(node) = event.node().filter(|node| !self.doc.contains(*node)) {
            log::warn!("[Page] {event:?} targets unknown node {node}, dropped");
            return EventResponse::default();
        }
        let resolution = dispatch::resolve(self, &event);
        log::trace!("[Page] {event:?} -> {:?}", resolution.intents);

        let mut response = EventResponse {
            default_prevented: resolution.prevent_default,
            ..EventResponse::default()
        };
        for intent in resolution.intents {
            update::update(self, intent, &mut response);
        }
        response
    }

    /// Apply the network result of a submission started by [`Page::handle`]
    ///
    /// Success shows the success panel, resets the form and schedules the
    /// redirect when the reply asks for one. Failure shows the error panel and
    /// raises a blocking alert through `host`.
    pub fn complete_submission(
        &mut self,
        id: Uuid,
        result: Result<SubmissionReply, TransportError>,
        host: &mut dyn BrowserHost,
    ) -> CoreResult<SubmissionOutcome> {
        let pending = self
            .pending
            .remove(&id)
            .ok_or_else(|| CoreError::UnknownSubmission(id.to_string()))?;
        let delay = Duration::from_millis(self.config.feedback_delay_ms);
        let Some(modal) = self.modals.get_mut(pending.modal.index()) else {
            return Err(CoreError::ModalNotFound(format!("{:?}", pending.modal)));
        };
        let name = modal.name().to_string();

        match result {
            Ok(reply) => {
                log::info!("[Submit] {id} accepted: {:?}", reply.form_type());
                let shown = modal.show_feedback(&mut self.doc, &mut self.scheduler, FeedbackKind::Success, delay);
                if !shown {
                    log::debug!("[Submit] {name} no longer open, success panel skipped");
                }
                self.doc.reset_form(pending.form);
                self.dropdowns.reset_within(&mut self.doc, pending.form);

                let redirect = redirect_target(&reply, &self.config.redirect_form_type).filter(|url| {
                    modal.schedule_redirect(&mut self.scheduler, delay, url.clone())
                });
                if let Some(url) = &redirect {
                    log::info!("[Submit] redirect to {url} in {}ms", self.config.feedback_delay_ms);
                }
                Ok(SubmissionOutcome::Success {
                    modal: name,
                    redirect,
                })
            }
            Err(error) => {
                let core_error = CoreError::from(error.clone());
                if core_error.is_expected() {
                    log::warn!("[Submit] {id} failed: {core_error}");
                } else {
                    log::error!("[Submit] {id} failed: {core_error}");
                }
                modal.show_feedback(&mut self.doc, &mut self.scheduler, FeedbackKind::Error, delay);
                if core_error.raises_alert() {
                    host.alert(&self.config.messages.submit_failed);
                }
                Ok(SubmissionOutcome::Failure { modal: name, error })
            }
        }
    }

    /// Run the validation gate on `form` and register what it lets through
    ///
    /// The returned submission owns its data; send it through a transport and
    /// hand the result to [`Page::complete_submission`].
    pub fn begin_submission(&mut self, form: NodeId) -> CoreResult<FormSubmission> {
        if self.pipeline_for(form).is_none() {
            return Err(CoreError::ElementNotFound(format!("submission form {form}")));
        }
        let response = self.handle(DomEvent::Submit { form });
        response
            .submission
            .ok_or(CoreError::ValidationFailed(response.invalid_fields))
    }

    /// Submit `form` and await the transport in one call
    ///
    /// For hosts that handle one submission at a time; concurrent hosts use
    /// [`Page::handle`] and [`Page::complete_submission`] directly.
    pub async fn submit(
        &mut self,
        form: NodeId,
        transport: &dyn FormTransport,
        host: &mut dyn BrowserHost,
    ) -> CoreResult<SubmissionOutcome> {
        let submission = self.begin_submission(form)?;
        log::debug!("[Submit] {} via {}", submission.id, transport.id());
        let result = transport.submit(&submission).await;
        self.complete_submission(submission.id, result, host)
    }

    // ===== time =====

    /// Move the clock forward, running every timer that falls due; returns how many ran
    pub fn advance(&mut self, by: Duration, host: &mut dyn BrowserHost) -> usize {
        let target = self.scheduler.now_ms().saturating_add(duration_ms(by));
        let mut ran = 0;
        while let Some((timer, task)) = self.scheduler.pop_due(target) {
            ran += 1;
            match task {
                TimerTask::RevertFeedback { modal } => {
                    if let Some(controller) = self.modals.get_mut(modal.index()) {
                        controller.finish_feedback(&mut self.doc, &mut self.lock, timer);
                    }
                }
                TimerTask::Redirect { modal, url } => {
                    if let Some(controller) = self.modals.get_mut(modal.index()) {
                        controller.finish_redirect(timer);
                    }
                    log::info!("[Page] navigate to {url}");
                    host.navigate(&url);
                }
            }
        }
        self.scheduler.set_now(target);
        ran
    }

    /// Time until the next pending timer
    pub fn next_timer_in(&self) -> Option<Duration> {
        self.scheduler.next_due_in()
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    // ===== modals =====

    pub fn modals(&self) -> &[ModalController] {
        &self.modals
    }

    pub fn modal(&self, name: &str) -> Option<&ModalController> {
        self.modals.iter().find(|m| m.name() == name)
    }

    /// Mutable controller, for installing hooks
    pub fn modal_mut(&mut self, name: &str) -> Option<&mut ModalController> {
        self.modals.iter_mut().find(|m| m.name() == name)
    }

    pub fn modal_state(&self, name: &str) -> Option<ModalState> {
        self.modal(name).map(ModalController::state)
    }

    /// Open a modal from code (no trigger); `false` when it was already visible
    pub fn open_modal(&mut self, name: &str) -> CoreResult<bool> {
        let modal = self.modal_id(name)?;
        let was_closed = self.modals[modal.index()].state() == ModalState::Closed;
        update::open_modal(self, modal, None);
        Ok(was_closed)
    }

    pub fn close_modal(&mut self, name: &str) -> CoreResult<bool> {
        let modal = self.modal_id(name)?;
        let controller = &mut self.modals[modal.index()];
        Ok(controller.close(&mut self.doc, &mut self.lock, &mut self.scheduler))
    }

    /// Page-wide close: every `.modal` loses `active`, every `.overlay` is removed,
    /// every controller and the navigation return to rest, scrolling unlocks
    pub fn close_all_modals(&mut self) {
        for modal in self.doc.query_selector_all(self.doc.root(), &self.modal_selector) {
            self.doc.remove_class(modal, &self.config.classes.active);
        }
        for overlay in self.doc.query_selector_all(self.doc.root(), &self.overlay_selector) {
            self.doc.detach(overlay);
        }
        for controller in &mut self.modals {
            controller.reset(&mut self.doc, &mut self.lock, &mut self.scheduler);
        }
        if let Some(nav) = self.nav.as_mut() {
            nav.close(&mut self.doc, &mut self.lock);
        }
        self.lock.release_all(&mut self.doc);
        log::info!("[Modal] all closed");
    }

    fn modal_id(&self, name: &str) -> CoreResult<ModalId> {
        self.modal(name)
            .map(ModalController::id)
            .ok_or_else(|| CoreError::ModalNotFound(name.to_string()))
    }

    // ===== other widgets =====

    pub fn dropdowns(&self) -> &DropdownRegistry {
        &self.dropdowns
    }

    pub fn navigation(&self) -> Option<&NavigationShell> {
        self.nav.as_ref()
    }

    pub fn nav_is_open(&self) -> bool {
        self.nav.as_ref().is_some_and(NavigationShell::is_open)
    }

    pub fn tabs(&self) -> &Tabs {
        &self.tabs
    }

    pub fn pipelines(&self) -> &[FormPipeline] {
        &self.pipelines
    }

    pub fn pipeline_for(&self, form: NodeId) -> Option<&FormPipeline> {
        self.pipelines.iter().find(|p| p.form() == form)
    }

    pub fn pending_submissions(&self) -> usize {
        self.pending.len()
    }

    // ===== document =====

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// First element matching `selector`
    pub fn query(&self, selector: &str) -> CoreResult<Option<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(self.doc.query_selector(self.doc.root(), &selector))
    }

    pub fn scroll_locked(&self) -> bool {
        self.doc.has_class(self.doc.body(), &self.config.classes.no_scroll)
    }

    /// Backdrops currently attached
    pub fn overlay_count(&self) -> usize {
        self.doc
            .query_selector_all(self.doc.root(), &self.overlay_selector)
            .len()
    }

    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            modals: self
                .modals
                .iter()
                .map(|m| ModalSnapshot {
                    name: m.name().to_string(),
                    state: m.state(),
                })
                .collect(),
            nav_open: self.nav_is_open(),
            scroll_locked: self.scroll_locked(),
            overlays: self.overlay_count(),
            open_dropdown: self.dropdowns.open_dropdown().map(|id| id.index()),
            pending_timers: self.scheduler.len(),
            now_ms: self.scheduler.now_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use serde_json::json;

    use super::*;
    use crate::test_utils::{landing_page, node, MockTransport, RecordingHost};
    use crate::types::Key;

    const FEEDBACK: Duration = Duration::from_millis(3000);

    fn click(page: &mut Page, selector: &str) -> EventResponse {
        let target = node(page, selector);
        page.handle(DomEvent::Click { target })
    }

    fn type_into(page: &mut Page, selector: &str, value: &str) {
        let target = node(page, selector);
        page.handle(DomEvent::Input {
            target,
            value: value.to_string(),
        });
    }

    fn fill_register(page: &mut Page) {
        type_into(page, ".register [name=\"name\"]", "Ada");
        type_into(page, ".register [name=\"email\"]", "ada@example.org");
    }

    // ---- mount ----

    #[test]
    fn mount_wires_stock_page() {
        let page = landing_page();
        assert_eq!(page.modals().len(), 4);
        assert_eq!(page.pipelines().len(), 3);
        assert_eq!(page.dropdowns().len(), 2);
        assert!(page.navigation().is_some());
        for modal in page.modals() {
            assert_eq!(page.document().parent(modal.close_button()), Some(modal.root()));
        }
        assert!(!page.scroll_locked());
        assert_eq!(page.overlay_count(), 0);
    }

    #[test]
    fn mount_skips_absent_markup() {
        let page = Page::mount(Document::new(), PageConfig::default()).unwrap();
        assert!(page.modals().is_empty());
        assert!(page.navigation().is_none());
        assert!(page.dropdowns().is_empty());
    }

    #[test]
    fn mount_rejects_bad_selector() {
        let config = PageConfig::from_json_str(r#"{"dropdownSelector": "select:hover"}"#).unwrap();
        let result = Page::mount(Document::new(), config);
        assert!(matches!(result, Err(CoreError::InvalidSelector(_))));
    }

    // ---- dropdowns ----

    #[test]
    fn dropdowns_are_exclusive() {
        let mut page = landing_page();
        let faces = page
            .document()
            .query_selector_all(page.document().root(), &Selector::parse(".select-styled").unwrap());

        page.handle(DomEvent::Click { target: faces[0] });
        page.handle(DomEvent::Click { target: faces[1] });

        let open: Vec<_> = page.dropdowns().iter().filter(|d| d.is_open()).collect();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].styled(), faces[1]);

        click(&mut page, "h1");
        assert!(page.dropdowns().iter().all(|d| !d.is_open()));
    }

    #[test]
    fn picking_a_row_notifies_once() {
        let mut page = landing_page();
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        page.on_change(move |change| sink.borrow_mut().push(change.value.clone()));

        click(&mut page, ".register .select-styled");
        click(&mut page, ".register .select-options li[rel=\"msk\"]");

        assert_eq!(*changes.borrow(), ["msk"]);
        let select = node(&page, ".register select");
        assert_eq!(page.document().value(select), "msk");
        assert_eq!(page.dropdowns().open_dropdown(), None);
    }

    // ---- modals ----

    #[test]
    fn trigger_opens_and_copies_type() {
        let mut page = landing_page();
        click(&mut page, ".register__open span");

        assert_eq!(page.modal_state("register"), Some(ModalState::Open));
        assert_eq!(page.overlay_count(), 1);
        assert!(page.scroll_locked());
        let field = node(&page, ".register [name=\"type_action\"]");
        assert_eq!(page.document().value(field), "vip");
    }

    #[test]
    fn escape_backdrop_and_button_each_close() {
        let mut page = landing_page();

        click(&mut page, ".register__open");
        let response = page.handle(DomEvent::KeyDown { key: Key::Escape });
        assert!(response.default_prevented);
        assert_eq!(page.modal_state("register"), Some(ModalState::Closed));

        click(&mut page, ".register__open");
        click(&mut page, ".overlay");
        assert_eq!(page.modal_state("register"), Some(ModalState::Closed));

        click(&mut page, ".register__open");
        click(&mut page, ".register .modal__close use");
        assert_eq!(page.modal_state("register"), Some(ModalState::Closed));

        assert_eq!(page.overlay_count(), 0);
        assert!(!page.scroll_locked());
    }

    #[test]
    fn only_one_modal_open() {
        let mut page = landing_page();
        click(&mut page, ".register__open");
        click(&mut page, ".payment__open");

        assert_eq!(page.modal_state("register"), Some(ModalState::Closed));
        assert_eq!(page.modal_state("payment"), Some(ModalState::Open));
        assert_eq!(page.overlay_count(), 1);
        assert!(page.scroll_locked());
    }

    #[test]
    fn code_open_without_trigger() {
        let mut page = landing_page();
        assert!(page.open_modal("get-videos").unwrap());
        assert!(!page.open_modal("get-videos").unwrap());
        assert_eq!(page.modal_state("get-videos"), Some(ModalState::Open));
        assert!(matches!(page.open_modal("nope"), Err(CoreError::ModalNotFound(_))));
        assert!(page.close_modal("get-videos").unwrap());
    }

    #[test]
    fn opening_modal_closes_navigation() {
        let mut page = landing_page();
        click(&mut page, ".header__burger");
        assert!(page.nav_is_open());

        page.open_modal("register").unwrap();
        assert!(!page.nav_is_open());
        assert_eq!(page.overlay_count(), 1);
        assert!(page.scroll_locked());
    }

    #[test]
    fn close_all_sweeps_everything() {
        let mut page = landing_page();
        click(&mut page, ".header__burger");
        page.open_modal("register").unwrap();
        page.close_all_modals();

        assert!(page.modals().iter().all(|m| m.state() == ModalState::Closed));
        assert_eq!(page.overlay_count(), 0);
        assert!(!page.scroll_locked());
        assert!(page
            .document()
            .query_selector_all(page.document().root(), &Selector::parse(".modal.active").unwrap())
            .is_empty());
    }

    // ---- navigation ----

    #[test]
    fn navigation_leaf_closes() {
        let mut page = landing_page();
        click(&mut page, ".header__burger span");
        assert!(page.nav_is_open());
        assert!(page.scroll_locked());

        click(&mut page, ".header__menu a");
        assert!(!page.nav_is_open());
        assert!(!page.scroll_locked());
        assert_eq!(page.overlay_count(), 0);
    }

    #[test]
    fn event_for_foreign_node_is_dropped() {
        let mut page = landing_page();
        let before = page.snapshot();
        let event: DomEvent = serde_json::from_value(json!({"type": "click", "target": 100_000})).unwrap();
        let response = page.handle(event);
        assert!(!response.default_prevented);
        assert!(response.submission.is_none());

        let submit: DomEvent = serde_json::from_value(json!({"type": "submit", "form": 100_000})).unwrap();
        page.handle(submit);
        assert_eq!(page.snapshot(), before);
    }

    // ---- tabs ----

    #[test]
    fn tab_click_switches_pane() {
        let mut page = landing_page();
        click(&mut page, "[data-target-id=\"day2\"]");
        let shown = node(&page, ".tab-pane-show");
        assert_eq!(page.document().data(shown, "id"), Some("day2"));
    }

    // ---- submission ----

    #[tokio::test]
    async fn empty_required_field_never_reaches_transport() {
        let mut page = landing_page();
        let transport = MockTransport::succeeding(json!({"FORM_TYPE": "register"}));
        let mut host = RecordingHost::default();
        click(&mut page, ".register__open");
        let form = node(&page, ".register form");

        let result = page.submit(form, &transport, &mut host).await;
        assert!(matches!(result, Err(CoreError::ValidationFailed(2))));
        assert!(transport.calls().await.is_empty());
        assert_eq!(page.modal_state("register"), Some(ModalState::Open));

        let name = node(&page, ".register [name=\"name\"]");
        assert!(page.document().has_class(name, "invalid"));
        assert!(host.alerts.is_empty());
    }

    #[test]
    fn split_submission_completes_out_of_band() {
        let mut page = landing_page();
        let mut host = RecordingHost::default();
        click(&mut page, ".register__open");
        fill_register(&mut page);
        let form = node(&page, ".register form");

        let submission = page.begin_submission(form).unwrap();
        assert_eq!(page.pending_submissions(), 1);
        let reply = SubmissionReply::from_value(json!({"FORM_TYPE": "register"}));
        let outcome = page.complete_submission(submission.id, Ok(reply), &mut host).unwrap();
        assert!(outcome.is_success());
        assert_eq!(page.pending_submissions(), 0);

        let search = node(&page, "form.search");
        assert!(matches!(
            page.begin_submission(search),
            Err(CoreError::ElementNotFound(_))
        ));
    }

    #[tokio::test]
    async fn success_resets_form_and_reverts_after_delay() {
        let mut page = landing_page();
        let transport = MockTransport::succeeding(json!({"FORM_TYPE": "register"}));
        let mut host = RecordingHost::default();
        click(&mut page, ".register__open");
        fill_register(&mut page);
        click(&mut page, ".register .select-styled");
        click(&mut page, ".register .select-options li[rel=\"nn\"]");
        let form = node(&page, ".register form");

        let outcome = page.submit(form, &transport, &mut host).await.unwrap();
        assert!(outcome.is_success());
        assert_eq!(page.modal_state("register"), Some(ModalState::ShowingSuccess));

        let calls = transport.calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].action, "/ajax/register.php");
        assert_eq!(calls[0].payload.get("name"), Some("Ada"));
        assert_eq!(calls[0].payload.get("type_action"), Some("vip"));
        assert_eq!(calls[0].payload.get("city"), Some("nn"));

        let name = node(&page, ".register [name=\"name\"]");
        assert_eq!(page.document().value(name), "");
        let city = page.dropdowns().iter().next().unwrap();
        assert_eq!(city.selected(), None);

        page.advance(FEEDBACK - Duration::from_millis(1), &mut host);
        assert_eq!(page.modal_state("register"), Some(ModalState::ShowingSuccess));
        page.advance(Duration::from_millis(1), &mut host);
        assert_eq!(page.modal_state("register"), Some(ModalState::Closed));
        assert!(!page.document().has_class(form, "hide"));
        assert!(!page.scroll_locked());
        assert!(host.navigations.is_empty());
    }

    #[tokio::test]
    async fn non_2xx_shows_error_and_alerts() {
        let mut page = landing_page();
        let transport = MockTransport::failing(TransportError::HttpStatus {
            endpoint: "/ajax/register.php".into(),
            status: 500,
            body: None,
        });
        let mut host = RecordingHost::default();
        click(&mut page, ".register__open");
        fill_register(&mut page);
        let form = node(&page, ".register form");

        let outcome = page.submit(form, &transport, &mut host).await.unwrap();
        assert!(!outcome.is_success());
        assert_eq!(page.modal_state("register"), Some(ModalState::ShowingError));
        assert_eq!(host.alerts, ["Ошибка при отправке формы"]);
        let success = node(&page, ".register .modal__success");
        assert!(!page.document().has_class(success, "active"));

        // 失败不重置表单
        let name = node(&page, ".register [name=\"name\"]");
        assert_eq!(page.document().value(name), "Ada");
    }

    #[tokio::test]
    async fn ticket_reply_redirects_after_delay() {
        let mut page = landing_page();
        let transport = MockTransport::succeeding(json!({
            "FORM_TYPE": "ticket",
            "RK_LINK": "https://pay.example/checkout/42"
        }));
        let mut host = RecordingHost::default();
        click(&mut page, ".payment__open");
        type_into(&mut page, ".payment [name=\"phone\"]", "+7 (900) 000-00-00");
        let form = node(&page, ".payment form");

        let outcome = page.submit(form, &transport, &mut host).await.unwrap();
        match outcome {
            SubmissionOutcome::Success { redirect, .. } => {
                assert_eq!(redirect.as_deref(), Some("https://pay.example/checkout/42"));
            }
            SubmissionOutcome::Failure { error, .. } => panic!("unexpected failure: {error}"),
        }
        assert_eq!(transport.calls().await[0].payload.get("type_action"), Some("ticket"));

        page.advance(Duration::from_millis(2999), &mut host);
        assert!(host.navigations.is_empty());
        page.advance(Duration::from_millis(1), &mut host);
        assert_eq!(host.navigations, ["https://pay.example/checkout/42"]);
        assert_eq!(page.modal_state("payment"), Some(ModalState::Closed));
    }

    #[tokio::test]
    async fn ticket_without_link_does_not_redirect() {
        let mut page = landing_page();
        let transport = MockTransport::succeeding(json!({"FORM_TYPE": "ticket", "RK_LINK": ""}));
        let mut host = RecordingHost::default();
        click(&mut page, ".payment__open");
        type_into(&mut page, ".payment [name=\"phone\"]", "+7 (900) 000-00-00");
        let form = node(&page, ".payment form");

        page.submit(form, &transport, &mut host).await.unwrap();
        page.advance(FEEDBACK * 2, &mut host);
        assert!(host.navigations.is_empty());
    }

    async fn ticket_success_page(host: &mut RecordingHost) -> Page {
        let mut page = landing_page();
        let transport = MockTransport::succeeding(json!({
            "FORM_TYPE": "ticket",
            "RK_LINK": "https://pay.example/checkout/7"
        }));
        click(&mut page, ".payment__open");
        type_into(&mut page, ".payment [name=\"phone\"]", "+7 (900) 000-00-00");
        let form = node(&page, ".payment form");
        page.submit(form, &transport, host).await.unwrap();
        assert!(page.modal("payment").unwrap().redirect_timer().is_some());
        page
    }

    #[tokio::test]
    async fn escape_during_success_cancels_redirect() {
        let mut host = RecordingHost::default();
        let mut page = ticket_success_page(&mut host).await;

        page.advance(Duration::from_millis(500), &mut host);
        page.handle(DomEvent::KeyDown { key: Key::Escape });
        assert_eq!(page.modal_state("payment"), Some(ModalState::Closed));
        assert!(page.modal("payment").unwrap().redirect_timer().is_none());

        page.advance(FEEDBACK, &mut host);
        assert!(host.navigations.is_empty());
        assert!(page.next_timer_in().is_none());
    }

    #[tokio::test]
    async fn close_all_cancels_redirect() {
        let mut host = RecordingHost::default();
        let mut page = ticket_success_page(&mut host).await;

        page.close_all_modals();
        page.advance(FEEDBACK, &mut host);
        assert!(host.navigations.is_empty());
        assert_eq!(page.snapshot().pending_timers, 0);
    }

    #[test]
    fn late_ticket_reply_does_not_redirect() {
        let mut page = landing_page();
        let mut host = RecordingHost::default();
        click(&mut page, ".payment__open");
        type_into(&mut page, ".payment [name=\"phone\"]", "+7 (900) 000-00-00");
        let submission = click(&mut page, ".payment form button").submission.unwrap();
        page.handle(DomEvent::KeyDown { key: Key::Escape });

        let reply = SubmissionReply::from_value(json!({"FORM_TYPE": "ticket", "RK_LINK": "https://pay.example/x"}));
        let outcome = page.complete_submission(submission.id, Ok(reply), &mut host).unwrap();
        assert!(matches!(outcome, SubmissionOutcome::Success { redirect: None, .. }));
        page.advance(FEEDBACK, &mut host);
        assert!(host.navigations.is_empty());
    }

    #[tokio::test]
    async fn manual_close_cancels_feedback_timer() {
        let mut page = landing_page();
        let transport = MockTransport::succeeding(json!({}));
        let mut host = RecordingHost::default();
        click(&mut page, ".register__open");
        fill_register(&mut page);
        let form = node(&page, ".register form");
        page.submit(form, &transport, &mut host).await.unwrap();

        page.advance(Duration::from_millis(1000), &mut host);
        page.handle(DomEvent::KeyDown { key: Key::Escape });
        assert!(!page.document().has_class(form, "hide"));

        page.open_modal("register").unwrap();
        page.advance(FEEDBACK, &mut host);
        assert_eq!(page.modal_state("register"), Some(ModalState::Open));
        assert!(page.next_timer_in().is_none());
    }

    #[test]
    fn late_reply_skips_feedback_but_resets() {
        let mut page = landing_page();
        let mut host = RecordingHost::default();
        click(&mut page, ".register__open");
        fill_register(&mut page);
        let response = click(&mut page, ".register form button");
        assert!(response.default_prevented);
        let submission = response.submission.unwrap();

        page.handle(DomEvent::KeyDown { key: Key::Escape });
        let reply = SubmissionReply::from_value(json!({"FORM_TYPE": "register"}));
        let outcome = page.complete_submission(submission.id, Ok(reply), &mut host).unwrap();

        assert!(outcome.is_success());
        assert_eq!(page.modal_state("register"), Some(ModalState::Closed));
        let name = node(&page, ".register [name=\"name\"]");
        assert_eq!(page.document().value(name), "");
        assert_eq!(page.pending_submissions(), 0);
    }

    #[test]
    fn unknown_submission_rejected() {
        let mut page = landing_page();
        let mut host = RecordingHost::default();
        let result = page.complete_submission(Uuid::new_v4(), Ok(SubmissionReply::default()), &mut host);
        assert!(matches!(result, Err(CoreError::UnknownSubmission(_))));
    }

    #[test]
    fn typing_clears_marks_after_failed_submit() {
        let mut page = landing_page();
        click(&mut page, ".register__open");
        let blocked = click(&mut page, ".register form button");
        assert!(blocked.submission.is_none());
        assert_eq!(blocked.invalid_fields, 2);

        let name = node(&page, ".register [name=\"name\"]");
        assert!(page.document().has_class(name, "invalid"));
        type_into(&mut page, ".register [name=\"name\"]", "Ada");
        assert!(!page.document().has_class(name, "invalid"));
    }

    #[test]
    fn malformed_email_blocks_submit() {
        let mut page = landing_page();
        click(&mut page, ".register__open");
        type_into(&mut page, ".register [name=\"name\"]", "Ada");
        type_into(&mut page, ".register [name=\"email\"]", "ada@");
        let response = click(&mut page, ".register form button");

        assert!(response.submission.is_none());
        let email = node(&page, ".register [name=\"email\"]");
        assert_eq!(page.document().attr(email, "data-error"), Some("Поле заполнено некорректно"));
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut page = landing_page();
        click(&mut page, ".register__open");
        let snapshot = page.snapshot();
        assert!(snapshot.scroll_locked);
        assert_eq!(snapshot.overlays, 1);
        let register = snapshot.modals.iter().find(|m| m.name == "register").unwrap();
        assert_eq!(register.state, ModalState::Open);
    }
}
