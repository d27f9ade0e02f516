//! 表单提交流水线
//!
//! validation gate → payload → transport (host side) → feedback → optional redirect.
//! The page is never borrowed across the network call: [`FormPipeline::begin`]
//! hands out an owned [`FormSubmission`] and the reply is matched back through
//! its id.

use pagekit_transport::log_sanitizer::mask_value;
use pagekit_transport::{FormPayload, FormSubmission, SubmissionReply};

use super::validation::{ValidationGate, ValidationPlan, ValidationReport};
use crate::config::Messages;
use crate::dom::{Document, NodeId};
use crate::error::{CoreError, CoreResult};
use crate::traits::FormValidator;
use crate::types::ModalId;

/// Submission pipeline bound to one modal form
#[derive(Debug)]
pub struct FormPipeline {
    modal: ModalId,
    form: NodeId,
    plan: ValidationPlan,
    gate: ValidationGate,
    /// A pass has failed since the last successful submit; inputs revalidate live
    live: bool,
}

impl FormPipeline {
    pub fn new(doc: &Document, modal: ModalId, form: NodeId, messages: &Messages) -> Self {
        Self {
            modal,
            form,
            plan: ValidationPlan::for_form(doc, form, messages),
            gate: ValidationGate::default(),
            live: false,
        }
    }

    pub fn modal(&self) -> ModalId {
        self.modal
    }

    pub fn form(&self) -> NodeId {
        self.form
    }

    pub fn plan(&self) -> &ValidationPlan {
        &self.plan
    }

    /// Run a full pass, mark fields, and arm or disarm the gate
    pub fn validate(
        &mut self,
        doc: &mut Document,
        validator: &dyn FormValidator,
        invalid_class: &str,
    ) -> ValidationReport {
        let report = validator.validate(doc, &self.plan);
        report.apply(doc, &self.plan, invalid_class);
        self.gate.record(&report);
        self.live = !report.is_valid();
        if !report.is_valid() {
            log::debug!("[Submit] {} field(s) invalid", report.errors.len());
        }
        report
    }

    /// Re-check after an edit, once a failed pass has shown errors
    ///
    /// Only updates the marks; the gate is armed by submit-time passes alone.
    pub fn revalidate(&self, doc: &mut Document, validator: &dyn FormValidator, invalid_class: &str) {
        if self.live {
            validator
                .validate(doc, &self.plan)
                .apply(doc, &self.plan, invalid_class);
        }
    }

    /// Consume the gate and snapshot the form
    pub fn begin(&mut self, doc: &Document, failed_fields: usize) -> CoreResult<FormSubmission> {
        if !self.gate.consume() {
            return Err(CoreError::ValidationFailed(failed_fields));
        }
        let action = doc.attr(self.form, "action").unwrap_or_default().to_string();
        let payload = collect_payload(doc, self.form);
        for field in &payload {
            log::debug!("[Submit] {}: {}", field.name, mask_value(&field.value));
        }
        Ok(FormSubmission::new(action, payload))
    }
}

/// In-flight submission, keyed by [`FormSubmission::id`]
#[derive(Debug, Clone, Copy)]
pub struct PendingSubmission {
    pub modal: ModalId,
    pub form: NodeId,
}

/// Redirect target for a reply, if its form type asks for one
pub fn redirect_target(reply: &SubmissionReply, redirect_form_type: &str) -> Option<String> {
    reply.redirect_for(redirect_form_type).map(str::to_string)
}

/// `FormData` equivalent: named, enabled controls; checkboxes and radios only when checked
pub fn collect_payload(doc: &Document, form: NodeId) -> FormPayload {
    let mut payload = FormPayload::new();
    for node in doc.descendants(form) {
        let tag = doc.tag(node);
        if !matches!(tag, "input" | "select" | "textarea") || doc.has_attr(node, "disabled") {
            continue;
        }
        let Some(name) = doc.attr(node, "name").filter(|n| !n.is_empty()) else {
            continue;
        };
        let kind = doc.attr(node, "type").unwrap_or("text");
        if tag == "input" {
            match kind {
                "submit" | "button" | "reset" | "image" | "file" => continue,
                "checkbox" | "radio" => {
                    if !doc.checked(node) {
                        continue;
                    }
                    let value = doc.attr(node, "value").unwrap_or("on");
                    payload.push(name, value);
                    continue;
                }
                _ => {}
            }
        }
        payload.push(name, doc.value(node));
    }
    payload
}
