//! Form validation: rule plans, the default rule engine and the submit gate

use regex::Regex;
use serde::Serialize;

use crate::config::Messages;
use crate::dom::{Document, NodeId};
use crate::error::{CoreError, CoreResult};
use crate::traits::FormValidator;

const EMAIL_PATTERN: &str = r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    /// Non-blank value (checked, for checkboxes)
    Required,
    /// Well-formed address; blank passes
    Email,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub kind: RuleKind,
    pub message: String,
}

/// Rules of one field, evaluated in order; the first failure wins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRules {
    pub field: NodeId,
    pub rules: Vec<Rule>,
}

/// Validation plan of one form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationPlan {
    fields: Vec<FieldRules>,
}

impl ValidationPlan {
    /// Derive the plan from markup
    ///
    /// `[type="email"]` fields get `email` then `required`; other
    /// `[required]` fields get `required`.
    pub fn for_form(doc: &Document, form: NodeId, messages: &Messages) -> Self {
        let required = || Rule {
            kind: RuleKind::Required,
            message: messages.required.clone(),
        };
        let fields = doc
            .descendants(form)
            .into_iter()
            .filter_map(|node| {
                let rules = if doc.attr(node, "type") == Some("email") {
                    vec![
                        Rule {
                            kind: RuleKind::Email,
                            message: messages.email.clone(),
                        },
                        required(),
                    ]
                } else if doc.has_attr(node, "required") {
                    vec![required()]
                } else {
                    return None;
                };
                Some(FieldRules { field: node, rules })
            })
            .collect();
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldRules] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: NodeId) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: NodeId,
    pub message: String,
}

/// Result of one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_for(&self, field: NodeId) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Mark failing fields with `invalid_class` and `data-error`, clear the rest
    pub fn apply(&self, doc: &mut Document, plan: &ValidationPlan, invalid_class: &str) {
        for rules in plan.fields() {
            match self.error_for(rules.field) {
                Some(message) => {
                    doc.add_class(rules.field, invalid_class);
                    doc.set_attr(rules.field, "data-error", message);
                }
                None => {
                    doc.remove_class(rules.field, invalid_class);
                    doc.remove_attr(rules.field, "data-error");
                }
            }
        }
    }
}

/// Built-in `required` + `email` rule engine
#[derive(Debug, Clone)]
pub struct RuleValidator {
    email: Regex,
}

impl RuleValidator {
    pub fn new() -> CoreResult<Self> {
        let email = Regex::new(EMAIL_PATTERN)
            .map_err(|e| CoreError::ConfigError(format!("email pattern: {e}")))?;
        Ok(Self { email })
    }

    fn passes(&self, doc: &Document, field: NodeId, kind: RuleKind) -> bool {
        let checkable = matches!(doc.attr(field, "type"), Some("checkbox" | "radio"));
        match kind {
            RuleKind::Required if checkable => doc.checked(field),
            RuleKind::Required => !doc.value(field).trim().is_empty(),
            RuleKind::Email => {
                let value = doc.value(field).trim();
                value.is_empty() || self.email.is_match(value)
            }
        }
    }
}

impl FormValidator for RuleValidator {
    fn validate(&self, doc: &Document, plan: &ValidationPlan) -> ValidationReport {
        let errors = plan
            .fields()
            .iter()
            .filter_map(|rules| {
                rules
                    .rules
                    .iter()
                    .find(|rule| !self.passes(doc, rules.field, rule.kind))
                    .map(|rule| FieldError {
                        field: rules.field,
                        message: rule.message.clone(),
                    })
            })
            .collect();
        ValidationReport { errors }
    }
}

/// Edge-triggered submit gate
///
/// A fully successful validation pass arms it, a failed one disarms it, and
/// each armed state lets exactly one submission through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationGate {
    armed: bool,
}

impl ValidationGate {
    pub fn record(&mut self, report: &ValidationReport) {
        self.armed = report.is_valid();
    }

    pub fn is_armed(self) -> bool {
        self.armed
    }

    /// Take the pass; `true` at most once per successful validation
    pub fn consume(&mut self) -> bool {
        std::mem::take(&mut self.armed)
    }
}
