//! 表单校验抽象 Trait

use crate::dom::Document;
use crate::services::{ValidationPlan, ValidationReport};

/// Evaluates a form's validation plan against the current field values
///
/// The page marks failing fields itself; a validator only reports.
/// Default implementation: [`RuleValidator`](crate::services::RuleValidator).
pub trait FormValidator {
    fn validate(&self, doc: &Document, plan: &ValidationPlan) -> ValidationReport;
}
