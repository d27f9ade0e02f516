//! 业务逻辑服务层

mod submission_service;
mod validation;

pub use submission_service::{collect_payload, redirect_target, FormPipeline, PendingSubmission};
pub use validation::{
    FieldError, FieldRules, Rule, RuleKind, RuleValidator, ValidationGate, ValidationPlan,
    ValidationReport,
};
