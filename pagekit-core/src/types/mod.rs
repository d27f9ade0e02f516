//! 类型定义模块

mod event;
mod ids;
mod outcome;

pub use event::{ChangeEvent, DomEvent, Key};
pub use ids::{DropdownId, ModalId};
pub use outcome::{EventResponse, ModalSnapshot, PageSnapshot, SubmissionOutcome};

// Re-export transport 库的公共类型
pub use pagekit_transport::{FormField, FormPayload, FormSubmission, SubmissionReply};
