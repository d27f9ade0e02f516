use crate::dom::NodeId;
use crate::page::Page;
use crate::services::PendingSubmission;
use crate::types::EventResponse;

/// Validate the form and, when the gate lets it through, hand a submission to the host
pub fn submit(page: &mut Page, form: NodeId, response: &mut EventResponse) {
    let Some(index) = page.pipelines.iter().position(|p| p.form() == form) else {
        return;
    };
    let invalid = page.config.classes.invalid.clone();
    let pipeline = &mut page.pipelines[index];

    let report = pipeline.validate(&mut page.doc, page.validator.as_ref(), &invalid);
    match pipeline.begin(&page.doc, report.errors.len()) {
        Ok(submission) => {
            log::info!(
                "[Submit] {} -> {} ({} field(s))",
                submission.id,
                submission.action,
                submission.payload.len()
            );
            page.pending.insert(
                submission.id,
                PendingSubmission {
                    modal: pipeline.modal(),
                    form,
                },
            );
            response.submission = Some(submission);
        }
        Err(e) => {
            log::warn!("[Submit] blocked: {e}");
            response.invalid_fields = report.errors.len();
        }
    }
}

/// Live re-check of the pipeline form that contains `target`
pub fn revalidate_owner(page: &mut Page, target: NodeId) {
    let Some(pipeline) = page
        .pipelines
        .iter()
        .find(|p| page.doc.is_descendant_of(target, p.form()))
    else {
        return;
    };
    pipeline.revalidate(&mut page.doc, page.validator.as_ref(), &page.config.classes.invalid);
}
