//! Creates one grading form per student through a [`FormsApi`] provider.

use anyhow::{Result, anyhow};
use std::path::Path;
use tracing::{Instrument, error, info};

use crate::form_builder::{grading_questions, new_form};
use crate::parser::load_submission;
use crate::roster::{MISSING, Student};
use crate::services::forms_api::FormsApi;

/// Builds and publishes the form for one student, returning its responder link.
pub async fn publish_form<F: FormsApi + ?Sized>(
    api: &F,
    student: &Student,
    submissions_dir: &Path,
    instruction: &str,
    title: &str,
) -> Result<String> {
    let submission = load_submission(submissions_dir, student)?;
    let questions = grading_questions(instruction, &submission);

    let created = api.create_form(&new_form(title, student)).await?;
    api.batch_update(&created.form_id, &questions).await?;
    let form = api.get_form(&created.form_id).await?;

    form.responder_uri
        .ok_or_else(|| anyhow!("form {} has no responder link", created.form_id))
}

/// Totals for one form creation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishSummary {
    pub created: usize,
    pub missing: usize,
}

/// Publishes a form for every student, one after another.
///
/// A failure for one student is logged and recorded as the missing marker in
/// that student's `url`; the remaining students are still processed.
#[tracing::instrument(skip_all, fields(title = %title, students = students.len()))]
pub async fn create_forms<F: FormsApi + ?Sized>(
    api: &F,
    students: &mut [Student],
    submissions_dir: &Path,
    instruction: &str,
    title: &str,
) -> PublishSummary {
    let mut summary = PublishSummary::default();

    for student in students.iter_mut() {
        let span = tracing::info_span!("publish_form", student = student.id, handle = %student.handle);

        match publish_form(api, student, submissions_dir, instruction, title)
            .instrument(span.clone())
            .await
        {
            Ok(url) => {
                span.in_scope(|| info!(url = %url, "Form created"));
                student.url = Some(url);
                summary.created += 1;
            }
            Err(e) => {
                span.in_scope(|| error!(error = %format!("{e:#}"), "Form creation failed"));
                student.url = Some(MISSING.to_string());
                summary.missing += 1;
            }
        }
    }

    info!(created = summary.created, missing = summary.missing, "Form creation finished");
    summary
}
