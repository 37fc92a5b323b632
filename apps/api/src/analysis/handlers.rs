//! Axum route handlers for the Analysis API.

use axum::{
    extract::{multipart::Field, Multipart, State},
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::analysis::encoder::{ResumeDraft, ResumeInput};
use crate::analysis::models::{guess_job_title, AnalysisResult};
use crate::errors::AppError;
use crate::state::AppState;

/// Form fields of a submission, applied in the order they arrive.
#[derive(Debug, Default)]
struct Submission {
    job_description: String,
    resume: ResumeDraft,
}

impl Submission {
    /// Rejects the submission before any network call when either half is missing.
    fn validate(self) -> Result<(ResumeInput, String), AppError> {
        if self.job_description.trim().is_empty() {
            return Err(AppError::Validation(
                "job description cannot be empty".to_string(),
            ));
        }

        let resume = self
            .resume
            .into_input()
            .ok_or_else(|| AppError::Validation("no résumé content provided".to_string()))?;

        Ok((resume, self.job_description))
    }
}

fn form_error(e: impl std::fmt::Display) -> AppError {
    AppError::Validation(format!("invalid form data: {e}"))
}

async fn field_text(field: Field<'_>) -> Result<String, AppError> {
    field.text().await.map_err(form_error)
}

async fn read_submission(multipart: &mut Multipart) -> Result<Submission, AppError> {
    let mut submission = Submission::default();

    while let Some(field) = multipart.next_field().await.map_err(form_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_description" => submission.job_description = field_text(field).await?,
            "resume_text" => {
                let text = field_text(field).await?;
                // Blank text inputs ride along with uploads in most forms. Whitespace is
                // still typed content and replaces an earlier upload.
                if !text.is_empty() {
                    submission.resume.type_text(text);
                }
            }
            "resume_file" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data: Bytes = field.bytes().await.map_err(form_error)?;
                if !data.is_empty() {
                    submission
                        .resume
                        .upload(file_name, content_type.as_deref(), &data);
                }
            }
            other => debug!("Ignoring unknown form field '{other}'"),
        }
    }

    debug!(
        kind = ?submission.resume.content_kind(),
        file = ?submission.resume.file_name(),
        "Submission received"
    );
    Ok(submission)
}

/// Runs the in-flight part of an analysis: AI call, history, session.
/// Always leaves the session out of `Analyzing`.
async fn run_analysis(
    state: AppState,
    resume: ResumeInput,
    job_description: String,
) -> Result<AnalysisResult, AppError> {
    let verdict = match state.analyzer.analyze(&resume, &job_description).await {
        Ok(verdict) => verdict,
        Err(e) => {
            let message = match &e {
                AppError::Service(msg) => msg.clone(),
                other => other.to_string(),
            };
            state.session.lock().await.fail(message);
            return Err(e);
        }
    };

    let result = verdict.into_result(
        guess_job_title(&job_description),
        Utc::now().timestamp_millis(),
    );
    info!(
        score = result.score,
        level = result.match_level.as_str(),
        "Analysis complete"
    );

    if let Err(e) = state.history.lock().await.record(result.clone()) {
        warn!("History could not be persisted, keeping it in memory: {e}");
    }
    state.session.lock().await.complete(result.clone());

    Ok(result)
}

/// POST /api/v1/analyses
///
/// Multipart form: `job_description`, plus `resume_text` and/or `resume_file`.
/// Runs one gap analysis, records it in history and returns it.
///
/// The analysis runs on its own task, so a client that disconnects mid-call
/// does not strand the session in `Analyzing`.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    let (resume, job_description) = read_submission(&mut multipart).await?.validate()?;

    state.session.lock().await.begin()?;

    let task = tokio::spawn(run_analysis(state.clone(), resume, job_description));
    match task.await {
        Ok(result) => result.map(Json),
        Err(e) => {
            error!("Analysis task aborted: {e}");
            state
                .session
                .lock()
                .await
                .fail("analysis was interrupted".to_string());
            Err(AppError::Internal(anyhow::anyhow!("analysis task aborted: {e}")))
        }
    }
}
