//! Analysis Client: one gap-analysis call to the AI service per submission.
//!
//! `AppState` holds an `Arc<dyn Analyzer>`; `GeminiAnalyzer` is the production backend.

use async_trait::async_trait;
use tracing::info;

use crate::analysis::encoder::{ContentKind, ResumeInput};
use crate::analysis::models::AnalysisVerdict;
use crate::analysis::prompts::{build_analysis_prompt, response_schema, RESUME_TEXT_PREFIX};
use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmClient, Part};

/// Fails with `AppError::Service` on any network, authentication, quota or
/// malformed-response condition. Never returns a partially populated verdict.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(
        &self,
        resume: &ResumeInput,
        job_description: &str,
    ) -> Result<AnalysisVerdict, AppError>;
}

pub struct GeminiAnalyzer(pub LlmClient);

#[async_trait]
impl Analyzer for GeminiAnalyzer {
    async fn analyze(
        &self,
        resume: &ResumeInput,
        job_description: &str,
    ) -> Result<AnalysisVerdict, AppError> {
        info!(
            kind = ?resume.content_kind,
            mime = %resume.mime_type,
            "Requesting résumé gap analysis"
        );

        self.0
            .call_json::<AnalysisVerdict>(
                build_parts(resume, job_description),
                JSON_ONLY_SYSTEM,
                response_schema(),
            )
            .await
            .map_err(|e| AppError::Service(e.to_string()))
    }
}

/// Instructions with the job description inlined, then the résumé as text or an inline blob.
pub fn build_parts(resume: &ResumeInput, job_description: &str) -> Vec<Part> {
    let instructions = Part::text(build_analysis_prompt(job_description));

    let resume_part = match resume.content_kind {
        ContentKind::BinaryDocument => Part::inline_data(&resume.mime_type, &resume.content),
        ContentKind::PlainText => Part::text(format!("{RESUME_TEXT_PREFIX}{}", resume.content)),
    };

    vec![instructions, resume_part]
}
