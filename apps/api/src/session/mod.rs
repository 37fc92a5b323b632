//! Analysis session: the `Idle → Analyzing → Complete | Error` state machine the
//! presentation layer renders, plus the current result and error message.
//!
//! At most one analysis is in flight. `begin()` is the non-reentrant guard; the AI call
//! itself runs without holding the session lock.

pub mod handlers;

use serde::Serialize;

use crate::analysis::models::AnalysisResult;
use crate::errors::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisStatus {
    #[default]
    Idle,
    Analyzing,
    Complete,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub status: AnalysisStatus,
    pub result: Option<AnalysisResult>,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct Session {
    status: AnalysisStatus,
    result: Option<AnalysisResult>,
    error: Option<String>,
}

impl Session {
    pub fn status(&self) -> AnalysisStatus {
        self.status
    }

    fn ensure_not_analyzing(&self) -> Result<(), AppError> {
        if self.status == AnalysisStatus::Analyzing {
            return Err(AppError::Conflict(
                "an analysis is already in progress".to_string(),
            ));
        }
        Ok(())
    }

    pub fn begin(&mut self) -> Result<(), AppError> {
        self.ensure_not_analyzing()?;
        self.status = AnalysisStatus::Analyzing;
        self.result = None;
        self.error = None;
        Ok(())
    }

    pub fn complete(&mut self, result: AnalysisResult) {
        self.status = AnalysisStatus::Complete;
        self.result = Some(result);
        self.error = None;
    }

    pub fn fail(&mut self, message: String) {
        self.status = AnalysisStatus::Error;
        self.result = None;
        self.error = Some(message);
    }

    /// Displays a past result (e.g. picked from history).
    pub fn show(&mut self, result: AnalysisResult) -> Result<(), AppError> {
        self.ensure_not_analyzing()?;
        self.complete(result);
        Ok(())
    }

    pub fn reset(&mut self) -> Result<(), AppError> {
        self.ensure_not_analyzing()?;
        *self = Session::default();
        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            result: self.result.clone(),
            error: self.error.clone(),
        }
    }
}
