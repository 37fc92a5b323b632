//! Axum route handlers for the History API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::analysis::models::AnalysisResult;
use crate::errors::AppError;
use crate::history::HistoryStore;
use crate::session::SessionSnapshot;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ClearQuery {
    #[serde(default)]
    pub confirm: bool,
}

/// GET /api/v1/history
///
/// Returns every past analysis, newest first.
pub async fn handle_list_history(State(state): State<AppState>) -> Json<Vec<AnalysisResult>> {
    Json(state.history.lock().await.entries().to_vec())
}

fn entry(history: &HistoryStore, index: usize) -> Result<AnalysisResult, AppError> {
    history
        .select(index)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("History entry {index} not found")))
}

/// GET /api/v1/history/:index
///
/// Returns one past analysis. Read-only.
pub async fn handle_select_history(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<AnalysisResult>, AppError> {
    let selected = entry(&*state.history.lock().await, index)?;
    Ok(Json(selected))
}

/// POST /api/v1/history/:index/show
///
/// Makes one past analysis the session's current result.
pub async fn handle_show_history(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let selected = entry(&*state.history.lock().await, index)?;

    let mut session = state.session.lock().await;
    session.show(selected)?;
    Ok(Json(session.snapshot()))
}

/// DELETE /api/v1/history?confirm=true
///
/// Clears the whole history. The caller must confirm explicitly.
pub async fn handle_clear_history(
    State(state): State<AppState>,
    Query(query): Query<ClearQuery>,
) -> Result<StatusCode, AppError> {
    if !query.confirm {
        return Err(AppError::Validation(
            "clearing history requires confirm=true".to_string(),
        ));
    }

    let mut history = state.history.lock().await;
    let cleared = history.len();
    history.clear()?;
    info!(cleared, "History cleared");

    Ok(StatusCode::NO_CONTENT)
}
