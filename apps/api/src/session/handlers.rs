use axum::{extract::State, Json};
use tracing::debug;

use crate::errors::AppError;
use crate::session::SessionSnapshot;
use crate::state::AppState;

/// GET /api/v1/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session.lock().await.snapshot())
}

/// POST /api/v1/session/reset
///
/// Back to Idle for a new analysis. Rejected while an analysis is in flight.
pub async fn handle_reset_session(
    State(state): State<AppState>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let mut session = state.session.lock().await;
    debug!(from = ?session.status(), "Resetting session");
    session.reset()?;
    Ok(Json(session.snapshot()))
}
