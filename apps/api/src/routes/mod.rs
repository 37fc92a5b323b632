pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::history::handlers as history;
use crate::preferences::handlers as preferences;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis
        .route("/api/v1/analyses", post(analysis::handle_analyze))
        .route("/api/v1/session", get(session::handle_get_session))
        .route("/api/v1/session/reset", post(session::handle_reset_session))
        // History
        .route(
            "/api/v1/history",
            get(history::handle_list_history).delete(history::handle_clear_history),
        )
        .route(
            "/api/v1/history/:index",
            get(history::handle_select_history),
        )
        .route(
            "/api/v1/history/:index/show",
            post(history::handle_show_history),
        )
        // Preferences
        .route(
            "/api/v1/preferences/theme",
            get(preferences::handle_get_theme).put(preferences::handle_put_theme),
        )
        .route(
            "/api/v1/preferences/theme/toggle",
            post(preferences::handle_toggle_theme),
        )
        // Résumé uploads carry no size limit.
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}
