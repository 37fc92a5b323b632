use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;

/// Client hint carrying the user agent's colour-scheme preference.
const COLOR_SCHEME_HINT: &str = "sec-ch-prefers-color-scheme";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemePreference {
    pub dark_mode: bool,
}

fn prefers_dark(headers: &HeaderMap) -> bool {
    headers
        .get(COLOR_SCHEME_HINT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().trim_matches('"').eq_ignore_ascii_case("dark"))
        .unwrap_or(false)
}

/// GET /api/v1/preferences/theme
pub async fn handle_get_theme(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<ThemePreference> {
    let dark_mode = state.preferences.lock().await.dark_mode(prefers_dark(&headers));
    Json(ThemePreference { dark_mode })
}

/// PUT /api/v1/preferences/theme
pub async fn handle_put_theme(
    State(state): State<AppState>,
    Json(body): Json<ThemePreference>,
) -> Result<Json<ThemePreference>, AppError> {
    state.preferences.lock().await.set_dark_mode(body.dark_mode)?;
    Ok(Json(body))
}

/// POST /api/v1/preferences/theme/toggle
pub async fn handle_toggle_theme(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ThemePreference>, AppError> {
    let dark_mode = state.preferences.lock().await.toggle(prefers_dark(&headers))?;
    Ok(Json(ThemePreference { dark_mode }))
}
