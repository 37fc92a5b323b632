use std::sync::Arc;

use tokio::sync::Mutex;

use crate::analysis::analyzer::Analyzer;
use crate::history::HistoryStore;
use crate::preferences::PreferenceStore;
use crate::session::Session;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable analysis backend. Default: GeminiAnalyzer.
    pub analyzer: Arc<dyn Analyzer>,
    pub history: Arc<Mutex<HistoryStore>>,
    /// Never held across the AI call.
    pub session: Arc<Mutex<Session>>,
    pub preferences: Arc<Mutex<PreferenceStore>>,
}

impl AppState {
    pub fn new(
        analyzer: Arc<dyn Analyzer>,
        history: HistoryStore,
        preferences: PreferenceStore,
    ) -> Self {
        Self {
            analyzer,
            history: Arc::new(Mutex::new(history)),
            session: Arc::new(Mutex::new(Session::default())),
            preferences: Arc::new(Mutex::new(preferences)),
        }
    }
}
