//! Result Store: the newest-first log of past analyses.
//!
//! Loaded once at startup (absent or malformed data means an empty history) and
//! written back as a whole on every mutation. No versioning of the stored shape.

pub mod handlers;

use tracing::info;

use crate::analysis::models::AnalysisResult;
use crate::storage::{JsonFileStore, StoreError};

pub const HISTORY_KEY: &str = "analysisHistory";

pub struct HistoryStore {
    store: JsonFileStore,
    entries: Vec<AnalysisResult>,
}

impl HistoryStore {
    /// Never fails: unreadable or mismatched data is treated as no history.
    pub fn load(store: JsonFileStore) -> Self {
        let entries: Vec<AnalysisResult> = store.get(HISTORY_KEY).unwrap_or_default();
        info!(entries = entries.len(), "History loaded");
        Self { store, entries }
    }

    pub fn entries(&self) -> &[AnalysisResult] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn select(&self, index: usize) -> Option<&AnalysisResult> {
        self.entries.get(index)
    }

    /// Prepends `result` and persists the full list. On a write failure the entry
    /// stays in memory.
    pub fn record(&mut self, result: AnalysisResult) -> Result<(), StoreError> {
        self.entries.insert(0, result);
        self.flush()
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        self.flush()
    }

    fn flush(&self) -> Result<(), StoreError> {
        self.store.put(HISTORY_KEY, &self.entries)
    }
}
