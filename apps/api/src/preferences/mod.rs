//! Theme preference, persisted under its own key independently of the history.

pub mod handlers;

use crate::storage::{JsonFileStore, StoreError};

pub const DARK_MODE_KEY: &str = "darkMode";

pub struct PreferenceStore {
    store: JsonFileStore,
}

impl PreferenceStore {
    pub fn new(store: JsonFileStore) -> Self {
        Self { store }
    }

    /// The stored flag, or `ambient_dark` when nothing (valid) is stored.
    pub fn dark_mode(&self, ambient_dark: bool) -> bool {
        self.store.get(DARK_MODE_KEY).unwrap_or(ambient_dark)
    }

    pub fn set_dark_mode(&self, dark_mode: bool) -> Result<(), StoreError> {
        self.store.put(DARK_MODE_KEY, &dark_mode)
    }

    pub fn toggle(&self, ambient_dark: bool) -> Result<bool, StoreError> {
        let next = !self.dark_mode(ambient_dark);
        self.set_dark_mode(next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_preference_follows_ambient() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = PreferenceStore::new(JsonFileStore::open(dir.path()).unwrap());
        assert!(prefs.dark_mode(true));
        assert!(!prefs.dark_mode(false));
    }

    #[test]
    fn test_stored_preference_overrides_ambient() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = PreferenceStore::new(JsonFileStore::open(dir.path()).unwrap());
        prefs.set_dark_mode(false).unwrap();
        assert!(!prefs.dark_mode(true));
    }

    #[test]
    fn test_toggle_persists() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = PreferenceStore::new(JsonFileStore::open(dir.path()).unwrap());
        assert!(prefs.toggle(false).unwrap());

        let reopened = PreferenceStore::new(JsonFileStore::open(dir.path()).unwrap());
        assert!(reopened.dark_mode(false));
    }

    #[test]
    fn test_malformed_preference_falls_back_to_ambient() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(format!("{DARK_MODE_KEY}.json")), b"maybe").unwrap();
        let prefs = PreferenceStore::new(JsonFileStore::open(dir.path()).unwrap());
        assert!(prefs.dark_mode(true));
    }
}
