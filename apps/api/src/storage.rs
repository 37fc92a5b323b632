//! Process-wide key-value persistence: one `{key}.json` file per key.
//!
//! Reads are tolerant (absent, unreadable or malformed values come back as `None`),
//! writes replace the whole value atomically through a temp file in the same directory.

use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors produced when writing to the store. Reads never fail.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Atomic replace failed: {0}")]
    Persist(#[from] tempfile::PersistError),
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Platform data directory:
    /// - Linux:   `~/.local/share/resume-grader`
    /// - macOS:   `~/Library/Application Support/com.resume-grader.resume-grader`
    /// - Windows: `{FOLDERID_RoamingAppData}\resume-grader\resume-grader\data`
    pub fn default_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "resume-grader", "resume-grader")
            .map(|dirs| dirs.data_dir().to_path_buf())
    }

    /// Opens (or creates) the store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;

        info!(path = %dir.display(), "Key-value store initialized");
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for(key);
        let raw = match std::fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(key, error = %e, "Stored value unreadable, treating as absent");
                return None;
            }
        };

        match serde_json::from_slice(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Stored value malformed, treating as absent");
                None
            }
        }
    }

    pub fn put<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.path_for(key))?;

        debug!(key, size = bytes.len(), "Stored value");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        assert_eq!(store.get::<bool>("darkMode"), None);
    }

    #[test]
    fn test_put_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        store.put("darkMode", &true).unwrap();
        assert_eq!(store.get::<bool>("darkMode"), Some(true));
    }

    #[test]
    fn test_put_replaces_whole_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        store.put("list", &vec![1, 2, 3]).unwrap();
        store.put("list", &vec![9]).unwrap();
        assert_eq!(store.get::<Vec<u32>>("list"), Some(vec![9]));
    }

    #[test]
    fn test_malformed_value_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        std::fs::write(dir.path().join("list.json"), b"[1, 2,").unwrap();
        assert_eq!(store.get::<Vec<u32>>("list"), None);
    }

    #[test]
    fn test_shape_mismatch_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        store.put("darkMode", "yes").unwrap();
        assert_eq!(store.get::<bool>("darkMode"), None);
    }

    #[test]
    fn test_open_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        JsonFileStore::open(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_keys_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        store.put("darkMode", &false).unwrap();
        store.put("analysisHistory", &Vec::<u8>::new()).unwrap();
        assert_eq!(store.get::<bool>("darkMode"), Some(false));
        assert_eq!(store.get::<Vec<u8>>("analysisHistory"), Some(vec![]));
    }
}
