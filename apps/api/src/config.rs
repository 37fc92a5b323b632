use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::storage::JsonFileStore;

/// Application configuration loaded from environment variables.
/// Fails at startup if the AI service key is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    /// Overrides the Gemini host (proxies, local stand-ins).
    pub gemini_api_base: Option<String>,
    pub data_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let data_dir = match std::env::var("DATA_DIR") {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => JsonFileStore::default_dir()
                .context("Could not determine a data directory; set DATA_DIR")?,
        };

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")
                .or_else(|_| require_env("API_KEY"))
                .context("Set GEMINI_API_KEY (or API_KEY) to the Gemini API key")?,
            gemini_api_base: std::env::var("GEMINI_API_BASE")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            data_dir,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
