use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON5 parse error: {0}")]
    Json5(#[from] json5::Error),
    #[error("Config directory not found")]
    NoDirFound,
}

/// Polling behavior for long-running server tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollSettings {
    /// Seconds between status polls.
    #[serde(default = "default_poll_interval_secs")]
    pub interval_secs: u64,
    /// Polling stops with an error after this many status requests.
    #[serde(default = "default_poll_max_attempts")]
    pub max_attempts: u32,
}

fn default_poll_interval_secs() -> u64 {
    3
}

fn default_poll_max_attempts() -> u32 {
    100
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval_secs(),
            max_attempts: default_poll_max_attempts(),
        }
    }
}

/// Dev reload watcher settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchSettings {
    /// Directory to watch.
    #[serde(default = "default_watch_path")]
    pub path: String,
    /// Shell command to run on each change batch.
    #[serde(default = "default_watch_command")]
    pub command: String,
    /// Regex patterns for paths to ignore.
    #[serde(default = "default_watch_ignore")]
    pub ignore: Vec<String>,
}

fn default_watch_path() -> String {
    ".".to_string()
}

fn default_watch_command() -> String {
    "nginx -s reload".to_string()
}

fn default_watch_ignore() -> Vec<String> {
    vec!["node_modules".to_string()]
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            path: default_watch_path(),
            command: default_watch_command(),
            ignore: default_watch_ignore(),
        }
    }
}

/// Top-level medox configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedoxConfig {
    /// Base origin of the medox API server.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub poll: PollSettings,
    #[serde(default)]
    pub watch: WatchSettings,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for MedoxConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            poll: PollSettings::default(),
            watch: WatchSettings::default(),
        }
    }
}

/// Resolve the medox config directory (~/.medox/).
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|h| h.join(".medox"))
        .ok_or(ConfigError::NoDirFound)
}

/// Resolve the config file path (~/.medox/config.json5).
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.json5"))
}

/// Resolve the stored API key path (~/.medox/api_key.json).
pub fn key_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("api_key.json"))
}

/// Load configuration from the default path, falling back to defaults.
///
/// `MEDOX_BASE_URL` overrides the configured base URL.
pub fn load_config() -> Result<MedoxConfig, ConfigError> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let path = config_file_path()?;
    let mut config = load_config_from(&path)?;
    if let Ok(base_url) = std::env::var("MEDOX_BASE_URL") {
        config.base_url = base_url;
    }
    Ok(config)
}

/// Load configuration from a specific path, falling back to defaults if not found.
pub fn load_config_from(path: &Path) -> Result<MedoxConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("Config file not found at {}, using defaults", path.display());
        return Ok(MedoxConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: MedoxConfig = json5::from_str(&content)?;
    Ok(config)
}

/// Ensure the config directory exists.
pub fn ensure_config_dir() -> Result<PathBuf, ConfigError> {
    let dir = config_dir()?;
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MedoxConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.poll.interval_secs, 3);
        assert_eq!(config.poll.max_attempts, 100);
        assert_eq!(config.watch.ignore, vec!["node_modules".to_string()]);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("missing.json5")).unwrap();
        assert_eq!(config.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json5");
        std::fs::write(&path, r#"{ base_url: "https://api.example.com" }"#).unwrap();
        let config = load_config_from(&path).unwrap();
        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.poll.interval_secs, 3);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json5");
        std::fs::write(&path, "{ base_url: ").unwrap();
        assert!(load_config_from(&path).is_err());
    }
}
