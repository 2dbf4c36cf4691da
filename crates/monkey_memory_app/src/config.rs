//! Application configuration: TOML file, then environment, then CLI flags.

use std::path::Path;
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use monkey_memory::Difficulty;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Config file read from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "monkey_memory.toml";

/// Environment variable overriding the database path.
pub const ENV_DB_PATH: &str = "MONKEY_MEMORY_DB";
/// Environment variable selecting the remote stats API.
pub const ENV_API_URL: &str = "MONKEY_MEMORY_API_URL";
/// Environment variable overriding the reveal duration in milliseconds.
pub const ENV_REVEAL_MS: &str = "MONKEY_MEMORY_REVEAL_MS";

/// Runtime settings for the game front-end.
#[derive(Debug, Clone, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file holding profiles and local scores.
    db_path: String,

    /// Remote stats API root; local storage is used when absent.
    api_url: Option<String>,

    /// How long the sequence stays on display.
    reveal_ms: u64,

    /// Difficulty preselected on the game screen.
    default_difficulty: Difficulty,

    /// File the terminal UI writes its logs to.
    log_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: "monkey_memory.db".to_string(),
            api_url: None,
            reveal_ms: 2000,
            default_difficulty: Difficulty::default(),
            log_file: "monkey_memory.log".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(db_path = %config.db_path, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path`, or [`DEFAULT_CONFIG_FILE`] if present, then applies
    /// environment overrides.
    ///
    /// An explicit `path` must exist; the default file is optional.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a file or environment value is invalid.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => {
                debug!("No config file, using defaults");
                Self::default()
            }
        };
        base.apply_env(|key| std::env::var(key).ok())
    }

    /// Applies overrides looked up by environment variable name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the reveal duration is not a number.
    #[instrument(skip(self, lookup))]
    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(db_path) = lookup(ENV_DB_PATH) {
            debug!(db_path = %db_path, "Database path from environment");
            self.db_path = db_path;
        }
        if let Some(api_url) = lookup(ENV_API_URL) {
            debug!(api_url = %api_url, "API URL from environment");
            self.api_url = Some(api_url).filter(|url| !url.trim().is_empty());
        }
        if let Some(raw) = lookup(ENV_REVEAL_MS) {
            self.reveal_ms = raw.trim().parse().map_err(|_| {
                ConfigError::new(format!("{} must be milliseconds, got '{}'", ENV_REVEAL_MS, raw))
            })?;
        }
        Ok(self)
    }

    /// Reveal duration as a [`Duration`].
    pub fn reveal_duration(&self) -> Duration {
        Duration::from_millis(self.reveal_ms)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            db_path = "/tmp/scores.db"
            default_difficulty = "hard"
            "#,
        )
        .unwrap();
        assert_eq!(config.db_path(), "/tmp/scores.db");
        assert_eq!(*config.default_difficulty(), Difficulty::Hard);
        assert_eq!(*config.reveal_ms(), 2000);
        assert_eq!(config.api_url(), &None);
    }

    #[test]
    fn environment_overrides_file() {
        let vars = env(&[
            (ENV_DB_PATH, "env.db"),
            (ENV_API_URL, "http://localhost:8000/api"),
            (ENV_REVEAL_MS, "750"),
        ]);
        let config = AppConfig::default()
            .apply_env(|key| vars.get(key).cloned())
            .unwrap();
        assert_eq!(config.db_path(), "env.db");
        assert_eq!(config.api_url().as_deref(), Some("http://localhost:8000/api"));
        assert_eq!(config.reveal_duration(), Duration::from_millis(750));
    }

    #[test]
    fn blank_api_url_means_local() {
        let vars = env(&[(ENV_API_URL, "  ")]);
        let config = AppConfig::default()
            .with_api_url(Some("http://old".to_string()))
            .apply_env(|key| vars.get(key).cloned())
            .unwrap();
        assert_eq!(config.api_url(), &None);
    }

    #[test]
    fn bad_reveal_ms_is_rejected() {
        let vars = env(&[(ENV_REVEAL_MS, "soon")]);
        let err = AppConfig::default()
            .apply_env(|key| vars.get(key).cloned())
            .unwrap_err();
        assert!(err.message.contains(ENV_REVEAL_MS));
    }

    #[test]
    fn from_file_reads_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"reveal_ms = 1500\nlog_file = \"game.log\"\n").unwrap();
        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(*config.reveal_ms(), 1500);
        assert_eq!(config.log_file(), "game.log");
    }
}
