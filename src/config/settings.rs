//! Configuration settings for tokentray.

use crate::coordinator::CoordinatorOptions;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix of environment overrides, e.g. `TOKENTRAY_TICKER__TOKENS_LIMIT`.
const ENV_PREFIX: &str = "TOKENTRAY";

const STATE_FILE_NAME: &str = "selected-tokens.json";

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ticker behaviour.
    pub ticker: TickerConfig,
    /// Where the selection is kept.
    pub storage: StorageConfig,
    /// Log output.
    pub log: LogConfig,
}

impl Config {
    /// Layer defaults, the config file and the environment.
    ///
    /// A missing file is not an error.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = path.unwrap_or_else(default_config_path);
        tracing::debug!(path = %config_path.display(), "loading configuration");

        let defaults = config::Config::try_from(&Self::default()).map_err(config_error)?;

        config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::from(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|layered| layered.try_deserialize())
            .map_err(config_error)
    }

    /// Save configuration to file.
    pub fn save(&self, path: Option<PathBuf>) -> Result<PathBuf> {
        let config_path = path.unwrap_or_else(default_config_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))?;
        std::fs::write(&config_path, content)?;
        Ok(config_path)
    }

    /// Coordinator tunables derived from this configuration.
    pub fn coordinator_options(&self) -> CoordinatorOptions {
        CoordinatorOptions {
            blink: self.ticker.blink_on_update,
            tokens_limit: self.ticker.tokens_limit,
            ..CoordinatorOptions::default()
        }
    }
}

fn default_config_path() -> PathBuf {
    super::config_dir()
        .map(|p| p.join("config.toml"))
        .unwrap_or_else(|_| PathBuf::from("config.toml"))
}

fn config_error(e: config::ConfigError) -> Error {
    Error::config(e.to_string())
}

/// Ticker configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerConfig {
    /// Number of tokens offered in the menu.
    pub tokens_limit: usize,
    /// Blank the indicator briefly before every update.
    pub blink_on_update: bool,
    /// Milliseconds between refreshes.
    pub refresh_interval_ms: u64,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            tokens_limit: 20,
            blink_on_update: false,
            refresh_interval_ms: 5000,
        }
    }
}

impl TickerConfig {
    /// Refresh interval, never shorter than one millisecond.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms.max(1))
    }
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file holding the watched tokens and source.
    pub state_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_file: super::data_dir()
                .map(|p| p.join(STATE_FILE_NAME))
                .unwrap_or_else(|_| PathBuf::from(STATE_FILE_NAME)),
        }
    }
}

impl StorageConfig {
    /// The state file path.
    pub fn path(&self) -> &Path {
        &self.state_file
    }
}

/// Log configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is not set.
    pub filter: String,
    /// Directory of the rolling log files. Defaults to the data directory.
    pub directory: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "tokentray=info".to_string(),
            directory: None,
        }
    }
}

impl LogConfig {
    /// Directory the log files go to.
    pub fn directory(&self) -> PathBuf {
        self.directory
            .clone()
            .or_else(|| super::log_dir().ok())
            .unwrap_or_else(|| PathBuf::from("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.ticker.tokens_limit, 20);
        assert!(!config.ticker.blink_on_update);
        assert_eq!(config.ticker.refresh_interval(), Duration::from_secs(5));
        assert!(config.storage.path().ends_with(STATE_FILE_NAME));
        assert_eq!(config.log.filter, "tokentray=info");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.ticker, TickerConfig::default());
    }

    #[test]
    fn test_file_overrides_some_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[ticker]\ntokens_limit = 50\nrefresh_interval_ms = 1000\n\n[storage]\nstate_file = \"/tmp/watch.json\"\n",
        )
        .unwrap();

        let config = Config::load(Some(path)).unwrap();

        assert_eq!(config.ticker.tokens_limit, 50);
        assert_eq!(config.ticker.refresh_interval_ms, 1000);
        assert!(!config.ticker.blink_on_update);
        assert_eq!(config.storage.state_file, PathBuf::from("/tmp/watch.json"));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ticker\ntokens_limit = ").unwrap();

        let err = Config::load(Some(path)).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(err.exit_code(), 78);
    }

    #[test]
    fn test_saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.ticker.blink_on_update = true;
        config.ticker.tokens_limit = 7;

        let path = config.save(Some(dir.path().join("nested/config.toml"))).unwrap();
        assert_eq!(Config::load(Some(path)).unwrap().ticker, config.ticker);
    }

    #[test]
    fn test_coordinator_options() {
        let mut config = Config::default();
        config.ticker.blink_on_update = true;
        config.ticker.tokens_limit = 3;

        let options = config.coordinator_options();
        assert!(options.blink);
        assert_eq!(options.tokens_limit, 3);
        assert_eq!(options.catalog_attempts, 10);
    }
}
