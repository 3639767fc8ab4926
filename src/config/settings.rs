//! User configuration settings
//!
//! Layered configuration: defaults → config file → environment variables

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Error, Result};

/// Environment variable prefix (`GITDECK_TICK_RATE_MS`, `GITDECK_LIMITS__MAX_FILES`)
pub const ENV_PREFIX: &str = "GITDECK_";

/// Caps on the entity lists and content views.
///
/// Lists are dynamically sized; these bound the render and parse cost.
/// Anything past a cap is dropped and logged at debug level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum changed files tracked
    pub max_files: usize,
    /// Commits requested from `git log`
    pub max_commits: usize,
    /// Maximum local branches tracked
    pub max_branches: usize,
    /// Maximum stashes tracked
    pub max_stashes: usize,
    /// Maximum lines held by the content panel
    pub max_content_lines: usize,
    /// Lines shown for a file git does not know about
    pub untracked_preview_lines: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_files: 100,
            max_commits: 50,
            max_branches: 100,
            max_stashes: 100,
            max_content_lines: 2000,
            untracked_preview_lines: 50,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Main loop tick in milliseconds
    pub tick_rate_ms: u64,

    /// Seconds between background fetches (0 = disabled)
    pub fetch_interval_secs: u64,

    /// Poll cadence while a push/pull worker runs, in milliseconds
    pub worker_poll_ms: u64,

    /// Timeout for synchronous git invocations, in seconds
    pub command_timeout_secs: u64,

    /// List and content caps
    pub limits: Limits,

    /// Enable debug logging
    pub debug: bool,

    /// Log file path (defaults to a file in the temp directory)
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate_ms: 20,
            fetch_interval_secs: 30,
            worker_poll_ms: 100,
            command_timeout_secs: 15,
            limits: Limits::default(),
            debug: false,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from all sources
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration using an explicit config file
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.tick_rate_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "tick_rate_ms".to_string(),
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }
        if self.worker_poll_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "worker_poll_ms".to_string(),
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Resolve the log file path
    pub fn log_file_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("gitdeck.log"))
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    pub fn worker_poll_interval(&self) -> Duration {
        Duration::from_millis(self.worker_poll_ms)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    /// Background fetch period, `None` when disabled
    pub fn fetch_interval(&self) -> Option<Duration> {
        (self.fetch_interval_secs > 0).then(|| Duration::from_secs(self.fetch_interval_secs))
    }

    /// Save current configuration to file
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_file_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save current configuration to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|_e| {
                Error::Config(ConfigError::DirectoryCreationFailed(parent.to_path_buf()))
            })?;
        }

        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        std::fs::write(config_path, toml).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("com", "gitdeck", "gitdeck").ok_or_else(|| {
            Error::Config(ConfigError::LoadFailed(
                "Could not determine home directory".to_string(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tick_rate_ms, 20);
        assert_eq!(config.fetch_interval_secs, 30);
        assert_eq!(config.worker_poll_ms, 100);
        assert_eq!(config.limits.untracked_preview_lines, 50);
        assert_eq!(config.limits.max_files, 100);
        assert_eq!(config.fetch_interval(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("tick_rate_ms"));
        assert!(toml.contains("[limits]"));
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "fetch_interval_secs = 0\n[limits]\nmax_commits = 10\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.fetch_interval(), None);
        assert_eq!(config.limits.max_commits, 10);
        // untouched keys keep their defaults
        assert_eq!(config.limits.max_stashes, 100);
        assert_eq!(config.tick_rate_ms, 20);
    }

    #[test]
    fn test_zero_tick_rate_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "tick_rate_ms = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("tick_rate_ms"));
    }

    #[test]
    fn test_save_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.worker_poll_ms = 250;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.worker_poll_ms, 250);
    }
}
