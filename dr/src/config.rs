//! Duty roster configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::{DEFAULT_DUTY_COUNT, DEFAULT_TRIGGER_HOUR};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Object storage backend
    pub storage: StorageConfig,

    /// Trigger defaults
    pub trigger: TriggerConfig,

    /// Roster defaults
    pub roster: RosterConfig,
}

impl Config {
    /// Validate configuration before use
    pub fn validate(&self) -> Result<()> {
        if self.trigger.default_hour > 23 {
            return Err(eyre::eyre!(
                "trigger.default-hour must be between 0 and 23, got {}",
                self.trigger.default_hour
            ));
        }
        if self.storage.bucket.is_empty() {
            return Err(eyre::eyre!("storage.bucket must not be empty"));
        }
        Ok(())
    }

    /// Resolve the bot configuration
    ///
    /// An explicit `--config` must load. Otherwise the first readable file of
    /// [`Config::search_paths`] wins, then the built-in defaults.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path)
                .context(format!("Failed to load duty roster config {}", path.display()));
        }

        for candidate in Self::search_paths() {
            if !candidate.is_file() {
                continue;
            }
            match Self::load_from_file(&candidate) {
                Ok(config) => return Ok(config),
                Err(e) => tracing::warn!(path = %candidate.display(), error = %e, "Skipping unusable duty roster config"),
            }
        }

        tracing::info!("No duty roster config found, using built-in storage and trigger defaults");
        Ok(Self::default())
    }

    /// Implicit config locations: working directory first, then the user config dir
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".dutyroster.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("dutyroster").join("dutyroster.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Config::load_from_file: called");
        let content = fs::read_to_string(path).context("Cannot read duty roster config")?;
        let config: Self = serde_yaml::from_str(&content).context("Malformed duty roster config")?;

        tracing::info!(path = %path.display(), bucket = %config.storage.bucket, "Using duty roster config");
        Ok(config)
    }
}

/// Which object store backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local map; state is lost on exit
    Memory,
    /// Directory tree under `storage.path`
    #[default]
    Fs,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// Base directory for the fs backend
    pub path: PathBuf,

    /// Container name; a subdirectory of `path` for the fs backend
    pub bucket: String,
}

impl StorageConfig {
    /// Directory the fs backend uses as its bucket
    pub fn bucket_path(&self) -> PathBuf {
        self.path.join(&self.bucket)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("dutyroster")
                .join("store"),
            bucket: "duty-bot-storage".to_string(),
        }
    }
}

/// Trigger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    /// Hour of day written into new triggers
    #[serde(rename = "default-hour")]
    pub default_hour: u8,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            default_hour: DEFAULT_TRIGGER_HOUR,
        }
    }
}

/// Roster configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// `dutyCount` written by `init`
    #[serde(rename = "default-duty-count")]
    pub default_duty_count: u32,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            default_duty_count: DEFAULT_DUTY_COUNT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.storage.backend, StorageBackend::Fs);
        assert_eq!(config.storage.bucket, "duty-bot-storage");
        assert_eq!(config.trigger.default_hour, 9);
        assert_eq!(config.roster.default_duty_count, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("dutyroster.yml");
        fs::write(
            &path,
            "storage:\n  backend: memory\ntrigger:\n  default-hour: 18\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.bucket, "duty-bot-storage");
        assert_eq!(config.trigger.default_hour, 18);
        assert_eq!(config.roster.default_duty_count, 1);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_malformed_explicit_file_names_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("dutyroster.yml");
        fs::write(&path, "storage: [not, a, map]\n").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed to load duty roster config"));
        assert!(err.to_string().contains("dutyroster.yml"));
        assert!(format!("{err:?}").contains("Malformed duty roster config"));
    }

    #[test]
    fn test_search_paths_start_in_working_dir() {
        let paths = Config::search_paths();
        assert_eq!(paths[0], PathBuf::from(".dutyroster.yml"));
        assert!(paths.iter().skip(1).all(|p| p.ends_with("dutyroster/dutyroster.yml")));
    }

    #[test]
    fn test_validate_rejects_bad_hour() {
        let mut config = Config::default();
        config.trigger.default_hour = 24;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bucket_path() {
        let config = StorageConfig {
            backend: StorageBackend::Fs,
            path: PathBuf::from("/var/lib/dr"),
            bucket: "chats".to_string(),
        };
        assert_eq!(config.bucket_path(), PathBuf::from("/var/lib/dr/chats"));
    }
}
