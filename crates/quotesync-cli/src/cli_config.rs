//! Persistent CLI settings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use quotesync_core::config::SyncConfig;
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "cli-config.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CliConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub sync_interval_secs: Option<u64>,
    #[serde(default)]
    pub network_delay_ms: Option<u64>,
    #[serde(default)]
    pub connected: Option<bool>,
}

const fn default_config_version() -> u32 {
    1
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("quotesync")
        .join(CONFIG_FILE_NAME)
}

impl CliConfig {
    pub fn load() -> Result<Self, String> {
        Self::load_from_path(&default_config_path())
    }

    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|error| format!("Failed to read config at {}: {}", path.display(), error))?;
        let mut config = serde_json::from_str::<Self>(&raw)
            .map_err(|error| format!("Failed to parse config at {}: {}", path.display(), error))?;
        config.normalize();
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf, String> {
        let path = default_config_path();
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    error
                )
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)
            .map_err(|error| format!("Failed to serialize config: {error}"))?;
        std::fs::write(path, serialized)
            .map_err(|error| format!("Failed to write config at {}: {}", path.display(), error))
    }

    /// Effective sync settings: stored values over the library defaults
    pub fn sync_config(&self) -> SyncConfig {
        let mut config = SyncConfig::default();
        if let Some(secs) = self.sync_interval_secs {
            config = config.with_interval(Duration::from_secs(secs));
        }
        if let Some(ms) = self.network_delay_ms {
            config = config.with_network_delay(Duration::from_millis(ms));
        }
        if self.connected == Some(false) {
            config = config.offline();
        }
        config
    }

    // A zero interval would make `tokio::time::interval` panic.
    fn normalize(&mut self) {
        if self.sync_interval_secs == Some(0) {
            self.sync_interval_secs = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;

    fn temp_config_path() -> PathBuf {
        static NEXT_CONFIG_ID: AtomicU64 = AtomicU64::new(0);

        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |duration| duration.as_nanos());
        let sequence = NEXT_CONFIG_ID.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!(
            "quotesync-cli-config-test-{timestamp}-{sequence}.json"
        ))
    }

    #[test]
    fn missing_file_loads_defaults() {
        let loaded = CliConfig::load_from_path(&temp_config_path()).unwrap();
        assert_eq!(loaded, CliConfig::default());
        assert_eq!(loaded.sync_config(), SyncConfig::default());
    }

    #[test]
    fn config_roundtrip_preserves_settings() {
        let path = temp_config_path();
        let config = CliConfig {
            version: 1,
            sync_interval_secs: Some(5),
            network_delay_ms: Some(250),
            connected: Some(false),
        };

        config.save_to_path(&path).unwrap();
        let loaded = CliConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded, config);

        let sync = loaded.sync_config();
        assert_eq!(sync.interval, Duration::from_secs(5));
        assert_eq!(sync.network_delay, Duration::from_millis(250));
        assert!(!sync.connected);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn zero_interval_falls_back_to_default() {
        let path = temp_config_path();
        std::fs::write(&path, r#"{"syncIntervalSecs": 0}"#).unwrap();

        let loaded = CliConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded.sync_interval_secs, None);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn unreadable_config_is_an_error() {
        let path = temp_config_path();
        std::fs::write(&path, "{not json").unwrap();

        assert!(CliConfig::load_from_path(&path).is_err());

        let _ = std::fs::remove_file(path);
    }
}
