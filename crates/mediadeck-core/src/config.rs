//! Centralized configuration for mediadeck.
//!
//! Compile-time limits live in the unit structs below; the runtime settings
//! a deployment chooses live in [`MediaDeckConfig`].

use crate::error::{MediaDeckError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Move queue and worker pool limits.
pub struct MoveConfig;

impl MoveConfig {
    pub const MIN_WORKERS: usize = 1;
    pub const DEFAULT_WORKERS: usize = 2;
    pub const MIN_QUEUE_CAPACITY: usize = 1;
    pub const DEFAULT_QUEUE_CAPACITY: usize = 10;
}

/// Assistant policy limits.
pub struct AssistantConfig;

impl AssistantConfig {
    pub const JOB_NAME: &'static str = "assistant";
    pub const MIN_SLEEP: Duration = Duration::from_secs(60);
    pub const DEFAULT_MAX_DOWNLOADING: usize = 5;
    pub const DEFAULT_MAX_MOVING: usize = 1;
}

/// Background refresh cadence.
pub struct RefreshConfig;

impl RefreshConfig {
    pub const REFRESH_JOB_NAME: &'static str = "refresh";
    pub const DISK_STATS_JOB_NAME: &'static str = "disk-stats";
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(300);
    pub const DEFAULT_DISK_STATS_INTERVAL: Duration = Duration::from_secs(300);
    pub const SERIES_LISTING_DEPTH: usize = 2;
    pub const CRON_HISTORY_CAP: usize = 1000;
}

/// Bounds for the message ring and the other batch-trimmed lists.
pub struct MessageConfig;

impl MessageConfig {
    /// Once a list grows past this many entries it is trimmed.
    pub const MAX_ENTRIES: usize = 5000;
    /// Number of newest entries kept by a trim.
    pub const TRIM_TO: usize = 4000;
}

/// Transmission RPC defaults.
pub struct TransmissionConfig;

impl TransmissionConfig {
    pub const DEFAULT_URL: &'static str = "http://127.0.0.1:9091/transmission/rpc";
    pub const SESSION_HEADER: &'static str = "X-Transmission-Session-Id";
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
}

/// Runtime assistant settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantSettings {
    /// Start the assistant loop enabled.
    pub enabled: bool,
    pub sleep_secs: u64,
    pub max_concurrent_downloading: usize,
    pub max_concurrent_moving: usize,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            sleep_secs: AssistantConfig::MIN_SLEEP.as_secs(),
            max_concurrent_downloading: AssistantConfig::DEFAULT_MAX_DOWNLOADING,
            max_concurrent_moving: AssistantConfig::DEFAULT_MAX_MOVING,
        }
    }
}

impl AssistantSettings {
    /// Tick interval, never below [`AssistantConfig::MIN_SLEEP`].
    pub fn sleep(&self) -> Duration {
        Duration::from_secs(self.sleep_secs).max(AssistantConfig::MIN_SLEEP)
    }
}

/// Transmission connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransmissionSettings {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for TransmissionSettings {
    fn default() -> Self {
        Self {
            url: TransmissionConfig::DEFAULT_URL.to_string(),
            username: None,
            password: None,
        }
    }
}

/// Runtime configuration, usually loaded from a JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaDeckConfig {
    /// Download directory that is scanned one level deep.
    pub source_dir: PathBuf,
    /// Directories movies can be moved into directly.
    pub movie_targets: Vec<PathBuf>,
    /// Series roots; their subdirectories are offered as targets too.
    pub series_targets: Vec<PathBuf>,
    /// Target preselected for newly discovered items.
    pub default_target: Option<PathBuf>,
    pub move_workers: usize,
    pub move_queue_capacity: usize,
    pub refresh_interval_secs: u64,
    pub disk_stats_interval_secs: u64,
    pub assistant: AssistantSettings,
    pub transmission: TransmissionSettings,
}

impl Default for MediaDeckConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::new(),
            movie_targets: Vec::new(),
            series_targets: Vec::new(),
            default_target: None,
            move_workers: MoveConfig::DEFAULT_WORKERS,
            move_queue_capacity: MoveConfig::DEFAULT_QUEUE_CAPACITY,
            refresh_interval_secs: RefreshConfig::DEFAULT_INTERVAL.as_secs(),
            disk_stats_interval_secs: RefreshConfig::DEFAULT_DISK_STATS_INTERVAL.as_secs(),
            assistant: AssistantSettings::default(),
            transmission: TransmissionSettings::default(),
        }
    }
}

impl MediaDeckConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| MediaDeckError::io_with_path(e, path))?;
        let config: Self = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// Check the settings that startup cannot do without.
    pub fn validate(&self) -> Result<()> {
        if self.source_dir.as_os_str().is_empty() {
            return Err(MediaDeckError::Config {
                message: "source_dir is required".to_string(),
            });
        }
        if self.movie_targets.is_empty() && self.series_targets.is_empty() {
            return Err(MediaDeckError::Config {
                message: "at least one movie or series target is required".to_string(),
            });
        }
        if let Some(default) = &self.default_target {
            let known = self.movie_targets.contains(default) || self.series_targets.contains(default);
            if !known {
                return Err(MediaDeckError::Config {
                    message: format!(
                        "default_target {} is not a configured movie or series target",
                        default.display()
                    ),
                });
            }
        }
        Ok(())
    }

    /// Copy with worker/queue floors applied.
    pub fn normalized(&self) -> Self {
        let mut config = self.clone();
        config.move_workers = config.move_workers.max(MoveConfig::MIN_WORKERS);
        config.move_queue_capacity = config
            .move_queue_capacity
            .max(MoveConfig::MIN_QUEUE_CAPACITY);
        config
    }

    /// Target preselected for new items: the configured default, else the
    /// first movie target, else the first series root.
    pub fn effective_default_target(&self) -> Option<PathBuf> {
        self.default_target
            .clone()
            .or_else(|| self.movie_targets.first().cloned())
            .or_else(|| self.series_targets.first().cloned())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn disk_stats_interval(&self) -> Duration {
        Duration::from_secs(self.disk_stats_interval_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MediaDeckConfig {
        MediaDeckConfig {
            source_dir: "/downloads".into(),
            movie_targets: vec!["/media/movies".into()],
            series_targets: vec!["/media/series".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_requires_source_dir() {
        let config = MediaDeckConfig {
            source_dir: PathBuf::new(),
            ..sample()
        };
        assert!(matches!(
            config.validate(),
            Err(MediaDeckError::Config { .. })
        ));
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_default_target() {
        let config = MediaDeckConfig {
            default_target: Some("/elsewhere".into()),
            ..sample()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_normalized_clamps_floors() {
        let config = MediaDeckConfig {
            move_workers: 0,
            move_queue_capacity: 0,
            ..sample()
        }
        .normalized();
        assert_eq!(config.move_workers, MoveConfig::MIN_WORKERS);
        assert_eq!(config.move_queue_capacity, MoveConfig::MIN_QUEUE_CAPACITY);
    }

    #[test]
    fn test_assistant_sleep_floor() {
        let settings = AssistantSettings {
            sleep_secs: 5,
            ..Default::default()
        };
        assert_eq!(settings.sleep(), AssistantConfig::MIN_SLEEP);
    }

    #[test]
    fn test_default_target_fallback() {
        assert_eq!(
            sample().effective_default_target(),
            Some(PathBuf::from("/media/movies"))
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: MediaDeckConfig = serde_json::from_str(
            r#"{"source_dir": "/dl", "movie_targets": ["/m"], "assistant": {"enabled": true}}"#,
        )
        .unwrap();
        assert_eq!(config.move_workers, MoveConfig::DEFAULT_WORKERS);
        assert!(config.assistant.enabled);
        assert_eq!(
            config.assistant.max_concurrent_moving,
            AssistantConfig::DEFAULT_MAX_MOVING
        );
    }
}
