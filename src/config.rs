//! Configuration for the motionlog agent.

use crate::collector::types::SensorKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration for the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Duration of each aggregation window
    #[serde(with = "duration_serde")]
    pub window_duration: Duration,

    /// Which sensor kinds to ingest
    pub sources: SourceConfig,

    /// Append-only CSV log destination
    pub log_path: PathBuf,

    /// Path for storing state and session stats
    pub data_path: PathBuf,

    /// Whether collection is currently paused
    pub paused: bool,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("motionlog");

        Self {
            window_duration: Duration::from_secs(1),
            sources: SourceConfig::default(),
            log_path: data_dir.join("sensor_log.csv"),
            data_path: data_dir,
            paused: false,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::IoError(e.to_string()))?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(&config_path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("motionlog")
            .join("config.json")
    }

    /// Ensure all required directories exist.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.data_path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        if let Some(parent) = self.log_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }
        Ok(())
    }
}

/// Which sensor kinds the host provides and the agent should ingest.
///
/// A kind disabled here is treated as absent: pushes for it are rejected
/// and its window channel stays empty, so its averages are always zero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SourceConfig {
    pub accelerometer: bool,
    pub gyroscope: bool,
    pub magnetometer: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            accelerometer: true,
            gyroscope: true,
            magnetometer: true,
        }
    }
}

impl SourceConfig {
    /// Parse source configuration from a comma-separated string.
    pub fn from_csv(s: &str) -> Self {
        let sources: Vec<String> = s.split(',').map(|s| s.trim().to_lowercase()).collect();

        Self {
            accelerometer: sources.iter().any(|s| s == "accelerometer" || s == "all"),
            gyroscope: sources.iter().any(|s| s == "gyroscope" || s == "all"),
            magnetometer: sources.iter().any(|s| s == "magnetometer" || s == "all"),
        }
    }

    /// Whether a given sensor kind is enabled.
    pub fn enabled(&self, kind: SensorKind) -> bool {
        match kind {
            SensorKind::Accelerometer => self.accelerometer,
            SensorKind::Gyroscope => self.gyroscope,
            SensorKind::Magnetometer => self.magnetometer,
        }
    }

    /// Check if at least one source is enabled.
    pub fn any_enabled(&self) -> bool {
        self.accelerometer || self.gyroscope || self.magnetometer
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Serde support for Duration.
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_config_parsing() {
        let config = SourceConfig::from_csv("accelerometer,gyroscope");
        assert!(config.accelerometer);
        assert!(config.gyroscope);
        assert!(!config.magnetometer);

        let config = SourceConfig::from_csv("magnetometer");
        assert!(!config.accelerometer);
        assert!(config.magnetometer);

        let config = SourceConfig::from_csv("all");
        assert!(config.accelerometer);
        assert!(config.gyroscope);
        assert!(config.magnetometer);
    }

    #[test]
    fn test_source_config_enabled_by_kind() {
        let config = SourceConfig::from_csv("gyroscope");
        assert!(!config.enabled(SensorKind::Accelerometer));
        assert!(config.enabled(SensorKind::Gyroscope));
        assert!(config.any_enabled());

        let none = SourceConfig::from_csv("");
        assert!(!none.any_enabled());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.window_duration, Duration::from_secs(1));
        assert!(config.sources.accelerometer);
        assert!(config.sources.magnetometer);
        assert!(!config.paused);
        assert!(config.log_path.ends_with("sensor_log.csv"));
    }
}
