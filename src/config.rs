//! Configuration for gesture-keys.

use crate::core::{FingerKeyMap, DEFAULT_REPEAT_INTERVAL, DEFAULT_TOUCH_THRESHOLD};
use crate::landmarks::ProviderOptions;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pinch distance in normalized frame units. Depends on the provider's
    /// normalization; recalibrate when switching providers.
    pub touch_threshold: f32,

    /// Period between repeated key-downs while a key is held
    #[serde(with = "duration_millis")]
    pub repeat_interval: Duration,

    pub key_map: FingerKeyMap,

    pub provider: ProviderOptions,

    pub video: VideoConfig,

    pub server: ServerSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            touch_threshold: DEFAULT_TOUCH_THRESHOLD,
            repeat_interval: DEFAULT_REPEAT_INTERVAL,
            key_map: FingerKeyMap::default(),
            provider: ProviderOptions::default(),
            video: VideoConfig::default(),
            server: ServerSettings::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, or defaults if absent.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let config_path = Self::config_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gesture-keys")
            .join("config.json")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.touch_threshold.is_finite() && self.touch_threshold > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "touch_threshold must be a positive number, got {}",
                self.touch_threshold
            )));
        }
        if self.repeat_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "repeat_interval must be greater than zero".to_string(),
            ));
        }
        if self.video.width == 0 || self.video.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "video size must be non-zero, got {}x{}",
                self.video.width, self.video.height
            )));
        }
        if !(self.video.fps.is_finite() && self.video.fps > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "video fps must be positive, got {}",
                self.video.fps
            )));
        }
        self.video.tick_period(1)?;
        self.provider
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }
}

/// Camera capture and overlay size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    pub width: usize,
    pub height: usize,
    pub fps: f64,
}

impl VideoConfig {
    /// Display tick period when each video frame spans `ticks_per_frame` ticks.
    pub fn tick_period(&self, ticks_per_frame: u32) -> Result<Duration, ConfigError> {
        let rate = self.fps * f64::from(ticks_per_frame.max(1));
        Duration::try_from_secs_f64(1.0 / rate).map_err(|e| {
            ConfigError::Invalid(format!("no tick period for {} fps: {e}", self.fps))
        })
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            fps: 30.0,
        }
    }
}

/// Static asset server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: IpAddr,
    pub port: u16,
    pub public_dir: PathBuf,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            public_dir: PathBuf::from("public"),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Serde support for Duration as whole milliseconds.
mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.touch_threshold, 0.05);
        assert_eq!(config.repeat_interval, Duration::from_millis(100));
        assert_eq!(config.key_map.len(), 4);
        assert_eq!(config.video.width, 256);
        assert_eq!(config.server.port, 3000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"touch_threshold": 0.08, "repeat_interval": 250}"#).unwrap();
        assert_eq!(config.touch_threshold, 0.08);
        assert_eq!(config.repeat_interval, Duration::from_millis(250));
        assert_eq!(config.provider.num_hands, 2);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = Config::default();
        config.touch_threshold = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.repeat_interval = Duration::ZERO;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.provider.min_hand_detection_confidence = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tick_period() {
        let video = VideoConfig::default();
        let period = video.tick_period(2).unwrap();
        assert!((period.as_secs_f64() - 1.0 / 60.0).abs() < 1e-9);
        assert_eq!(video.tick_period(0).unwrap(), video.tick_period(1).unwrap());

        let mut config = Config::default();
        config.video.fps = f64::MIN_POSITIVE / 4.0;
        assert!(matches!(
            config.video.tick_period(1),
            Err(ConfigError::Invalid(_))
        ));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.server.port = 8080;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse(_))));
    }
}
