//! Configuration for the ABP feature pipeline.

use crate::error::{PipelineError, PipelineResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default per-sample interval of the source waveforms, in milliseconds.
pub const SAMPLE_INTERVAL_MS: i64 = 8;

/// MAP at or below this value marks a window as hypotensive (mmHg).
pub const HYPOTENSION_THRESHOLD_MMHG: f64 = 65.0;

/// Plausibility floor for the average systolic pressure of a window (mmHg).
/// Windows below it are sensor dropout or artifact, not physiology.
pub const MIN_PLAUSIBLE_SYS_MMHG: f64 = 30.0;

/// Plausibility floor for the average diastolic pressure of a window (mmHg).
pub const MIN_PLAUSIBLE_DIAS_MMHG: f64 = 10.0;

/// How many windows ahead the hypotension label looks.
pub const LABEL_HORIZON_WINDOWS: usize = 15;

/// Tunable parameters for one pipeline run.
///
/// Every recognized option is enumerated here and passed explicitly into the
/// stages that need it; nothing is read from ambient global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Length of each aggregation window, in seconds
    pub chunk_duration_secs: u64,

    /// Stride between consecutive windows, in seconds
    pub step_duration_secs: u64,

    /// Waveform channel to extract features from
    pub channel_name: String,

    /// How far back the lagged MAP feature looks, in minutes
    pub lookback_minutes: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_duration_secs: 30,
            step_duration_secs: 60,
            channel_name: "ABP".to_string(),
            lookback_minutes: 1.0,
        }
    }
}

impl PipelineConfig {
    /// Check parameter sanity before a run.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.chunk_duration_secs == 0 {
            return Err(PipelineError::Configuration(
                "chunk_duration_secs must be positive".to_string(),
            ));
        }
        if self.step_duration_secs == 0 {
            return Err(PipelineError::Configuration(
                "step_duration_secs must be positive".to_string(),
            ));
        }
        if !self.lookback_minutes.is_finite() || self.lookback_minutes <= 0.0 {
            return Err(PipelineError::Configuration(
                "lookback_minutes must be positive and finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from the default location, or defaults if absent.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::IoError(e.to_string()))?;
            let config: PipelineConfig = serde_json::from_str(&content)
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
            .join("abp-features")
            .join("config.json")
    }
}

/// Configuration file errors.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.chunk_duration_secs, 30);
        assert_eq!(config.step_duration_secs, 60);
        assert_eq!(config.channel_name, "ABP");
        assert_eq!(config.lookback_minutes, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_durations() {
        let config = PipelineConfig {
            chunk_duration_secs: 0,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PipelineError::Configuration(_))
        ));

        let config = PipelineConfig {
            step_duration_secs: 0,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_lookback() {
        let config = PipelineConfig {
            lookback_minutes: -1.0,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());

        let config = PipelineConfig {
            lookback_minutes: f64::NAN,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_roundtrip_json() {
        let config = PipelineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.chunk_duration_secs, config.chunk_duration_secs);
        assert_eq!(back.channel_name, config.channel_name);
    }
}
