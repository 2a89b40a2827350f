//! Tracker Configuration
//!
//! Thresholds and goals for both detectors. Can be loaded from a JSON file
//! or built at runtime; every field falls back to its default when omitted.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::angle_threshold::AngleThresholdConfig;
use crate::error::ConfigError;
use crate::motion_spike::MotionSpikeConfig;
use crate::session::DEFAULT_CAP;

// ============================================================================
// TRACKER CONFIG
// ============================================================================

/// Configuration for a full tracker (one push-up and one squat session).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Push-up spike detection parameters
    pub motion: MotionSpikeConfig,
    /// Squat knee-angle parameters
    pub squat: AngleThresholdConfig,
    /// Push-up goal
    pub pushup_cap: u32,
    /// Squat goal
    pub squat_cap: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            motion: MotionSpikeConfig::default(),
            squat: AngleThresholdConfig::default(),
            pushup_cap: DEFAULT_CAP,
            squat_cap: DEFAULT_CAP,
        }
    }
}

impl TrackerConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        log::debug!("Loaded tracker config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.motion.validate()?;
        self.squat.validate()?;
        if self.pushup_cap == 0 || self.squat_cap == 0 {
            return Err(ConfigError::Invalid(
                "repetition goals must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = TrackerConfig::default();
        assert_eq!(config.motion.threshold, 15.0);
        assert_eq!(config.motion.cooldown_ms, 500);
        assert_eq!(config.squat.down_threshold_deg, 70.0);
        assert_eq!(config.squat.up_threshold_deg, 110.0);
        assert_eq!(config.pushup_cap, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            TrackerConfig::from_json_str(r#"{"squat":{"down_threshold_deg":90.0,"side":"right"},"squat_cap":20}"#)
                .unwrap();
        assert_eq!(config.squat.down_threshold_deg, 90.0);
        assert_eq!(config.squat.up_threshold_deg, 110.0);
        assert_eq!(config.squat.side, Side::Right);
        assert_eq!(config.squat_cap, 20);
        assert_eq!(config.motion, MotionSpikeConfig::default());
    }

    #[test]
    fn test_rejects_inverted_band() {
        let err = TrackerConfig::from_json_str(
            r#"{"squat":{"down_threshold_deg":120.0,"up_threshold_deg":100.0}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_zero_cap() {
        let err = TrackerConfig::from_json_str(r#"{"squat_cap":0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_negative_motion_threshold() {
        let err = TrackerConfig::from_json_str(r#"{"motion":{"threshold":-3.0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = TrackerConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"motion":{{"threshold":12.5}}}}"#).unwrap();

        let config = TrackerConfig::load(file.path()).unwrap();
        assert_eq!(config.motion.threshold, 12.5);
        assert_eq!(config.motion.cooldown_ms, 500);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TrackerConfig::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = TrackerConfig {
            squat: AngleThresholdConfig::knee_down_90(),
            ..Default::default()
        };
        let json = config.to_json_pretty().unwrap();
        assert_eq!(TrackerConfig::from_json_str(&json).unwrap(), config);
    }
}
