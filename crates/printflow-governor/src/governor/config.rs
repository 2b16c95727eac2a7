//! Governor configuration
//!
//! Read-only from the governor's perspective: the host application owns
//! the settings store and pushes refreshed values through
//! `FlowGovernor::apply_config`. JSON persistence helpers are provided for
//! hosts without their own settings layer.

use printflow_core::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tunable governor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernorConfig {
    /// Whether the governor may widen the send window at all.
    pub enabled: bool,
    /// Minimum seconds between extra send permissions.
    pub min_grant_interval_secs: f64,
    /// Inflight target used during bulk file transfers instead of the
    /// calibrated profile target.
    pub transfer_inflight_target: u16,
    /// Command that puts the stream into the stopping drain.
    pub stop_command: String,
    /// Line number the print must pass before governing starts.
    pub start_after_line: u32,
    /// Z height the print must reach before governing starts.
    pub start_after_z: f64,
    /// Prefix marking queue-draining commands; empty disables sync
    /// detection.
    pub sync_command_prefix: String,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_grant_interval_secs: 0.1,
            transfer_inflight_target: 4,
            stop_command: "M31".to_string(),
            start_after_line: 50,
            start_after_z: 0.0,
            sync_command_prefix: "M".to_string(),
        }
    }
}

impl GovernorConfig {
    /// Minimum grant interval as a `Duration`
    pub fn min_grant_interval(&self) -> Duration {
        Duration::from_secs_f64(self.min_grant_interval_secs.max(0.0))
    }

    /// Validate field ranges
    pub fn validate(&self) -> Result<()> {
        if !self.min_grant_interval_secs.is_finite() || self.min_grant_interval_secs < 0.0 {
            return Err(ConfigError::InvalidValue {
                setting: "min_grant_interval_secs".to_string(),
                reason: format!("{} is not a non-negative duration", self.min_grant_interval_secs),
            }
            .into());
        }
        if !self.start_after_z.is_finite() {
            return Err(ConfigError::InvalidValue {
                setting: "start_after_z".to_string(),
                reason: "must be finite".to_string(),
            }
            .into());
        }
        if self.stop_command.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                setting: "stop_command".to_string(),
                reason: "must not be empty".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Load settings from a JSON file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::File {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Save settings to a JSON file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Parse)?;
        std::fs::write(path, content).map_err(|source| ConfigError::File {
            path: path.display().to_string(),
            source,
        })?;
        Ok(())
    }
}

/// Predicate deciding which queued commands require a full queue drain
/// before more can be pipelined.
pub trait SyncClassifier: Send + Sync {
    /// Whether `command` must see the firmware catch up before the
    /// governor resumes.
    fn requires_drain(&self, command: &str) -> bool;
}

/// Default classifier: commands starting with a configured prefix
#[derive(Debug, Clone)]
pub struct PrefixSyncClassifier {
    prefix: String,
}

impl PrefixSyncClassifier {
    /// Build a classifier from the configured prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl SyncClassifier for PrefixSyncClassifier {
    fn requires_drain(&self, command: &str) -> bool {
        !self.prefix.is_empty() && command.trim_start().starts_with(&self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = GovernorConfig::default();
        assert!(config.enabled);
        assert_eq!(config.min_grant_interval(), Duration::from_millis(100));
        assert_eq!(config.transfer_inflight_target, 4);
        assert_eq!(config.stop_command, "M31");
        assert_eq!(config.start_after_line, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_interval() {
        let config = GovernorConfig {
            min_grant_interval_secs: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GovernorConfig {
            min_grant_interval_secs: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_prefix_classifier() {
        let classifier = PrefixSyncClassifier::new("M");
        assert!(classifier.requires_drain("M400"));
        assert!(classifier.requires_drain("  M106 S255"));
        assert!(!classifier.requires_drain("G1 X10"));

        let disabled = PrefixSyncClassifier::new("");
        assert!(!disabled.requires_drain("M400"));
    }

    #[test]
    fn test_json_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("governor.json");

        let config = GovernorConfig {
            enabled: false,
            start_after_line: 10,
            ..Default::default()
        };
        config.save_to_file(&path).unwrap();

        let loaded = GovernorConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let loaded: GovernorConfig = serde_json::from_str(r#"{"enabled": false}"#).unwrap();
        assert!(!loaded.enabled);
        assert_eq!(loaded.stop_command, "M31");
    }
}
