//! # Configuration
//!
//! The logger is configured with a single TOML document. Every field has a
//! default, so an empty document is a valid configuration.
//!
//! ## Example
//!
//! ```toml
//! tanks = ["T1", "T2"]
//! pumps = ["P1", "P2", "P3"]
//! statuses = ["ok", "warning", "fault"]
//! default_threshold = 0.5
//!
//! [storage]
//! logs_key = "pump_logs_v1"
//! threshold_key = "pump_threshold"
//!
//! [display]
//! timestamp_format = "%d/%m/%Y %H:%M"
//! utc_offset_minutes = 120
//!
//! [alerts]
//! notification_title = "Pump Alert"
//! ```

use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;

use crate::error::PumpLogError;

const MAX_OFFSET_MINUTES: i32 = 24 * 60;

/// Characters that set entries may not carry; exported CSV fields other than
/// notes are written unquoted.
const RESERVED_CHARS: [char; 4] = [',', '"', '\r', '\n'];

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    /// Selectable tank identifiers.
    pub tanks: Vec<String>,
    /// Selectable pump identifiers.
    pub pumps: Vec<String>,
    /// Selectable operational statuses.
    pub statuses: Vec<String>,
    /// Threshold used when none is stored or the stored one is unreadable.
    pub default_threshold: f64,
    pub storage: StorageConfig,
    pub display: DisplayConfig,
    pub alerts: AlertConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub logs_key: String,
    pub threshold_key: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// strftime pattern for human-readable timestamps.
    pub timestamp_format: String,
    /// Fixed offset from UTC. The host's local zone is used when unset.
    pub utc_offset_minutes: Option<i32>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlertConfig {
    pub notification_title: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            tanks: vec!["T1".to_string(), "T2".to_string(), "T3".to_string()],
            pumps: vec!["P1".to_string(), "P2".to_string()],
            statuses: vec![
                "ok".to_string(),
                "warning".to_string(),
                "fault".to_string(),
                "off".to_string(),
            ],
            default_threshold: 0.5,
            storage: StorageConfig::default(),
            display: DisplayConfig::default(),
            alerts: AlertConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            logs_key: "pump_logs_v1".to_string(),
            threshold_key: "pump_threshold".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
            utc_offset_minutes: None,
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            notification_title: "Pump Alert".to_string(),
        }
    }
}

impl LoggerConfig {
    /// Parse and validate a TOML configuration document.
    pub fn from_toml_str(source: &str) -> Result<Self, PumpLogError> {
        let config: LoggerConfig =
            toml::from_str(source).map_err(|e| PumpLogError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PumpLogError> {
        for (name, set) in [
            ("tanks", &self.tanks),
            ("pumps", &self.pumps),
            ("statuses", &self.statuses),
        ] {
            if set.is_empty() {
                return Err(PumpLogError::Config(format!("{} must not be empty", name)));
            }
            if let Some(entry) = set.iter().find(|e| e.contains(RESERVED_CHARS)) {
                return Err(PumpLogError::Config(format!(
                    "{} entry {:?} must not contain commas, quotes or line breaks",
                    name, entry
                )));
            }
        }
        if !self.default_threshold.is_finite() {
            return Err(PumpLogError::Config(
                "default_threshold must be a finite number".to_string(),
            ));
        }
        if self.storage.logs_key.is_empty() || self.storage.threshold_key.is_empty() {
            return Err(PumpLogError::Config("storage keys must not be empty".to_string()));
        }
        if self.storage.logs_key == self.storage.threshold_key {
            return Err(PumpLogError::Config(
                "logs_key and threshold_key must differ".to_string(),
            ));
        }
        if StrftimeItems::new(&self.display.timestamp_format).any(|item| matches!(item, Item::Error)) {
            return Err(PumpLogError::Config(format!(
                "invalid timestamp_format: {}",
                self.display.timestamp_format
            )));
        }
        if let Some(offset) = self.display.utc_offset_minutes {
            if offset.abs() >= MAX_OFFSET_MINUTES {
                return Err(PumpLogError::Config(format!(
                    "utc_offset_minutes out of range: {}",
                    offset
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = LoggerConfig::from_toml_str("").unwrap();
        assert_eq!(config.default_threshold, 0.5);
        assert_eq!(config.storage.logs_key, "pump_logs_v1");
        assert_eq!(config.storage.threshold_key, "pump_threshold");
        assert_eq!(config.alerts.notification_title, "Pump Alert");
        assert!(config.tanks.contains(&"T1".to_string()));
        assert!(config.pumps.contains(&"P1".to_string()));
        assert!(config.statuses.contains(&"ok".to_string()));
    }

    #[test]
    fn test_partial_document() {
        let config = LoggerConfig::from_toml_str(
            r#"
            tanks = ["North", "South"]

            [display]
            utc_offset_minutes = -300
            "#,
        )
        .unwrap();
        assert_eq!(config.tanks, vec!["North", "South"]);
        assert_eq!(config.pumps, LoggerConfig::default().pumps);
        assert_eq!(config.display.utc_offset_minutes, Some(-300));
        assert_eq!(config.display.timestamp_format, "%Y-%m-%d %H:%M:%S");
    }

    #[test]
    fn test_rejects_empty_sets() {
        let err = LoggerConfig::from_toml_str("pumps = []").unwrap_err();
        assert_eq!(
            err,
            PumpLogError::Config("pumps must not be empty".to_string())
        );
    }

    #[test]
    fn test_rejects_csv_reserved_characters_in_sets() {
        let err = LoggerConfig::from_toml_str("tanks = [\"North, East\"]").unwrap_err();
        assert_eq!(
            err,
            PumpLogError::Config(
                "tanks entry \"North, East\" must not contain commas, quotes or line breaks"
                    .to_string()
            )
        );
        assert!(LoggerConfig::from_toml_str("pumps = ['P\"1']").is_err());
        assert!(LoggerConfig::from_toml_str("statuses = [\"ok\\nfine\"]").is_err());
        assert!(LoggerConfig::from_toml_str("statuses = [\"ok\\r\"]").is_err());

        let config = LoggerConfig::from_toml_str("tanks = [\"North East\", \"Tank #2\"]").unwrap();
        assert_eq!(config.tanks, vec!["North East", "Tank #2"]);
    }

    #[test]
    fn test_rejects_bad_timestamp_format() {
        let err = LoggerConfig::from_toml_str("[display]\ntimestamp_format = \"%Q\"").unwrap_err();
        assert!(matches!(err, PumpLogError::Config(_)));
    }

    #[test]
    fn test_rejects_out_of_range_offset() {
        let err =
            LoggerConfig::from_toml_str("[display]\nutc_offset_minutes = 1440").unwrap_err();
        assert!(matches!(err, PumpLogError::Config(_)));
    }

    #[test]
    fn test_rejects_unknown_fields_and_shared_keys() {
        assert!(LoggerConfig::from_toml_str("threshold = 1.0").is_err());
        assert!(LoggerConfig::from_toml_str(
            "[storage]\nlogs_key = \"same\"\nthreshold_key = \"same\""
        )
        .is_err());
    }
}
