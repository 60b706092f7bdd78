//! Configuration for report validation.
//!
//! ```rust
//! use intake::IntakeConfig;
//!
//! let config = IntakeConfig::default();
//! config.validate().expect("defaults are valid");
//! assert!(config.strip_control_chars);
//! ```
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Runtime configuration for intake behavior.
///
/// Cheap to clone and deserializable from the `intake` section of the YAML
/// configuration:
///
/// ```yaml
/// intake:
///   strip_control_chars: true
///   max_field_bytes: 4096
///   max_detected_objects: 64
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Remove control characters (including newlines) from text fields before
    /// trimming. Keeps log lines and stored JSON single-line.
    ///
    /// Default: `true`
    pub strip_control_chars: bool,

    /// Maximum byte length of any single text field after sanitizing.
    /// `None` disables the check.
    ///
    /// Default: `Some(4096)`
    pub max_field_bytes: Option<usize>,

    /// Maximum number of detected objects accepted in `aiAnalysis`.
    ///
    /// Default: `Some(64)`
    pub max_detected_objects: Option<usize>,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            strip_control_chars: true,
            max_field_bytes: Some(4096),
            max_detected_objects: Some(64),
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{0} must be greater than zero when set")]
    ZeroLimit(&'static str),
}

impl IntakeConfig {
    /// Rejects limits that would refuse every report.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_field_bytes == Some(0) {
            return Err(ConfigError::ZeroLimit("max_field_bytes"));
        }
        if self.max_detected_objects == Some(0) {
            return Err(ConfigError::ZeroLimit("max_detected_objects"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_limits_are_rejected() {
        let cfg = IntakeConfig {
            max_field_bytes: Some(0),
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroLimit("max_field_bytes")));

        let cfg = IntakeConfig {
            max_detected_objects: Some(0),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn unlimited_is_valid() {
        let cfg = IntakeConfig {
            max_field_bytes: None,
            max_detected_objects: None,
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let cfg: IntakeConfig =
            serde_json::from_str(r#"{"strip_control_chars": false}"#).expect("parse");
        assert!(!cfg.strip_control_chars);
        assert_eq!(cfg.max_field_bytes, Some(4096));
        assert_eq!(cfg.max_detected_objects, Some(64));
    }
}
