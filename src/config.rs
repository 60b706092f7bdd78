//! YAML configuration file support.
//!
//! All stage configurations (store, intake, matcher) live in a single YAML
//! file that is loaded and validated at startup.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "campus desk"
//!
//! store:
//!   backend: "json"
//!   data_dir: "data"
//!   pretty: true
//!
//! intake:
//!   strip_control_chars: true
//!   max_field_bytes: 4096
//!   max_detected_objects: 64
//!
//! matcher:
//!   min_score: 30
//!   max_results: 10
//!   weights:
//!     category: 40
//!     color: 30
//!     per_object: 15
//! ```

use std::fs;
use std::path::Path;

use intake::IntakeConfig;
use matcher::{MatchConfig, ScoreWeights};
use serde::{Deserialize, Serialize};
use store::{BackendConfig, StoreConfig};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LostFoundConfig {
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub store: StoreYamlConfig,

    #[serde(default)]
    pub intake: IntakeConfig,

    #[serde(default)]
    pub matcher: MatchYamlConfig,
}

impl LostFoundConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: LostFoundConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.store.validate()?;
        self.intake
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("intake: {err}")))?;
        self.matcher.validate()?;

        Ok(())
    }

    pub fn store_config(&self) -> StoreConfig {
        self.store.to_store_config()
    }

    pub fn match_config(&self) -> MatchConfig {
        self.matcher.to_match_config()
    }
}

impl Default for LostFoundConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            store: StoreYamlConfig::default(),
            intake: IntakeConfig::default(),
            matcher: MatchYamlConfig::default(),
        }
    }
}

/// Where the two collections are persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreYamlConfig {
    /// One of `json`, `redb`, `in_memory`.
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Directory holding `lost_items.json` / `found_items.json`.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default)]
    pub redb_path: Option<String>,

    #[serde(default = "true_value")]
    pub pretty: bool,
}

impl StoreYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        let valid_backends = ["json", "redb", "in_memory"];
        if !valid_backends.contains(&self.backend.as_str()) {
            return Err(ConfigLoadError::Validation(format!(
                "store.backend must be one of: {valid_backends:?}"
            )));
        }
        if self.backend == "json" && self.data_dir.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "store.data_dir must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_store_config(&self) -> StoreConfig {
        let backend = match self.backend.as_str() {
            "in_memory" => BackendConfig::in_memory(),
            "redb" => BackendConfig::redb(
                self.redb_path
                    .clone()
                    .unwrap_or_else(|| format!("{}/items.redb", self.data_dir)),
            ),
            _ => BackendConfig::json_dir(self.data_dir.clone()),
        };
        StoreConfig::new()
            .with_backend(backend)
            .with_pretty(self.pretty)
    }
}

impl Default for StoreYamlConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            data_dir: default_data_dir(),
            redb_path: None,
            pretty: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchYamlConfig {
    #[serde(default = "default_min_score")]
    pub min_score: u32,

    #[serde(default = "default_max_results")]
    pub max_results: usize,

    #[serde(default)]
    pub weights: ScoreWeights,
}

impl MatchYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        self.to_match_config()
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("matcher: {err}")))
    }

    pub fn to_match_config(&self) -> MatchConfig {
        MatchConfig {
            min_score: self.min_score,
            max_results: self.max_results,
            weights: self.weights,
        }
    }
}

impl Default for MatchYamlConfig {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            max_results: default_max_results(),
            weights: ScoreWeights::default(),
        }
    }
}

fn default_backend() -> String {
    "json".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn true_value() -> bool {
    true
}

fn default_min_score() -> u32 {
    30
}

fn default_max_results() -> usize {
    10
}
