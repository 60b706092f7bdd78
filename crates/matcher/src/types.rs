use serde::{Deserialize, Serialize};
use store::{DetectedObject, ItemRecord, StoreError};
use thiserror::Error;

/// Description of a lost item to pair against the found collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchQuery {
    /// Compared exactly; an empty category only matches empty categories.
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub color: Option<String>,
    /// Labels from the image-analysis service, if the reporter uploaded a photo.
    #[serde(default)]
    pub detected_objects: Option<Vec<DetectedObject>>,
}

impl MatchQuery {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_objects<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.detected_objects = Some(classes.into_iter().map(DetectedObject::labelled).collect());
        self
    }
}

/// Which scoring term contributed to a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MatchReason {
    Category,
    Color,
    /// A detected-object label shared by query and candidate.
    Object { class: String },
}

/// Weights of the additive heuristic.
///
/// The defaults (40 / 30 / 15) have no derivation beyond reproducing the
/// service's historical rankings; treat them as tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreWeights {
    #[serde(default = "ScoreWeights::default_category")]
    pub category: u32,
    #[serde(default = "ScoreWeights::default_color")]
    pub color: u32,
    /// Added once per distinct shared label.
    #[serde(default = "ScoreWeights::default_per_object")]
    pub per_object: u32,
}

impl ScoreWeights {
    fn default_category() -> u32 {
        40
    }

    fn default_color() -> u32 {
        30
    }

    fn default_per_object() -> u32 {
        15
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            category: Self::default_category(),
            color: Self::default_color(),
            per_object: Self::default_per_object(),
        }
    }
}

/// Ranking policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Candidates scoring below this are dropped.
    #[serde(default = "MatchConfig::default_min_score")]
    pub min_score: u32,
    /// Maximum number of candidates returned.
    #[serde(default = "MatchConfig::default_max_results")]
    pub max_results: usize,
    #[serde(default)]
    pub weights: ScoreWeights,
}

impl MatchConfig {
    pub(crate) fn default_min_score() -> u32 {
        30
    }

    pub(crate) fn default_max_results() -> usize {
        10
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if self.max_results == 0 {
            return Err(MatchError::InvalidConfig(
                "max_results must be greater than zero".into(),
            ));
        }
        let w = &self.weights;
        if w.category == 0 && w.color == 0 && w.per_object == 0 {
            return Err(MatchError::InvalidConfig(
                "at least one score weight must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            min_score: Self::default_min_score(),
            max_results: Self::default_max_results(),
            weights: ScoreWeights::default(),
        }
    }
}

/// A found item proposed for a lost-item query. Built per call, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCandidate {
    pub item: ItemRecord,
    pub match_score: u32,
    pub match_reasons: Vec<MatchReason>,
}

/// Errors produced by the matching layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
