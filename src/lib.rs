//! Workspace umbrella crate for the lost & found service.
//!
//! This crate stitches together report intake, the item store and the match
//! engine so callers can report, browse and match items through a single
//! [`LostFound`] handle configured from one YAML file.
//!
//! ```
//! use lostfound::{ItemKind, LostFound, MatchQuery, RawReport};
//!
//! let service = LostFound::in_memory().unwrap();
//! let report = RawReport {
//!     item_name: Some("Black backpack".into()),
//!     category: Some("Bags".into()),
//!     color: Some("Black".into()),
//!     location: Some("Library".into()),
//!     date: Some("2024-10-01".into()),
//!     contact_info: Some("desk@campus.edu".into()),
//!     ..Default::default()
//! };
//! let found = service.report(ItemKind::Found, report).unwrap();
//! assert_eq!(found.id, 1);
//!
//! let hits = service
//!     .match_items(&MatchQuery::new("Bags").with_color("black"))
//!     .unwrap();
//! assert_eq!(hits[0].match_score, 70);
//! ```

pub mod config;

pub use crate::config::{ConfigLoadError, LostFoundConfig, MatchYamlConfig, StoreYamlConfig};
pub use intake::{parse_detection_output, validate_report, IntakeConfig, IntakeError, RawReport};
pub use matcher::{
    set_match_metrics, DefaultMatcher, HeuristicScorer, MatchCandidate, MatchConfig, MatchError,
    MatchMetrics, MatchQuery, MatchReason, MatchScorer, Matcher, ScoreWeights,
};
pub use store::{
    AiAnalysis, BackendConfig, DetectedObject, ItemFilter, ItemKind, ItemRecord, ItemStatus,
    ItemStore, NewItem, StoreConfig, StoreError,
};

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while moving a report or query through the service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("intake failure: {0}")]
    Intake(#[from] IntakeError),
    #[error("store failure: {0}")]
    Store(#[from] StoreError),
    #[error("match failure: {0}")]
    Match(#[from] MatchError),
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Collection sizes reported by [`LostFound::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStats {
    pub total_lost_items: usize,
    pub total_found_items: usize,
}

/// Open the store described by `cfg.store`.
pub fn open_store(cfg: &LostFoundConfig) -> Result<ItemStore, StoreError> {
    ItemStore::new(cfg.store_config())
}

/// Validate a raw report and persist it into `kind`'s collection.
pub fn report_item(
    store: &ItemStore,
    kind: ItemKind,
    raw: RawReport,
    intake_cfg: &IntakeConfig,
) -> Result<ItemRecord, PipelineError> {
    let item = validate_report(raw, intake_cfg)?;
    Ok(store.create(kind, item)?)
}

/// Store, matcher and intake policy wired from one configuration.
pub struct LostFound {
    store: Arc<ItemStore>,
    matcher: DefaultMatcher,
    intake: IntakeConfig,
}

impl LostFound {
    pub fn open(cfg: &LostFoundConfig) -> Result<Self, PipelineError> {
        cfg.validate()
            .map_err(|err| PipelineError::Config(err.to_string()))?;
        let store = Arc::new(open_store(cfg)?);
        let service = Self::with_store(store, cfg.intake.clone(), cfg.match_config())?;
        info!(
            backend = %cfg.store.backend,
            min_score = cfg.matcher.min_score,
            max_results = cfg.matcher.max_results,
            "service_opened"
        );
        Ok(service)
    }

    /// Everything in memory with default policy. Data is lost on drop.
    pub fn in_memory() -> Result<Self, PipelineError> {
        let cfg = LostFoundConfig {
            store: StoreYamlConfig {
                backend: "in_memory".to_string(),
                ..StoreYamlConfig::default()
            },
            ..LostFoundConfig::default()
        };
        Self::open(&cfg)
    }

    pub fn with_store(
        store: Arc<ItemStore>,
        intake: IntakeConfig,
        match_cfg: MatchConfig,
    ) -> Result<Self, PipelineError> {
        let matcher = Matcher::new(store.clone(), match_cfg)?;
        Ok(Self {
            store,
            matcher,
            intake,
        })
    }

    pub fn store(&self) -> &Arc<ItemStore> {
        &self.store
    }

    pub fn intake_config(&self) -> &IntakeConfig {
        &self.intake
    }

    pub fn report(&self, kind: ItemKind, raw: RawReport) -> Result<ItemRecord, PipelineError> {
        report_item(&self.store, kind, raw, &self.intake)
    }

    pub fn list(&self, kind: ItemKind, filter: &ItemFilter) -> Result<Vec<ItemRecord>, PipelineError> {
        Ok(self.store.filter(kind, filter)?)
    }

    /// Like [`ItemStore::find_by_id`] but absence is [`StoreError::NotFound`].
    pub fn get(&self, kind: ItemKind, id: u64) -> Result<ItemRecord, PipelineError> {
        Ok(self.store.fetch(kind, id)?)
    }

    pub fn match_items(&self, query: &MatchQuery) -> Result<Vec<MatchCandidate>, PipelineError> {
        Ok(self.matcher.match_items(query)?)
    }

    pub fn stats(&self) -> Result<ItemStats, PipelineError> {
        Ok(ItemStats {
            total_lost_items: self.store.count(ItemKind::Lost)?,
            total_found_items: self.store.count(ItemKind::Found)?,
        })
    }
}
