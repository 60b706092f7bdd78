use std::sync::Arc;
use std::time::Instant;

use store::{BackendConfig, ItemKind, ItemStore, StoreConfig};
use tracing::debug;

use crate::metrics::metrics_recorder;
use crate::scoring::{HeuristicScorer, MatchScorer};
use crate::types::{MatchCandidate, MatchConfig, MatchError, MatchQuery};

#[cfg(test)]
mod tests;

/// Ranks the found collection against lost-item descriptions.
///
/// Holds no state of its own beyond configuration; every call reads the found
/// collection fresh through the store.
pub struct Matcher<S = HeuristicScorer> {
    store: Arc<ItemStore>,
    scorer: S,
    cfg: MatchConfig,
}

/// Matcher using the built-in additive heuristic.
pub type DefaultMatcher = Matcher<HeuristicScorer>;

impl Matcher<HeuristicScorer> {
    /// Heuristic matcher whose weights come from `cfg`.
    pub fn new(store: Arc<ItemStore>, cfg: MatchConfig) -> Result<Self, MatchError> {
        let scorer = HeuristicScorer::new(cfg.weights);
        Self::with_scorer(store, scorer, cfg)
    }

    /// Convenience helper to build an in-memory store for tests or ephemeral matching.
    pub fn in_memory_default() -> Result<Self, MatchError> {
        let store = ItemStore::new(StoreConfig::new().with_backend(BackendConfig::in_memory()))?;
        Self::new(Arc::new(store), MatchConfig::default())
    }
}

impl<S: MatchScorer> Matcher<S> {
    pub fn with_scorer(store: Arc<ItemStore>, scorer: S, cfg: MatchConfig) -> Result<Self, MatchError> {
        cfg.validate()?;
        Ok(Self { store, scorer, cfg })
    }

    pub fn store(&self) -> &Arc<ItemStore> {
        &self.store
    }

    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Score every found item, drop those under `min_score`, and return the
    /// best `max_results` in descending score order. Equal scores keep the
    /// found collection's insertion order.
    pub fn match_items(&self, query: &MatchQuery) -> Result<Vec<MatchCandidate>, MatchError> {
        let start = Instant::now();
        let found = self.store.load_all(ItemKind::Found)?;
        let scanned = found.len();

        let mut candidates: Vec<MatchCandidate> = found
            .into_iter()
            .filter_map(|item| {
                let scored = self.scorer.score(query, &item);
                (scored.score >= self.cfg.min_score).then(|| MatchCandidate {
                    item,
                    match_score: scored.score,
                    match_reasons: scored.reasons,
                })
            })
            .collect();

        // `sort_by` is stable, which is the tie-break.
        candidates.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        let qualified = candidates.len();
        candidates.truncate(self.cfg.max_results);

        let latency = start.elapsed();
        debug!(
            category = %query.category,
            scanned,
            qualified,
            returned = candidates.len(),
            elapsed_micros = latency.as_micros(),
            "match_complete"
        );
        if let Some(recorder) = metrics_recorder() {
            recorder.record_match(latency, scanned, candidates.len());
        }

        Ok(candidates)
    }
}
