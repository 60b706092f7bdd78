//! Pluggable scoring seam.
//!
//! A scorer is a pure function of `(query, candidate)`. Swapping it changes
//! the ranking without touching storage or transport code.

use std::collections::BTreeSet;

use store::ItemRecord;

use crate::types::{MatchQuery, MatchReason, ScoreWeights};

/// Score of one candidate plus the terms that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scored {
    pub score: u32,
    pub reasons: Vec<MatchReason>,
}

pub trait MatchScorer: Send + Sync {
    fn score(&self, query: &MatchQuery, candidate: &ItemRecord) -> Scored;
}

/// Flat additive rule: category, color, and shared detected-object labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeuristicScorer {
    weights: ScoreWeights,
}

impl HeuristicScorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> ScoreWeights {
        self.weights
    }
}

impl MatchScorer for HeuristicScorer {
    fn score(&self, query: &MatchQuery, candidate: &ItemRecord) -> Scored {
        let mut scored = Scored::default();

        if candidate.category == query.category {
            scored.score = scored.score.saturating_add(self.weights.category);
            scored.reasons.push(MatchReason::Category);
        }

        if let Some(color) = query.color.as_deref().filter(|c| !c.is_empty()) {
            if candidate.color.to_lowercase() == color.to_lowercase() {
                scored.score = scored.score.saturating_add(self.weights.color);
                scored.reasons.push(MatchReason::Color);
            }
        }

        for class in shared_classes(query, candidate) {
            scored.score = scored.score.saturating_add(self.weights.per_object);
            scored.reasons.push(MatchReason::Object {
                class: class.to_string(),
            });
        }

        scored
    }
}

/// Distinct labels present on both sides, sorted for stable reason output.
fn shared_classes<'a>(query: &'a MatchQuery, candidate: &ItemRecord) -> BTreeSet<&'a str> {
    let Some(query_objects) = query.detected_objects.as_deref() else {
        return BTreeSet::new();
    };
    let found: BTreeSet<&str> = candidate.detected_classes().collect();
    if found.is_empty() {
        return BTreeSet::new();
    }
    query_objects
        .iter()
        .map(|obj| obj.class.as_str())
        .filter(|class| found.contains(*class))
        .collect()
}
