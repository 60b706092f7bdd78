//! # Item Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` sits on top of the item store (`store`). Given a description of a
//! lost item it scores every found item with a flat additive heuristic, drops
//! weak candidates, and returns the strongest few in descending score order.
//!
//! ## Core Types
//!
//! - [`MatchQuery`]: category, optional color, optional detected objects.
//! - [`MatchConfig`]: threshold (`min_score`), result cap (`max_results`) and
//!   [`ScoreWeights`].
//! - [`MatchScorer`]: the scoring seam; [`HeuristicScorer`] is the default.
//! - [`MatchCandidate`]: found item plus `match_score` and `match_reasons`.
//! - [`Matcher`]: reads the found collection and applies the ranking policy.
//!
//! ## Scoring
//!
//! | Term | Condition | Default |
//! |------|-----------|---------|
//! | category | exact, case-sensitive equality | 40 |
//! | color | query color non-empty, case-insensitive equality | 30 |
//! | object | per distinct label present on both sides | 15 |
//!
//! Candidates below 30 are dropped and at most 10 are returned. Ties keep the
//! found collection's insertion order.
//!
//! ## Example Usage
//!
//! ```
//! use matcher::{MatchQuery, Matcher};
//!
//! let matcher = Matcher::in_memory_default().expect("matcher init");
//! let query = MatchQuery::new("Bags")
//!     .with_color("Black")
//!     .with_objects(["backpack"]);
//! let hits = matcher.match_items(&query).expect("match");
//! assert!(hits.is_empty());
//! ```
//!
//! ## Metrics
//!
//! Install a [`MatchMetrics`] implementation with [`set_match_metrics`] to
//! observe per-call latency, scanned corpus size and hit count.

pub mod engine;
pub mod metrics;
pub mod scoring;
pub mod types;

pub use crate::engine::{DefaultMatcher, Matcher};
pub use crate::metrics::{set_match_metrics, MatchMetrics};
pub use crate::scoring::{HeuristicScorer, MatchScorer, Scored};
pub use crate::types::{
    MatchCandidate, MatchConfig, MatchError, MatchQuery, MatchReason, ScoreWeights,
};
