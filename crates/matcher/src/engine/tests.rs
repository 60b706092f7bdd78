use super::*;
use std::sync::RwLock;
use std::time::Duration;

use store::{AiAnalysis, DetectedObject, InMemoryBackend, NewItem};

use crate::metrics::{set_match_metrics, MatchMetrics};
use crate::scoring::Scored;
use crate::types::{MatchReason, ScoreWeights};

fn found_item(name: &str, category: &str, color: &str, classes: &[&str]) -> NewItem {
    let ai_analysis = (!classes.is_empty()).then(|| {
        AiAnalysis::new(
            classes
                .iter()
                .map(|class| DetectedObject {
                    class: class.to_string(),
                    confidence: 0.9,
                    bbox: serde_json::json!({"x": 1, "y": 2, "width": 3, "height": 4}),
                })
                .collect(),
        )
    });
    NewItem {
        item_name: name.into(),
        category: category.into(),
        color: color.into(),
        location: "Front desk".into(),
        date: "2024-10-05".into(),
        description: String::new(),
        contact_info: "lostandfound@example.edu".into(),
        image_ref: None,
        ai_analysis,
    }
}

fn matcher_with(found: Vec<NewItem>) -> Result<DefaultMatcher, MatchError> {
    let store = ItemStore::with_backend(StoreConfig::new(), Box::new(InMemoryBackend::new()));
    for item in found {
        store.create(ItemKind::Found, item)?;
    }
    Matcher::new(Arc::new(store), MatchConfig::default())
}

fn ranked(hits: &[MatchCandidate]) -> Vec<(u64, u32)> {
    hits.iter().map(|h| (h.item.id, h.match_score)).collect()
}

#[test]
fn empty_found_collection_yields_no_matches() -> Result<(), MatchError> {
    let matcher = Matcher::in_memory_default()?;
    let hits = matcher.match_items(&MatchQuery::new("Bags").with_color("Black"))?;
    assert!(hits.is_empty());
    Ok(())
}

#[test]
fn bag_scenario_ranks_full_match_first() -> Result<(), MatchError> {
    let matcher = matcher_with(vec![
        found_item("Backpack", "Bags", "Black", &["backpack"]),
        found_item("Phone", "Electronics", "Black", &[]),
    ])?;

    let query = MatchQuery::new("Bags")
        .with_color("Black")
        .with_objects(["backpack"]);
    let hits = matcher.match_items(&query)?;

    assert_eq!(ranked(&hits), vec![(1, 85), (2, 30)]);
    assert_eq!(hits[1].match_reasons, vec![MatchReason::Color]);
    Ok(())
}

#[test]
fn single_shared_label_is_below_threshold() -> Result<(), MatchError> {
    let matcher = matcher_with(vec![found_item("Umbrella", "Accessories", "Blue", &["umbrella"])])?;

    let query = MatchQuery::new("Bags").with_color("Red").with_objects(["umbrella"]);
    assert!(matcher.match_items(&query)?.is_empty());
    Ok(())
}

#[test]
fn two_shared_labels_reach_threshold() -> Result<(), MatchError> {
    let matcher = matcher_with(vec![found_item("Kit", "Misc", "", &["bottle", "cup"])])?;

    let query = MatchQuery::new("Bags").with_objects(["cup", "bottle", "cup"]);
    assert_eq!(ranked(&matcher.match_items(&query)?), vec![(1, 30)]);
    Ok(())
}

#[test]
fn result_is_capped_at_ten_highest() -> Result<(), MatchError> {
    // Category match for all; item i carries i shared labels, so scores are
    // 40, 55, 70, ... and strictly increase with insertion order.
    let labels: Vec<String> = (0..15).map(|i| format!("label-{i}")).collect();
    let found: Vec<NewItem> = (0..15)
        .map(|i| {
            let classes: Vec<&str> = labels[..i].iter().map(String::as_str).collect();
            found_item(&format!("item-{i}"), "Bags", "", &classes)
        })
        .collect();
    let matcher = matcher_with(found)?;

    let query = MatchQuery {
        category: "Bags".into(),
        color: None,
        detected_objects: Some(labels.iter().map(|l| DetectedObject::labelled(l.as_str())).collect()),
    };
    let hits = matcher.match_items(&query)?;

    assert_eq!(hits.len(), 10);
    let ids: Vec<u64> = hits.iter().map(|h| h.item.id).collect();
    assert_eq!(ids, (6..=15).rev().collect::<Vec<u64>>());
    assert_eq!(hits[0].match_score, 40 + 14 * 15);
    Ok(())
}

#[test]
fn ties_keep_insertion_order() -> Result<(), MatchError> {
    let found: Vec<NewItem> = (0..15)
        .map(|i| found_item(&format!("bag-{i}"), "Bags", "", &[]))
        .collect();
    let matcher = matcher_with(found)?;

    let hits = matcher.match_items(&MatchQuery::new("Bags"))?;
    let ids: Vec<u64> = hits.iter().map(|h| h.item.id).collect();
    assert_eq!(ids, (1..=10).collect::<Vec<u64>>());
    Ok(())
}

#[test]
fn mixed_scores_sort_stably() -> Result<(), MatchError> {
    let matcher = matcher_with(vec![
        found_item("a", "Bags", "", &[]),
        found_item("b", "Other", "Red", &[]),
        found_item("c", "Bags", "Red", &[]),
        found_item("d", "Bags", "", &[]),
    ])?;

    let hits = matcher.match_items(&MatchQuery::new("Bags").with_color("red"))?;
    assert_eq!(ranked(&hits), vec![(3, 70), (1, 40), (4, 40), (2, 30)]);
    Ok(())
}

#[test]
fn configured_limits_apply() -> Result<(), MatchError> {
    let store = ItemStore::with_backend(StoreConfig::new(), Box::new(InMemoryBackend::new()));
    for i in 0..5 {
        store.create(ItemKind::Found, found_item(&format!("x{i}"), "Bags", "", &[]))?;
    }
    let cfg = MatchConfig {
        min_score: 50,
        max_results: 2,
        weights: ScoreWeights {
            category: 50,
            ..ScoreWeights::default()
        },
    };
    let matcher = Matcher::new(Arc::new(store), cfg)?;

    let hits = matcher.match_items(&MatchQuery::new("Bags"))?;
    assert_eq!(ranked(&hits), vec![(1, 50), (2, 50)]);
    Ok(())
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let cfg = MatchConfig {
        max_results: 0,
        ..MatchConfig::default()
    };
    let store = Arc::new(ItemStore::with_backend(
        StoreConfig::new(),
        Box::new(InMemoryBackend::new()),
    ));
    assert!(matches!(
        Matcher::new(store, cfg),
        Err(MatchError::InvalidConfig(_))
    ));
}

struct NameLengthScorer;

impl MatchScorer for NameLengthScorer {
    fn score(&self, _query: &MatchQuery, candidate: &store::ItemRecord) -> Scored {
        Scored {
            score: candidate.item_name.len() as u32,
            reasons: Vec::new(),
        }
    }
}

#[test]
fn custom_scorer_drives_ranking() -> Result<(), MatchError> {
    let store = ItemStore::with_backend(StoreConfig::new(), Box::new(InMemoryBackend::new()));
    for name in ["short", "a much longer name", "medium name"] {
        store.create(ItemKind::Found, found_item(name, "x", "", &[]))?;
    }
    let cfg = MatchConfig {
        min_score: 6,
        ..MatchConfig::default()
    };
    let matcher = Matcher::with_scorer(Arc::new(store), NameLengthScorer, cfg)?;

    let hits = matcher.match_items(&MatchQuery::default())?;
    assert_eq!(ranked(&hits), vec![(2, 18), (3, 11)]);
    Ok(())
}

struct RecordingMetrics {
    events: RwLock<Vec<(usize, usize)>>,
}

impl MatchMetrics for RecordingMetrics {
    fn record_match(&self, _latency: Duration, scanned: usize, hit_count: usize) {
        self.events.write().unwrap().push((scanned, hit_count));
    }
}

#[test]
fn metrics_recorder_observes_matches() -> Result<(), MatchError> {
    let matcher = matcher_with(vec![
        found_item("a", "Bags", "", &[]),
        found_item("b", "Keys", "", &[]),
        found_item("c", "Bags", "", &[]),
        found_item("d", "Wallets", "", &[]),
        found_item("e", "Bags", "", &[]),
        found_item("f", "Books", "", &[]),
        found_item("g", "Keys", "", &[]),
    ])?;
    let metrics = Arc::new(RecordingMetrics {
        events: RwLock::new(Vec::new()),
    });
    set_match_metrics(Some(metrics.clone()));

    let hits = matcher.match_items(&MatchQuery::new("Bags"))?;
    assert_eq!(hits.len(), 3);

    let events = metrics.events.read().unwrap().clone();
    assert!(events.contains(&(7, 3)));

    set_match_metrics(None);
    Ok(())
}
