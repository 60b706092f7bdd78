//! Parsing of image-analysis workflow output.
//!
//! The detection service returns a loosely-typed JSON document. Only the
//! `predictions` array matters here; everything else is ignored.

use serde_json::Value;
use store::{AiAnalysis, DetectedObject};

const UNKNOWN_CLASS: &str = "unknown";

/// Builds an [`AiAnalysis`] from raw workflow output.
///
/// Looks for `output.predictions` first and falls back to a top-level
/// `predictions` array. Each prediction yields one [`DetectedObject`];
/// missing fields default to class `"unknown"`, confidence `0` and an empty
/// bbox object. Anything that is not an array of objects yields an empty
/// analysis.
///
/// ```rust
/// use intake::parse_detection_output;
/// use serde_json::json;
///
/// let analysis = parse_detection_output(&json!({
///     "output": {"predictions": [{"class": "backpack", "confidence": 0.91}]}
/// }));
/// assert_eq!(analysis.detected_objects[0].class, "backpack");
/// ```
pub fn parse_detection_output(raw: &Value) -> AiAnalysis {
    let predictions = raw
        .get("output")
        .and_then(|output| output.get("predictions"))
        .or_else(|| raw.get("predictions"))
        .and_then(Value::as_array);

    let Some(predictions) = predictions else {
        return AiAnalysis::default();
    };

    AiAnalysis::new(
        predictions
            .iter()
            .filter(|pred| pred.is_object())
            .map(detected_object)
            .collect(),
    )
}

fn detected_object(pred: &Value) -> DetectedObject {
    let class = pred
        .get("class")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_CLASS)
        .to_string();
    let confidence = pred.get("confidence").and_then(Value::as_f64).unwrap_or(0.0);
    let bbox = pred
        .get("bbox")
        .cloned()
        .unwrap_or_else(|| Value::Object(Default::default()));
    DetectedObject {
        class,
        confidence,
        bbox,
    }
}
