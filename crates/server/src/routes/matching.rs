use crate::error::ServerResult;
use crate::state::ServerState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use lostfound::{parse_detection_output, AiAnalysis, DetectedObject, MatchCandidate, MatchQuery};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Match request
///
/// Object labels come from `detectedObjects` when present, otherwise from
/// `aiAnalysis.detected_objects` (the shape stored on reports).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub color: Option<String>,

    #[serde(default)]
    pub ai_analysis: Option<AiAnalysis>,

    #[serde(default)]
    pub detected_objects: Option<Vec<DetectedObject>>,
}

impl From<MatchRequest> for MatchQuery {
    fn from(request: MatchRequest) -> Self {
        let detected_objects = request
            .detected_objects
            .or_else(|| request.ai_analysis.map(|analysis| analysis.detected_objects));
        MatchQuery {
            category: request.category,
            color: request.color,
            detected_objects,
        }
    }
}

/// Match response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    pub success: bool,
    /// Number of matches returned.
    pub match_count: usize,
    pub matches: Vec<MatchCandidate>,
}

/// Rank found items against a lost-item description (POST /api/match-items)
pub async fn match_items(
    State(state): State<Arc<ServerState>>,
    body: Result<Json<MatchRequest>, JsonRejection>,
) -> ServerResult<impl IntoResponse> {
    let Json(request) = body?;
    let query = MatchQuery::from(request);

    let matches = state
        .blocking(move |service| service.match_items(&query))
        .await?;

    Ok(Json(MatchResponse {
        success: true,
        match_count: matches.len(),
        matches,
    }))
}

#[derive(Debug, Serialize)]
pub struct DetectionResponse {
    pub success: bool,
    pub analysis: AiAnalysis,
}

/// Normalize raw image-analysis workflow output into the `aiAnalysis` shape
/// accepted by the report and match endpoints (POST /api/parse-detections)
pub async fn parse_detections(
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> ServerResult<impl IntoResponse> {
    let Json(raw) = body?;
    Ok(Json(DetectionResponse {
        success: true,
        analysis: parse_detection_output(&raw),
    }))
}
