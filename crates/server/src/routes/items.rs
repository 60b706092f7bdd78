use crate::error::ServerResult;
use crate::state::ServerState;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use lostfound::{ItemFilter, ItemKind, ItemRecord, ItemStats, RawReport};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Response to a successful report
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub success: bool,
    pub message: String,
    pub item: ItemRecord,
}

/// Query parameters for listing a collection. Empty values impose no constraint.
#[derive(Debug, Default, Deserialize)]
pub struct ListItemsQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

impl From<ListItemsQuery> for ItemFilter {
    fn from(query: ListItemsQuery) -> Self {
        ItemFilter {
            category: query.category,
            color: query.color,
            location: query.location,
            search: query.search,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListItemsResponse {
    pub success: bool,
    pub count: usize,
    pub items: Vec<ItemRecord>,
}

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub success: bool,
    pub item: ItemRecord,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: ItemStats,
}

/// Report a lost item (POST /api/report-lost)
pub async fn report_lost(
    State(state): State<Arc<ServerState>>,
    body: Result<Json<RawReport>, JsonRejection>,
) -> ServerResult<impl IntoResponse> {
    report(state, ItemKind::Lost, body).await
}

/// Report a found item (POST /api/report-found)
pub async fn report_found(
    State(state): State<Arc<ServerState>>,
    body: Result<Json<RawReport>, JsonRejection>,
) -> ServerResult<impl IntoResponse> {
    report(state, ItemKind::Found, body).await
}

async fn report(
    state: Arc<ServerState>,
    kind: ItemKind,
    body: Result<Json<RawReport>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<ReportResponse>)> {
    let Json(raw) = body?;
    let item = state
        .blocking(move |service| service.report(kind, raw))
        .await?;

    let message = match kind {
        ItemKind::Lost => "Lost item reported successfully",
        ItemKind::Found => "Found item reported successfully",
    };
    Ok((
        StatusCode::CREATED,
        Json(ReportResponse {
            success: true,
            message: message.to_string(),
            item,
        }),
    ))
}

/// List one collection with optional filters (GET /api/items/{item_type})
pub async fn list_items(
    State(state): State<Arc<ServerState>>,
    item_type: Result<Path<String>, PathRejection>,
    query: Result<Query<ListItemsQuery>, QueryRejection>,
) -> ServerResult<impl IntoResponse> {
    let Path(item_type) = item_type?;
    let Query(query) = query?;
    let kind: ItemKind = item_type.parse()?;
    let filter = ItemFilter::from(query);

    let items = state
        .blocking(move |service| service.list(kind, &filter))
        .await?;

    Ok(Json(ListItemsResponse {
        success: true,
        count: items.len(),
        items,
    }))
}

/// Item details (GET /api/items/{item_type}/{id})
pub async fn get_item(
    State(state): State<Arc<ServerState>>,
    params: Result<Path<(String, u64)>, PathRejection>,
) -> ServerResult<impl IntoResponse> {
    let Path((item_type, id)) = params?;
    let kind: ItemKind = item_type.parse()?;

    let item = state.blocking(move |service| service.get(kind, id)).await?;

    Ok(Json(ItemResponse {
        success: true,
        item,
    }))
}

/// Collection sizes (GET /api/stats)
pub async fn stats(State(state): State<Arc<ServerState>>) -> ServerResult<impl IntoResponse> {
    let stats = state.blocking(|service| service.stats()).await?;
    Ok(Json(StatsResponse {
        success: true,
        stats,
    }))
}
