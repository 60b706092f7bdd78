//! API route handlers
//!
//! Routes are organized by functionality:
//!
//! - `health`: liveness and readiness
//! - `items`: reporting, listing, item details and statistics
//! - `matching`: found-item matching and detection payload parsing

pub mod health;
pub mod items;
pub mod matching;

use crate::error::ServerError;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// API status
///
/// Root endpoint (GET /).
///
/// # Response
///
/// ```json
/// {
///   "status": "online",
///   "message": "Lost & Found API",
///   "version": "0.1.0"
/// }
/// ```
pub async fn api_info() -> impl IntoResponse {
    Json(json!({
        "status": "online",
        "message": "Lost & Found API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// 404 Not Found handler
///
/// Returns a standardized error response for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
