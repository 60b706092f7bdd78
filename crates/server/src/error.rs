use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use intake::IntakeError;
use lostfound::PipelineError;
use matcher::MatchError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use store::StoreError;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Intake(#[from] IntakeError),

    #[error("{0}")]
    Store(#[from] StoreError),

    /// Store failures raised while matching arrive as [`ServerError::Store`].
    #[error("Match error: {0}")]
    Match(MatchError),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) | ServerError::Intake(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Store(err) => store_status(err),
            ServerError::Match(_) | ServerError::Internal(_) | ServerError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::Intake(IntakeError::MissingField(_)) => "MISSING_FIELD",
            ServerError::Intake(_) => "INVALID_REPORT",
            ServerError::Store(err) => store_code(err),
            ServerError::Match(_) => "MATCH_ERROR",
            ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::Config(_) => "CONFIG_ERROR",
            ServerError::NotFound => "NOT_FOUND",
        }
    }
}

fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::MissingField(_) | StoreError::InvalidItemType(_) => StatusCode::BAD_REQUEST,
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        StoreError::DuplicateId { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn store_code(err: &StoreError) -> &'static str {
    match err {
        StoreError::MissingField(_) => "MISSING_FIELD",
        StoreError::InvalidItemType(_) => "INVALID_ITEM_TYPE",
        StoreError::NotFound { .. } => "NOT_FOUND",
        StoreError::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
        StoreError::DuplicateId { .. } => "DUPLICATE_ID",
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = %status, "request_failed");
        }

        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

impl From<MatchError> for ServerError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::Store(err) => ServerError::Store(err),
            other => ServerError::Match(other),
        }
    }
}

impl From<PipelineError> for ServerError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Intake(err) => err.into(),
            PipelineError::Store(err) => err.into(),
            PipelineError::Match(err) => err.into(),
            PipelineError::Config(msg) => ServerError::Config(msg),
        }
    }
}

impl From<JsonRejection> for ServerError {
    fn from(err: JsonRejection) -> Self {
        ServerError::BadRequest(err.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(err: QueryRejection) -> Self {
        ServerError::BadRequest(err.body_text())
    }
}

impl From<PathRejection> for ServerError {
    fn from(err: PathRejection) -> Self {
        ServerError::BadRequest(err.body_text())
    }
}

impl From<tokio::task::JoinError> for ServerError {
    fn from(err: tokio::task::JoinError) -> Self {
        ServerError::Internal(format!("blocking task failed: {err}"))
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}
