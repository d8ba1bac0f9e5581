//! Error types for guardian-api
//!
//! Maps pipeline outcomes to transport-level responses:
//! validation 400, upstream 502, persistence and everything else 500.
//! Error bodies use the `{"error": ..., "details": ...}` shape the frontend
//! already consumes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::{PipelineError, RecognizerError};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("{0}")]
    Validation(String),

    /// ML service problem (502)
    #[error(transparent)]
    Upstream(RecognizerError),

    /// Alert store write failure (500)
    #[error("alert persistence failed: {0}")]
    Persistence(String),

    /// Internal server error (500)
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Validation(msg) => ApiError::Validation(msg),
            PipelineError::Upstream(e) => ApiError::Upstream(e),
            err @ PipelineError::Persistence { .. } => ApiError::Persistence(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            ApiError::Upstream(e) => (
                StatusCode::BAD_GATEWAY,
                "ML service error".to_string(),
                Some(e.to_string()),
            ),
            ApiError::Persistence(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to save alerts".to_string(),
                Some(msg.clone()),
            ),
            ApiError::Internal(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                Some(e.to_string()),
            ),
        };

        let mut body = json!({ "error": error });
        if let Some(details) = details {
            body["details"] = json!(details);
        }

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
