//! ML service diagnostics
//!
//! Relays the recognition service's root response so an operator can check
//! backend-to-ML connectivity in one request.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// GET /api/ml-status
pub async fn ml_status(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let response = state.recognizer.ping().await.map_err(ApiError::Upstream)?;

    Ok(Json(json!({
        "backend": "OK",
        "mlServiceResponse": response,
    })))
}
