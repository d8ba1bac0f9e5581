//! Alert listing endpoint
//!
//! Read-only view over the alert store for the operator dashboard.

use anyhow::Context;
use axum::{
    extract::{Query, State},
    Json,
};
use guardian_common::db::Alert;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::AppState;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 500;

#[derive(Debug, Deserialize)]
pub struct AlertsQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AlertsResponse {
    pub count: usize,
    pub alerts: Vec<Alert>,
}

/// GET /api/alerts (newest first)
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<AlertsQuery>,
) -> ApiResult<Json<AlertsResponse>> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let alerts = state
        .store
        .recent(limit)
        .await
        .context("failed to query alerts")?;

    Ok(Json(AlertsResponse {
        count: alerts.len(),
        alerts,
    }))
}
