//! guardian-api library interface
//!
//! Exposes the router and application state for integration testing.

pub mod api;
pub mod config;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use guardian_common::db::AlertStore;
use services::{RecognizerClient, UploadPipeline};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Upload size ceiling enforced at the API boundary (10 MB)
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Alert persistence and queries
    pub store: AlertStore,
    /// Recognition service client (diagnostics endpoint)
    pub recognizer: RecognizerClient,
    /// Upload pipeline over the same store and client
    pub pipeline: UploadPipeline,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(store: AlertStore, recognizer: RecognizerClient) -> Self {
        let pipeline = UploadPipeline::new(recognizer.clone(), store.clone());
        Self {
            store,
            recognizer,
            pipeline,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/api/upload", post(api::upload_image))
        .route("/api/alerts", get(api::list_alerts))
        .route("/api/ml-status", get(api::ml_status))
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        // The browser frontend is served from another origin
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
