//! guardian-api - AI Guardian recognition alert backend
//!
//! Accepts image uploads, forwards them to the external face recognition
//! service and records an alert for every recognized match.

use anyhow::Result;
use clap::Parser;
use guardian_api::config::ServiceConfig;
use guardian_api::{build_router, AppState};
use guardian_common::db::AlertStore;
use guardian_api::services::RecognizerClient;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting AI Guardian backend (guardian-api) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = ServiceConfig::parse();
    info!("ML service: {}", config.ml_url);
    info!("Database: {}", config.database.display());

    let pool = guardian_common::db::init_database_pool(&config.database).await?;
    info!("Database connection established");

    let store = AlertStore::new(pool);
    let recognizer = RecognizerClient::new(&config.ml_url)
        .map_err(|e| anyhow::anyhow!("Failed to create recognizer client: {e}"))?;

    let state = AppState::new(store, recognizer);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", config.port)).await?;
    info!("guardian-api listening on http://127.0.0.1:{}", config.port);
    info!("Health check: http://127.0.0.1:{}/health", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
