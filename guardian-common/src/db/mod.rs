//! Database access for the Guardian backend
//!
//! SQLite storage for alert records. The pool is constructed once at startup
//! and handed to an [`alerts::AlertStore`]; nothing in this crate holds a
//! process-wide connection.

pub mod alerts;
pub mod models;

pub use alerts::AlertStore;
pub use models::{Alert, AlertStatus, NewAlert};

use crate::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize the database connection pool
///
/// Opens (or creates) the database file and ensures the alert schema exists.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Use proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Create the alerts table and its indexes if they don't exist
///
/// The (longitude, latitude) index keeps nearest-alert queries viable even
/// though the upload pipeline currently writes default coordinates.
async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS alerts (
            id TEXT PRIMARY KEY,
            timestamp TEXT NOT NULL,
            person_name TEXT NOT NULL,
            confidence REAL NOT NULL,
            image_url TEXT,
            longitude REAL NOT NULL DEFAULT 0.0,
            latitude REAL NOT NULL DEFAULT 0.0,
            status TEXT NOT NULL DEFAULT 'New',
            risk_score INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_alerts_location ON alerts (longitude, latitude)",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_alerts_timestamp ON alerts (timestamp)")
        .execute(pool)
        .await?;

    tracing::info!("Database tables initialized (alerts)");

    Ok(())
}
