//! Alert store
//!
//! Create/query access to the alerts table. The store is an explicitly
//! constructed handle around the pool; callers receive it by injection and
//! there is no ambient singleton. Inserts are single-row and independent, so
//! concurrent requests need no coordination beyond the pool itself.

use crate::db::models::{Alert, AlertStatus, NewAlert};
use crate::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Row shape as stored; converted to [`Alert`] on the way out.
#[derive(Debug, sqlx::FromRow)]
struct AlertRow {
    id: String,
    timestamp: String,
    person_name: String,
    confidence: f64,
    image_url: Option<String>,
    longitude: f64,
    latitude: f64,
    status: String,
    risk_score: i64,
}

impl TryFrom<AlertRow> for Alert {
    type Error = Error;

    fn try_from(row: AlertRow) -> Result<Self> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| Error::Internal(format!("invalid alert id {}: {e}", row.id)))?;
        let timestamp = DateTime::parse_from_rfc3339(&row.timestamp)
            .map_err(|e| Error::Internal(format!("invalid alert timestamp {}: {e}", row.timestamp)))?
            .with_timezone(&Utc);
        let status: AlertStatus = row.status.parse()?;

        Ok(Alert {
            id,
            timestamp,
            person_name: row.person_name,
            confidence: row.confidence,
            image_url: row.image_url,
            longitude: row.longitude,
            latitude: row.latitude,
            status,
            risk_score: row.risk_score,
        })
    }
}

const SELECT_COLUMNS: &str = "id, timestamp, person_name, confidence, image_url, \
     longitude, latitude, status, risk_score";

/// Handle for alert persistence and queries
#[derive(Debug, Clone)]
pub struct AlertStore {
    pool: SqlitePool,
}

impl AlertStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert one alert, assigning a fresh id and defaulting the timestamp
    /// to now when the caller did not supply one. Returns the stored record.
    pub async fn create(&self, new: NewAlert) -> Result<Alert> {
        let alert = Alert {
            id: Uuid::new_v4(),
            timestamp: new.timestamp.unwrap_or_else(Utc::now),
            person_name: new.person_name,
            confidence: new.confidence,
            image_url: new.image_url,
            longitude: new.longitude,
            latitude: new.latitude,
            status: new.status,
            risk_score: new.risk_score,
        };

        sqlx::query(
            r#"
            INSERT INTO alerts
                (id, timestamp, person_name, confidence, image_url,
                 longitude, latitude, status, risk_score)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(alert.id.to_string())
        // Fixed fractional width so lexicographic TEXT order matches time order
        .bind(alert.timestamp.to_rfc3339_opts(SecondsFormat::Micros, false))
        .bind(&alert.person_name)
        .bind(alert.confidence)
        .bind(&alert.image_url)
        .bind(alert.longitude)
        .bind(alert.latitude)
        .bind(alert.status.as_str())
        .bind(alert.risk_score)
        .execute(&self.pool)
        .await?;

        tracing::debug!(
            alert_id = %alert.id,
            person_name = %alert.person_name,
            risk_score = alert.risk_score,
            "Alert saved"
        );

        Ok(alert)
    }

    /// Newest-first listing of alerts
    pub async fn recent(&self, limit: i64) -> Result<Vec<Alert>> {
        let rows = sqlx::query_as::<_, AlertRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM alerts ORDER BY timestamp DESC LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Alert::try_from).collect()
    }

    /// Alerts closest to a point, by squared planar distance over the indexed
    /// coordinate columns. Adequate while the pipeline only writes default
    /// coordinates; a real spatial index can replace this without changing
    /// the contract.
    pub async fn nearest(&self, longitude: f64, latitude: f64, limit: i64) -> Result<Vec<Alert>> {
        let rows = sqlx::query_as::<_, AlertRow>(&format!(
            r#"
            SELECT {SELECT_COLUMNS} FROM alerts
            ORDER BY (longitude - ?) * (longitude - ?) + (latitude - ?) * (latitude - ?) ASC,
                     timestamp DESC
            LIMIT ?
            "#
        ))
        .bind(longitude)
        .bind(longitude)
        .bind(latitude)
        .bind(latitude)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Alert::try_from).collect()
    }
}
