//! Integration tests for the alert store
//!
//! Tests cover:
//! - Schema initialization (columns, location index)
//! - Insert with id assignment and defaulted fields
//! - Newest-first and nearest-point queries
//! - Concurrent independent inserts

use chrono::{Duration, Utc};
use guardian_common::db::{self, AlertStatus, AlertStore, NewAlert};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Test helper: Create temporary database with schema applied
///
/// Returns (TempDir, SqlitePool) - TempDir must be kept alive for duration of test
async fn setup_test_db() -> (TempDir, SqlitePool) {
    let temp_dir = TempDir::new().expect("Should create temp dir");
    let db_path = temp_dir.path().join("guardian_test.db");

    let pool = db::init_database_pool(&db_path)
        .await
        .expect("Should initialize test database");

    (temp_dir, pool)
}

fn sample_alert(person_name: &str, confidence: f64, risk_score: i64) -> NewAlert {
    NewAlert::recognized(person_name.to_string(), confidence, risk_score)
}

#[tokio::test]
async fn test_schema_has_expected_columns() {
    let (_temp_dir, pool) = setup_test_db().await;

    let columns: Vec<String> =
        sqlx::query_scalar("SELECT name FROM pragma_table_info('alerts') ORDER BY cid")
            .fetch_all(&pool)
            .await
            .unwrap();

    for expected in [
        "id",
        "timestamp",
        "person_name",
        "confidence",
        "image_url",
        "longitude",
        "latitude",
        "status",
        "risk_score",
    ] {
        assert!(
            columns.iter().any(|c| c == expected),
            "alerts table should have column '{}'",
            expected
        );
    }
}

#[tokio::test]
async fn test_location_index_exists() {
    let (_temp_dir, pool) = setup_test_db().await;

    let indexes: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = 'alerts'",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(
        indexes.iter().any(|i| i == "idx_alerts_location"),
        "location columns should be indexed for future spatial queries"
    );
}

#[tokio::test]
async fn test_create_assigns_id_and_defaults() {
    let (_temp_dir, pool) = setup_test_db().await;
    let store = AlertStore::new(pool);

    let before = Utc::now();
    let alert = store
        .create(sample_alert("Alice", 96.0, 10))
        .await
        .expect("Should insert alert");

    assert_eq!(alert.person_name, "Alice");
    assert_eq!(alert.confidence, 96.0);
    assert_eq!(alert.status, AlertStatus::New);
    assert_eq!(alert.risk_score, 10);
    assert_eq!((alert.longitude, alert.latitude), (0.0, 0.0));
    assert!(alert.image_url.is_none());
    assert!(alert.timestamp >= before - Duration::seconds(1));

    // A second insert gets a distinct id
    let other = store.create(sample_alert("Alice", 96.0, 10)).await.unwrap();
    assert_ne!(alert.id, other.id);
}

#[tokio::test]
async fn test_create_honors_supplied_timestamp() {
    let (_temp_dir, pool) = setup_test_db().await;
    let store = AlertStore::new(pool);

    let when = Utc::now() - Duration::days(3);
    let mut new = sample_alert("Bob", 80.0, 5);
    new.timestamp = Some(when);

    let alert = store.create(new).await.unwrap();
    // Stored at microsecond precision
    assert_eq!(alert.timestamp.timestamp_micros(), when.timestamp_micros());

    let fetched = store.recent(10).await.unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(
        fetched[0].timestamp.timestamp_micros(),
        when.timestamp_micros()
    );
}

#[tokio::test]
async fn test_recent_orders_newest_first() {
    let (_temp_dir, pool) = setup_test_db().await;
    let store = AlertStore::new(pool);

    let base = Utc::now();
    for (name, age_minutes) in [("oldest", 30), ("middle", 20), ("newest", 10)] {
        let mut new = sample_alert(name, 80.0, 5);
        new.timestamp = Some(base - Duration::minutes(age_minutes));
        store.create(new).await.unwrap();
    }

    let alerts = store.recent(10).await.unwrap();
    let names: Vec<&str> = alerts.iter().map(|a| a.person_name.as_str()).collect();
    assert_eq!(names, vec!["newest", "middle", "oldest"]);

    let limited = store.recent(2).await.unwrap();
    assert_eq!(limited.len(), 2);
}

#[tokio::test]
async fn test_nearest_orders_by_distance() {
    let (_temp_dir, pool) = setup_test_db().await;
    let store = AlertStore::new(pool);

    for (name, lon, lat) in [
        ("far", 10.0, 10.0),
        ("near", 1.0, 1.0),
        ("origin", 0.0, 0.0),
    ] {
        let mut new = sample_alert(name, 80.0, 5);
        new.longitude = lon;
        new.latitude = lat;
        store.create(new).await.unwrap();
    }

    let alerts = store.nearest(0.0, 0.0, 10).await.unwrap();
    let names: Vec<&str> = alerts.iter().map(|a| a.person_name.as_str()).collect();
    assert_eq!(names, vec!["origin", "near", "far"]);
}

#[tokio::test]
async fn test_concurrent_independent_inserts() {
    let (_temp_dir, pool) = setup_test_db().await;
    let store = AlertStore::new(pool);

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .create(sample_alert(&format!("person-{i}"), 95.0, 10))
                .await
        }));
    }

    for handle in handles {
        handle.await.unwrap().expect("Concurrent insert should succeed");
    }

    let alerts = store.recent(50).await.unwrap();
    assert_eq!(alerts.len(), 8);
}

#[tokio::test]
async fn test_status_string_survives_round_trip() {
    let (_temp_dir, pool) = setup_test_db().await;
    let store = AlertStore::new(pool.clone());

    store.create(sample_alert("Carol", 92.5, 10)).await.unwrap();

    let stored: String = sqlx::query_scalar("SELECT status FROM alerts")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, "New");

    let alerts = store.recent(1).await.unwrap();
    assert_eq!(alerts[0].status, AlertStatus::New);
}
