//! Database models

use crate::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle tag of an alert record.
///
/// Alerts are created as `New`; the remaining states belong to an operator
/// workflow outside this backend, which never transitions them itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertStatus {
    New,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
    #[serde(rename = "False Alarm")]
    FalseAlarm,
}

impl AlertStatus {
    /// Storage/wire representation of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::New => "New",
            AlertStatus::InProgress => "In Progress",
            AlertStatus::Resolved => "Resolved",
            AlertStatus::FalseAlarm => "False Alarm",
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "New" => Ok(AlertStatus::New),
            "In Progress" => Ok(AlertStatus::InProgress),
            "Resolved" => Ok(AlertStatus::Resolved),
            "False Alarm" => Ok(AlertStatus::FalseAlarm),
            other => Err(Error::InvalidInput(format!("unknown alert status: {other}"))),
        }
    }
}

/// Persisted record of one recognized-identity match on one processed image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub person_name: String,
    pub confidence: f64,
    /// Reference to a stored copy of the image. Not populated by the upload
    /// pipeline; reserved for a future image persistence layer.
    pub image_url: Option<String>,
    pub longitude: f64,
    pub latitude: f64,
    pub status: AlertStatus,
    pub risk_score: i64,
}

/// Alert fields supplied by the caller; id and a defaulted timestamp are
/// assigned by the store at insert time.
#[derive(Debug, Clone)]
pub struct NewAlert {
    pub person_name: String,
    pub confidence: f64,
    pub image_url: Option<String>,
    pub longitude: f64,
    pub latitude: f64,
    pub status: AlertStatus,
    pub risk_score: i64,
    /// Creation instant; `None` means "now" at insert time.
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewAlert {
    /// Alert for a recognition match, with the coordinates left at the
    /// unknown-location default (0, 0).
    pub fn recognized(person_name: String, confidence: f64, risk_score: i64) -> Self {
        Self {
            person_name,
            confidence,
            image_url: None,
            longitude: 0.0,
            latitude: 0.0,
            status: AlertStatus::New,
            risk_score,
            timestamp: None,
        }
    }
}
