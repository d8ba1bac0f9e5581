//! Upload pipeline
//!
//! Orchestrates one upload: validate the payload, forward it to the
//! recognition service, derive alerts from the matches and persist them.
//! The store write never precedes a successful ML response, and the per-match
//! inserts of a single request are the only per-request parallelism.

use crate::services::recognizer::{AnalysisResponse, RecognizerClient, RecognizerError};
use axum::body::Bytes;
use futures::future;
use guardian_common::db::{AlertStore, NewAlert};
use thiserror::Error;
use uuid::Uuid;

/// Pipeline outcome taxonomy
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Bad input; no network call was made and nothing was written
    #[error("{0}")]
    Validation(String),

    /// The recognition service failed; nothing was written
    #[error(transparent)]
    Upstream(#[from] RecognizerError),

    /// One or more alert writes failed after a successful ML response.
    /// Successful writes are not rolled back (at-least-once, not
    /// all-or-nothing).
    #[error("{failed} of {attempted} alert writes failed: {detail}")]
    Persistence {
        attempted: usize,
        failed: usize,
        detail: String,
    },
}

/// Derived alert priority.
///
/// Placeholder heuristic carried over from the reference system: strictly
/// greater than 90 scores 10, everything else 5. Do not read more intent
/// into it than that.
pub fn risk_score(confidence: f64) -> i64 {
    if confidence > 90.0 {
        10
    } else {
        5
    }
}

/// One alert per detection whose recognition sub-result is a match. Matched
/// results missing a name or confidence are skipped with a warning rather
/// than persisted half-empty.
fn matched_alerts(analysis: &AnalysisResponse) -> Vec<NewAlert> {
    analysis
        .results
        .iter()
        .filter_map(|detection| detection.recognition.as_ref())
        .filter(|recognition| recognition.matched)
        .filter_map(|recognition| match (&recognition.name, recognition.confidence) {
            (Some(name), Some(confidence)) => Some(NewAlert::recognized(
                name.clone(),
                confidence,
                risk_score(confidence),
            )),
            _ => {
                tracing::warn!(
                    name = ?recognition.name,
                    confidence = ?recognition.confidence,
                    "Matched recognition missing identity fields; skipping alert"
                );
                None
            }
        })
        .collect()
}

/// Upload pipeline: recognizer client plus injected alert store
#[derive(Debug, Clone)]
pub struct UploadPipeline {
    recognizer: RecognizerClient,
    store: AlertStore,
}

impl UploadPipeline {
    pub fn new(recognizer: RecognizerClient, store: AlertStore) -> Self {
        Self { recognizer, store }
    }

    /// Process one uploaded image
    ///
    /// Returns the full analysis payload (all faces, matched or not); only
    /// matches are persisted. Re-submitting identical bytes creates fresh
    /// alerts each time; the pipeline performs no deduplication.
    pub async fn process(
        &self,
        image: Bytes,
        request_id: Uuid,
    ) -> Result<AnalysisResponse, PipelineError> {
        if image.is_empty() {
            return Err(PipelineError::Validation("no file provided".to_string()));
        }

        let analysis = self.recognizer.analyze(image).await.map_err(|e| {
            tracing::error!(%request_id, stage = "ml_analyze", error = %e, "Upload failed");
            e
        })?;

        let alerts = matched_alerts(&analysis);
        if alerts.is_empty() {
            tracing::debug!(
                %request_id,
                faces_detected = analysis.faces_detected,
                "No recognition matches; nothing to persist"
            );
            return Ok(analysis);
        }

        tracing::info!(%request_id, matches = alerts.len(), "Matches found, saving alerts");

        // Best-effort parallel writes: each alert is an independent insert,
        // partial failure does not roll back the rest.
        let results = future::join_all(
            alerts
                .into_iter()
                .map(|alert| self.store.create(alert)),
        )
        .await;

        let attempted = results.len();
        let failures: Vec<String> = results
            .into_iter()
            .filter_map(|r| r.err().map(|e| e.to_string()))
            .collect();

        if !failures.is_empty() {
            tracing::error!(
                %request_id,
                stage = "alert_persist",
                attempted,
                failed = failures.len(),
                "Upload failed"
            );
            return Err(PipelineError::Persistence {
                attempted,
                failed: failures.len(),
                detail: failures.join("; "),
            });
        }

        Ok(analysis)
    }
}
