//! Face recognition service client
//!
//! Wraps the single outbound call to the external recognition service. The
//! image is forwarded as an opaque octet stream; no multipart re-encoding.
//! The client distinguishes transport failures, non-2xx rejections and
//! undecodable 2xx bodies, and never retries; retry policy, if any, belongs
//! to the caller.

use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Upload requests give the recognizer this long before the request is
/// treated as failed (not retried).
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Recognizer client errors
#[derive(Debug, Error)]
pub enum RecognizerError {
    /// Transport failure: connect, DNS, timeout
    #[error("ML service unreachable: {0}")]
    Unavailable(String),

    /// Remote returned a non-success status; body carried verbatim
    #[error("ML service rejected request (status {status}): {body}")]
    Rejected { status: u16, body: String },

    /// Remote returned 2xx but the body did not decode
    #[error("ML service returned malformed response: {0}")]
    MalformedResponse(String),
}

/// Recognition sub-result attached to a detection when the service attempted
/// an identity match. `name`/`confidence` are optional so a bare
/// `{"match": false}` decodes; matched results are expected to carry both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recognition {
    #[serde(rename = "match")]
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// One face found in the image: bounding box in source-image pixel
/// coordinates (x, y, width, height), plus an optional recognition result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    pub face_box: [u32; 4],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recognition: Option<Recognition>,
}

/// Full analysis payload from the recognition service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub faces_detected: u32,
    /// Absent in some service versions; treated as zero faces.
    #[serde(default)]
    pub results: Vec<Detection>,
}

/// HTTP client for the recognition service
#[derive(Debug, Clone)]
pub struct RecognizerClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl RecognizerClient {
    pub fn new(base_url: &str) -> Result<Self, RecognizerError> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RecognizerError::Unavailable(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Analyze one image
    ///
    /// POSTs the raw bytes to `{base}/analyze` as application/octet-stream
    /// and decodes the structured detection payload.
    pub async fn analyze(&self, image: Bytes) -> Result<AnalysisResponse, RecognizerError> {
        let url = format!("{}/analyze", self.base_url);

        tracing::debug!(url = %url, bytes = image.len(), "Forwarding image to ML service");

        let response = self
            .http_client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image)
            .send()
            .await
            .map_err(|e| RecognizerError::Unavailable(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RecognizerError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| RecognizerError::Unavailable(e.to_string()))?;

        let analysis: AnalysisResponse = serde_json::from_str(&body)
            .map_err(|e| RecognizerError::MalformedResponse(e.to_string()))?;

        tracing::info!(
            faces_detected = analysis.faces_detected,
            results = analysis.results.len(),
            "ML analysis completed"
        );

        Ok(analysis)
    }

    /// Probe the service root; used by the diagnostics endpoint
    pub async fn ping(&self) -> Result<serde_json::Value, RecognizerError> {
        let response = self
            .http_client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .map_err(|e| RecognizerError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RecognizerError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| RecognizerError::MalformedResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_strips_trailing_slash() {
        let client = RecognizerClient::new("http://127.0.0.1:8000/").unwrap();
        assert_eq!(client.base_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_analysis_parsing_mixed_results() {
        let json_str = r#"{
            "faces_detected": 2,
            "results": [
                {"face_box": [10, 10, 50, 50]},
                {"face_box": [70, 70, 40, 40],
                 "recognition": {"match": true, "name": "Alice", "confidence": 96}}
            ]
        }"#;

        let analysis: AnalysisResponse = serde_json::from_str(json_str).unwrap();

        assert_eq!(analysis.faces_detected, 2);
        assert_eq!(analysis.results.len(), 2);
        assert!(analysis.results[0].recognition.is_none());

        let recognition = analysis.results[1].recognition.as_ref().unwrap();
        assert!(recognition.matched);
        assert_eq!(recognition.name.as_deref(), Some("Alice"));
        assert_eq!(recognition.confidence, Some(96.0));
    }

    #[test]
    fn test_analysis_parsing_absent_results() {
        let analysis: AnalysisResponse = serde_json::from_str(r#"{"faces_detected": 0}"#).unwrap();
        assert_eq!(analysis.faces_detected, 0);
        assert!(analysis.results.is_empty());
    }

    #[test]
    fn test_recognition_without_identity_fields() {
        let json_str = r#"{
            "faces_detected": 1,
            "results": [{"face_box": [0, 0, 5, 5], "recognition": {"match": false}}]
        }"#;

        let analysis: AnalysisResponse = serde_json::from_str(json_str).unwrap();
        let recognition = analysis.results[0].recognition.as_ref().unwrap();

        assert!(!recognition.matched);
        assert!(recognition.name.is_none());
        assert!(recognition.confidence.is_none());
    }

    #[test]
    fn test_malformed_body_is_a_decode_error() {
        let result: Result<AnalysisResponse, _> = serde_json::from_str("not json");
        assert!(result.is_err());
    }

    #[test]
    fn test_reserialization_keeps_wire_field_names() {
        let analysis = AnalysisResponse {
            faces_detected: 1,
            results: vec![Detection {
                face_box: [1, 2, 3, 4],
                recognition: Some(Recognition {
                    matched: true,
                    name: Some("Alice".to_string()),
                    confidence: Some(96.0),
                }),
            }],
        };

        let value = serde_json::to_value(&analysis).unwrap();
        assert_eq!(value["results"][0]["recognition"]["match"], true);
        assert_eq!(value["results"][0]["face_box"][2], 3);
    }
}
