//! Image upload endpoint
//!
//! POST /api/upload: single multipart `image` field. The boundary checks
//! (field present, non-empty, image content type, size cap via the router's
//! body limit) live here; everything past them is the upload pipeline.

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::services::AnalysisResponse;
use crate::AppState;

/// Successful upload response: the full ML payload, all faces included.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(rename = "mlData")]
    pub ml_data: AnalysisResponse,
}

/// Reject payloads that are empty or not identifiably an image. The sniffed
/// magic bytes win; the declared content type is only consulted when the
/// bytes are inconclusive.
fn ensure_image(data: &Bytes, declared: Option<&str>) -> ApiResult<()> {
    if data.is_empty() {
        return Err(ApiError::Validation("no file provided".to_string()));
    }

    let sniffed_image = infer::is_image(data);
    let declared_image = declared.map(|ct| ct.starts_with("image/")).unwrap_or(false);

    if !sniffed_image && !declared_image {
        return Err(ApiError::Validation(
            "unsupported content type: expected an image".to_string(),
        ));
    }

    Ok(())
}

/// POST /api/upload
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("upload", %request_id);

    async move {
        let mut image: Option<(Bytes, Option<String>)> = None;

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            ApiError::Validation(format!("failed to read multipart body: {e}"))
        })? {
            if field.name() == Some("image") {
                let declared = field.content_type().map(|ct| ct.to_string());
                let data = field.bytes().await.map_err(|e| {
                    ApiError::Validation(format!("failed to read image field: {e}"))
                })?;
                image = Some((data, declared));
                break;
            }
        }

        let Some((data, declared)) = image else {
            return Err(ApiError::Validation("no file provided".to_string()));
        };

        ensure_image(&data, declared.as_deref())?;

        tracing::info!(bytes = data.len(), content_type = ?declared, "Processing upload");

        let ml_data = state.pipeline.process(data, request_id).await?;

        Ok(Json(UploadResponse {
            success: true,
            ml_data,
        }))
    }
    .instrument(span)
    .await
}
