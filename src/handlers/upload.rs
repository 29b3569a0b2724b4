use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::middlewares::AdminUser;
use crate::services::ingest::{ArchiveUpload, ValidationError};
use crate::services::{IngestError, UploadSubmission};
use crate::state::AppState;

// ============ Request/Response DTOs ============

/// Multipart form accepted by the upload endpoint
#[derive(Debug, ToSchema)]
pub struct UploadForm {
    /// Collection name
    pub name: String,
    /// ZIP archive of images
    #[schema(value_type = String, format = Binary)]
    pub archive: Vec<u8>,
    /// Label ids, one field per label
    pub labels: Vec<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(rename = "uploadedCount")]
    pub uploaded_count: usize,
}

// ============ Handlers ============

/// Create a collection from a ZIP archive of images
#[utoipa::path(
    post,
    path = "/api/collections",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Collection created", body = UploadResponse),
        (status = 400, description = "Invalid submission"),
        (status = 401, description = "Unauthorized"),
        (status = 413, description = "Archive too large"),
        (status = 422, description = "Archive unreadable or without images"),
        (status = 500, description = "Collection could not be created or no image was stored")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Collections"
)]
pub async fn upload_collection(
    admin: AdminUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, IngestError> {
    let submission = read_submission(multipart, state.config.max_upload_bytes).await?;
    tracing::info!(
        admin = %admin.email,
        name = submission.name.as_deref().unwrap_or_default(),
        labels = submission.labels.len(),
        "Collection upload received"
    );

    let report = state.ingest_service().ingest(submission).await?;

    Ok(Json(UploadResponse {
        success: true,
        uploaded_count: report.uploaded_count(),
    }))
}

/// Collect the form fields. Unknown fields are ignored and a repeated
/// `name` or `archive` keeps the last value.
async fn read_submission(
    mut multipart: Multipart,
    max_upload_bytes: usize,
) -> Result<UploadSubmission, ValidationError> {
    let mut submission = UploadSubmission::default();
    let rejected = |e: MultipartError| form_error(e, max_upload_bytes);

    while let Some(field) = multipart.next_field().await.map_err(rejected)? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            "name" => submission.name = Some(field.text().await.map_err(rejected)?),
            "archive" => {
                let file_name = field.file_name().map(|s| s.to_string());
                let data = field.bytes().await.map_err(rejected)?;
                submission.archive = Some(ArchiveUpload { file_name, data });
            }
            "labels" | "labels[]" => {
                let value = field.text().await.map_err(rejected)?;
                if !value.trim().is_empty() {
                    submission.labels.push(value);
                }
            }
            _ => {}
        }
    }

    Ok(submission)
}

fn form_error(err: MultipartError, max_upload_bytes: usize) -> ValidationError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ValidationError::TooLarge {
            max_bytes: max_upload_bytes,
        }
    } else {
        ValidationError::MalformedForm(err.body_text())
    }
}
