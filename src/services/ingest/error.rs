use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::AppError;
use crate::storage::StorageError;

/// First failing constraint of an upload submission
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Name is required")]
    MissingName,

    #[error("Please select a ZIP file")]
    MissingArchive,

    #[error("Only ZIP files are allowed")]
    NotZip,

    #[error("Please select at least one label")]
    NoLabels,

    #[error("Invalid label id: {0}")]
    InvalidLabel(String),

    #[error("File size must be less than {}", format_size(.max_bytes))]
    TooLarge { max_bytes: usize },

    #[error("Malformed upload form: {0}")]
    MalformedForm(String),
}

/// Whole MiB when the limit is a MiB multiple ("50MB"), bytes otherwise
fn format_size(bytes: &usize) -> String {
    const MIB: usize = 1024 * 1024;
    if *bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Terminal failures of an ingestion run
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to read ZIP archive: {0}")]
    ArchiveParse(String),

    #[error("No image files found in the ZIP archive")]
    NoImages,

    #[error("Failed to create collection: {0}")]
    CollectionCreation(String),

    #[error("Failed to upload any images")]
    NothingUploaded { collection_id: i64 },
}

impl IngestError {
    pub fn status(&self) -> StatusCode {
        match self {
            IngestError::Validation(ValidationError::TooLarge { .. }) => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            IngestError::Validation(_) => StatusCode::BAD_REQUEST,
            IngestError::ArchiveParse(_) | IngestError::NoImages => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            IngestError::CollectionCreation(_) | IngestError::NothingUploaded { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Failure body of the upload endpoint
#[derive(Serialize)]
struct UploadFailure {
    error: String,
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Ingestion failed");
        } else {
            tracing::info!(error = %self, "Ingestion rejected");
        }

        let body = Json(UploadFailure {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Why a single archive entry produced no asset. Never fatal to the run.
#[derive(Debug, thiserror::Error)]
pub enum EntryFailure {
    #[error("could not read entry: {0}")]
    Read(String),

    #[error("upload failed: {0}")]
    Upload(#[from] StorageError),

    #[error("metadata insert failed: {0}")]
    Persist(#[from] AppError),
}
