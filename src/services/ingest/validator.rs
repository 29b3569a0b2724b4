use bytes::Bytes;

use crate::services::ingest::{IngestLimits, ValidationError};

/// Raw upload form, as read from the multipart body
#[derive(Debug, Clone, Default)]
pub struct UploadSubmission {
    pub name: Option<String>,
    pub archive: Option<ArchiveUpload>,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ArchiveUpload {
    pub file_name: Option<String>,
    pub data: Bytes,
}

/// Submission that passed every check, normalized for the later stages
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub name: String,
    pub archive: Bytes,
    /// Parsed, de-duplicated, in submission order
    pub label_ids: Vec<i64>,
}

/// Check a submission without side effects.
///
/// Constraints are checked in a fixed order and the first failure is
/// returned: name, archive presence, container type, labels, size.
pub fn validate(
    submission: UploadSubmission,
    limits: &IngestLimits,
) -> Result<ValidatedRequest, ValidationError> {
    let name = submission
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or(ValidationError::MissingName)?
        .to_string();

    let archive = submission
        .archive
        .filter(|archive| !archive.data.is_empty())
        .ok_or(ValidationError::MissingArchive)?;

    let is_zip = archive
        .file_name
        .as_deref()
        .is_some_and(|file_name| file_name.to_lowercase().ends_with(".zip"));
    if !is_zip {
        return Err(ValidationError::NotZip);
    }

    if submission.labels.is_empty() {
        return Err(ValidationError::NoLabels);
    }

    let mut label_ids = Vec::with_capacity(submission.labels.len());
    for raw in &submission.labels {
        let id: i64 = raw
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidLabel(raw.clone()))?;
        if !label_ids.contains(&id) {
            label_ids.push(id);
        }
    }

    if archive.data.len() > limits.max_upload_bytes {
        return Err(ValidationError::TooLarge {
            max_bytes: limits.max_upload_bytes,
        });
    }

    Ok(ValidatedRequest {
        name,
        archive: archive.data,
        label_ids,
    })
}
