pub mod aggregator;
pub mod archive;
pub mod error;
pub mod registrar;
pub mod validator;
pub mod worker;

pub use aggregator::{aggregate, IngestReport, SkippedEntry};
pub use archive::{ImageArchive, ImageEntry};
pub use error::{EntryFailure, IngestError, ValidationError};
pub use registrar::{register, Registration};
pub use validator::{validate, ArchiveUpload, UploadSubmission, ValidatedRequest};
pub use worker::{content_type_for, storage_key, AssetOutcome, AssetWorker};

use std::sync::Arc;

use crate::config::Config;
use crate::repositories::Catalog;
use crate::storage::Storage;

/// Size and type limits applied to every submission
#[derive(Debug, Clone)]
pub struct IngestLimits {
    pub max_upload_bytes: usize,
    /// Ceiling on one decompressed entry, whatever its header claims
    pub max_entry_bytes: usize,
    /// Lower-cased, without the leading dot
    pub image_extensions: Vec<String>,
}

impl IngestLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_upload_bytes: config.max_upload_bytes,
            max_entry_bytes: config.max_entry_bytes,
            image_extensions: config.image_extensions.clone(),
        }
    }
}

impl Default for IngestLimits {
    fn default() -> Self {
        Self {
            max_upload_bytes: crate::config::DEFAULT_MAX_UPLOAD_BYTES,
            max_entry_bytes: crate::config::DEFAULT_MAX_ENTRY_BYTES,
            image_extensions: crate::config::default_image_extensions(),
        }
    }
}

/// Archive ingestion: validate the submission, open the archive, register the
/// collection, upload each image, then decide the verdict.
///
/// Every stage before the per-entry loop is fail-fast and the loop itself is
/// fail-soft. Nothing is rolled back: a collection whose assets all failed
/// stays in the catalog.
#[derive(Clone)]
pub struct IngestService {
    catalog: Arc<dyn Catalog>,
    storage: Arc<dyn Storage>,
    limits: IngestLimits,
}

impl IngestService {
    pub fn new(catalog: Arc<dyn Catalog>, storage: Arc<dyn Storage>, limits: IngestLimits) -> Self {
        Self {
            catalog,
            storage,
            limits,
        }
    }

    /// Run the whole pipeline for one submission
    pub async fn ingest(&self, submission: UploadSubmission) -> Result<IngestReport, IngestError> {
        let request = validate(submission, &self.limits)?;

        let mut archive = ImageArchive::open(request.archive, &self.limits)?;
        tracing::info!(
            name = %request.name,
            image_entries = archive.entries().len(),
            "Archive accepted"
        );

        let registration = register(self.catalog.as_ref(), &request.name, &request.label_ids).await?;
        let collection_id = registration.collection.id;

        let outcomes = AssetWorker::new(self.catalog.as_ref(), self.storage.as_ref(), collection_id)
            .run(&mut archive)
            .await;

        let report = aggregate(collection_id, registration.labels_linked, outcomes)?;
        tracing::info!(
            collection_id,
            uploaded = report.uploaded_count(),
            skipped = report.skipped.len(),
            "Ingestion finished"
        );

        Ok(report)
    }
}
