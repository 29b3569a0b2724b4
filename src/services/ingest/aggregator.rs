use crate::models::Asset;
use crate::services::ingest::{AssetOutcome, IngestError};

/// Verdict of a completed run
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub collection_id: i64,
    pub labels_linked: bool,
    pub assets: Vec<Asset>,
    pub skipped: Vec<SkippedEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub entry: String,
    pub reason: String,
}

impl IngestReport {
    pub fn uploaded_count(&self) -> usize {
        self.assets.len()
    }
}

/// Reduce per-entry outcomes to the run's verdict. Zero stored assets is a
/// failure even though the collection already exists.
pub fn aggregate(
    collection_id: i64,
    labels_linked: bool,
    outcomes: Vec<AssetOutcome>,
) -> Result<IngestReport, IngestError> {
    let mut assets = Vec::new();
    let mut skipped = Vec::new();

    for outcome in outcomes {
        match outcome {
            AssetOutcome::Stored(asset) => assets.push(asset),
            AssetOutcome::Skipped { entry, reason } => skipped.push(SkippedEntry {
                entry,
                reason: reason.to_string(),
            }),
        }
    }

    if assets.is_empty() {
        return Err(IngestError::NothingUploaded { collection_id });
    }

    Ok(IngestReport {
        collection_id,
        labels_linked,
        assets,
        skipped,
    })
}
