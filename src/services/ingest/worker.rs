use std::collections::HashSet;

use bytes::Bytes;

use crate::models::{Asset, NewAsset};
use crate::repositories::Catalog;
use crate::services::ingest::{EntryFailure, ImageArchive, ImageEntry};
use crate::storage::Storage;

/// Content type used when an extension has no entry in the lookup table
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// What happened to one image entry
#[derive(Debug)]
pub enum AssetOutcome {
    Stored(Asset),
    Skipped { entry: String, reason: EntryFailure },
}

/// MIME type for a lower-cased extension
pub fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => FALLBACK_CONTENT_TYPE,
    }
}

/// Object key of an asset: one prefix per collection, then the base file name
pub fn storage_key(collection_id: i64, file_name: &str) -> String {
    format!("collection-{}/{}", collection_id, file_name)
}

/// Uploads and records the image entries of one archive, one at a time.
///
/// Entries are processed in archive order. Two entries with the same base
/// name share a storage key, so the later upload replaces the earlier object.
pub struct AssetWorker<'a> {
    catalog: &'a dyn Catalog,
    storage: &'a dyn Storage,
    collection_id: i64,
    /// Keys already referenced by a persisted asset of this run
    claimed_keys: HashSet<String>,
}

impl<'a> AssetWorker<'a> {
    pub fn new(catalog: &'a dyn Catalog, storage: &'a dyn Storage, collection_id: i64) -> Self {
        Self {
            catalog,
            storage,
            collection_id,
            claimed_keys: HashSet::new(),
        }
    }

    /// Process every image entry. A failing entry is logged and skipped.
    pub async fn run(mut self, archive: &mut ImageArchive) -> Vec<AssetOutcome> {
        let entries: Vec<ImageEntry> = archive.entries().to_vec();
        let mut outcomes = Vec::with_capacity(entries.len());

        for entry in entries {
            match self.ingest_entry(archive, &entry).await {
                Ok(asset) => outcomes.push(AssetOutcome::Stored(asset)),
                Err(reason) => {
                    tracing::error!(
                        collection_id = self.collection_id,
                        entry = %entry.path,
                        error = %reason,
                        "Skipping archive entry"
                    );
                    outcomes.push(AssetOutcome::Skipped {
                        entry: entry.path,
                        reason,
                    });
                }
            }
        }

        outcomes
    }

    async fn ingest_entry(
        &mut self,
        archive: &mut ImageArchive,
        entry: &ImageEntry,
    ) -> Result<Asset, EntryFailure> {
        let data = Bytes::from(archive.read(entry)?);
        let size_bytes = data.len() as u64;
        let content_type = content_type_for(&entry.extension);
        let key = storage_key(self.collection_id, &entry.file_name);

        if self.claimed_keys.contains(&key) {
            tracing::warn!(
                collection_id = self.collection_id,
                key = %key,
                entry = %entry.path,
                "Duplicate file name in archive, overwriting earlier object"
            );
        }

        let storage_url = self.storage.upload(data, &key, content_type).await?;

        let new_asset = NewAsset {
            collection_id: self.collection_id,
            name: entry.file_name.clone(),
            storage_url,
            size_bytes,
            content_type: content_type.to_string(),
        };

        match self.catalog.insert_asset(new_asset).await {
            Ok(asset) => {
                self.claimed_keys.insert(key);
                Ok(asset)
            }
            Err(e) => {
                self.discard_object(&key).await;
                Err(e.into())
            }
        }
    }

    /// Remove an object whose metadata insert failed, unless an asset of this
    /// run already points at the same key.
    async fn discard_object(&self, key: &str) {
        if self.claimed_keys.contains(key) {
            return;
        }

        if let Err(e) = self.storage.delete(key).await {
            tracing::warn!(key = %key, error = %e, "Failed to remove orphaned object");
        }
    }
}
