use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::models::{
    Asset, Collection, CollectionDetail, CollectionLabelLink, CollectionSummary, Label, NewAsset,
};
use crate::repositories::Catalog;

/// In-memory catalog for tests and local experiments.
///
/// Mirrors the relational constraints the pipeline relies on (unique label
/// names, label links must reference existing rows) and can be told to fail
/// specific operations.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    inner: Arc<Mutex<InMemoryCatalogInner>>,
}

#[derive(Default)]
struct InMemoryCatalogInner {
    next_id: i64,
    labels: Vec<Label>,
    collections: Vec<Collection>,
    links: Vec<CollectionLabelLink>,
    assets: Vec<Asset>,
    failures: InjectedFailures,
    calls: CallCounts,
}

#[derive(Default)]
struct InjectedFailures {
    collection_insert: bool,
    label_links: bool,
    all_asset_inserts: bool,
    asset_inserts_named: HashSet<String>,
}

/// Number of write attempts seen per operation, successful or not
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub insert_collection: usize,
    pub insert_label_links: usize,
    pub insert_asset: usize,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `insert_collection` call fail
    pub async fn fail_collection_inserts(&self) {
        self.inner.lock().await.failures.collection_insert = true;
    }

    /// Make every `insert_label_links` call fail
    pub async fn fail_label_links(&self) {
        self.inner.lock().await.failures.label_links = true;
    }

    /// Make every `insert_asset` call fail
    pub async fn fail_all_asset_inserts(&self) {
        self.inner.lock().await.failures.all_asset_inserts = true;
    }

    /// Make `insert_asset` fail for assets with this file name
    pub async fn fail_asset_insert(&self, name: &str) {
        self.inner
            .lock()
            .await
            .failures
            .asset_inserts_named
            .insert(name.to_string());
    }

    pub async fn collections(&self) -> Vec<Collection> {
        self.inner.lock().await.collections.clone()
    }

    pub async fn links(&self) -> Vec<CollectionLabelLink> {
        self.inner.lock().await.links.clone()
    }

    pub async fn assets(&self) -> Vec<Asset> {
        self.inner.lock().await.assets.clone()
    }

    pub async fn calls(&self) -> CallCounts {
        self.inner.lock().await.calls
    }
}

impl InMemoryCatalogInner {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn labels_of(&self, collection_id: i64) -> Vec<Label> {
        let mut labels: Vec<Label> = self
            .links
            .iter()
            .filter(|link| link.collection_id == collection_id)
            .filter_map(|link| self.labels.iter().find(|l| l.id == link.label_id))
            .cloned()
            .collect();
        labels.sort_by(|a, b| a.name.cmp(&b.name));
        labels
    }

    fn assets_of(&self, collection_id: i64) -> Vec<Asset> {
        self.assets
            .iter()
            .filter(|asset| asset.collection_id == collection_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn insert_collection(&self, name: &str) -> AppResult<Collection> {
        let mut inner = self.inner.lock().await;
        inner.calls.insert_collection += 1;

        if inner.failures.collection_insert {
            return Err(AppError::Database("collections insert rejected".to_string()));
        }

        let collection = Collection {
            id: inner.next_id(),
            name: name.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        inner.collections.push(collection.clone());
        Ok(collection)
    }

    async fn insert_label_links(&self, links: &[CollectionLabelLink]) -> AppResult<()> {
        let mut inner = self.inner.lock().await;
        inner.calls.insert_label_links += 1;

        if inner.failures.label_links {
            return Err(AppError::Database(
                "collection_labels insert rejected".to_string(),
            ));
        }

        // The batch is all-or-nothing, like a single INSERT statement
        for link in links {
            if !inner.collections.iter().any(|c| c.id == link.collection_id) {
                return Err(AppError::NotFound(format!(
                    "Referenced record (collection {})",
                    link.collection_id
                )));
            }
            if !inner.labels.iter().any(|l| l.id == link.label_id) {
                return Err(AppError::NotFound(format!(
                    "Referenced record (label {})",
                    link.label_id
                )));
            }
            if inner.links.contains(link) {
                return Err(AppError::Conflict("Record".to_string()));
            }
        }

        inner.links.extend_from_slice(links);
        Ok(())
    }

    async fn insert_asset(&self, asset: NewAsset) -> AppResult<Asset> {
        let mut inner = self.inner.lock().await;
        inner.calls.insert_asset += 1;

        if inner.failures.all_asset_inserts || inner.failures.asset_inserts_named.contains(&asset.name)
        {
            return Err(AppError::Database(format!(
                "assets insert rejected for {}",
                asset.name
            )));
        }
        if !inner.collections.iter().any(|c| c.id == asset.collection_id) {
            return Err(AppError::NotFound(format!(
                "Referenced record (collection {})",
                asset.collection_id
            )));
        }

        let stored = Asset {
            id: inner.next_id(),
            collection_id: asset.collection_id,
            name: asset.name,
            storage_url: asset.storage_url,
            size_bytes: asset.size_bytes,
            content_type: asset.content_type,
            created_at: OffsetDateTime::now_utc(),
        };
        inner.assets.push(stored.clone());
        Ok(stored)
    }

    async fn create_label(&self, name: &str) -> AppResult<Label> {
        let mut inner = self.inner.lock().await;

        if inner.labels.iter().any(|l| l.name == name) {
            return Err(AppError::Conflict(format!("Label '{}'", name)));
        }

        let label = Label {
            id: inner.next_id(),
            name: name.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        inner.labels.push(label.clone());
        Ok(label)
    }

    async fn list_labels(&self) -> AppResult<Vec<Label>> {
        let inner = self.inner.lock().await;
        // Insertion order is creation order
        Ok(inner.labels.iter().rev().cloned().collect())
    }

    async fn list_collections(
        &self,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<CollectionSummary>> {
        let inner = self.inner.lock().await;

        let summaries = inner
            .collections
            .iter()
            .rev()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|collection| {
                let assets = inner.assets_of(collection.id);
                CollectionSummary {
                    collection: collection.clone(),
                    labels: inner.labels_of(collection.id),
                    asset_count: assets.len() as u64,
                    cover_url: assets.first().map(|a| a.storage_url.clone()),
                }
            })
            .collect();

        Ok(summaries)
    }

    async fn count_collections(&self) -> AppResult<u64> {
        let inner = self.inner.lock().await;
        Ok(inner.collections.len() as u64)
    }

    async fn find_collection(&self, id: i64) -> AppResult<CollectionDetail> {
        let inner = self.inner.lock().await;

        let collection = inner
            .collections
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Collection".to_string()))?;

        Ok(CollectionDetail {
            labels: inner.labels_of(id),
            assets: inner.assets_of(id),
            collection,
        })
    }
}
