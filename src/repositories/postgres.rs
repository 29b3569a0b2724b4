use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::error::AppResult;
use crate::models::{
    Asset, Collection, CollectionDetail, CollectionLabelLink, CollectionSummary, CreateLabel,
    Label, NewAsset,
};
use crate::repositories::{
    AssetRepository, Catalog, CollectionRepository, LabelRepository, Repository,
};

/// PostgreSQL catalog backed by SeaORM
#[derive(Clone)]
pub struct PgCatalog {
    db: DatabaseConnection,
}

impl PgCatalog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn summarize(&self, collection: Collection) -> AppResult<CollectionSummary> {
        let labels = CollectionRepository::labels_of(&self.db, collection.id).await?;
        let asset_count = AssetRepository::count_by_collection(&self.db, collection.id).await?;
        let cover_url = AssetRepository::cover_url(&self.db, collection.id).await?;

        Ok(CollectionSummary {
            collection,
            labels,
            asset_count,
            cover_url,
        })
    }
}

#[async_trait]
impl Catalog for PgCatalog {
    async fn insert_collection(&self, name: &str) -> AppResult<Collection> {
        CollectionRepository::create(&self.db, name).await
    }

    async fn insert_label_links(&self, links: &[CollectionLabelLink]) -> AppResult<()> {
        CollectionRepository::link_labels(&self.db, links).await
    }

    async fn insert_asset(&self, asset: NewAsset) -> AppResult<Asset> {
        AssetRepository::create(&self.db, &asset).await
    }

    async fn create_label(&self, name: &str) -> AppResult<Label> {
        let input = CreateLabel {
            name: name.to_string(),
        };
        LabelRepository::create(&self.db, &input).await
    }

    async fn list_labels(&self) -> AppResult<Vec<Label>> {
        LabelRepository::list_all(&self.db).await
    }

    async fn list_collections(
        &self,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<CollectionSummary>> {
        let collections = CollectionRepository::list(&self.db, limit, offset).await?;

        let mut summaries = Vec::with_capacity(collections.len());
        for collection in collections {
            summaries.push(self.summarize(collection).await?);
        }
        Ok(summaries)
    }

    async fn count_collections(&self) -> AppResult<u64> {
        CollectionRepository::count(&self.db).await
    }

    async fn find_collection(&self, id: i64) -> AppResult<CollectionDetail> {
        let collection = CollectionRepository::find_by_id(&self.db, id).await?;
        let labels = CollectionRepository::labels_of(&self.db, id).await?;
        let assets = AssetRepository::list_by_collection(&self.db, id).await?;

        Ok(CollectionDetail {
            collection,
            labels,
            assets,
        })
    }
}
