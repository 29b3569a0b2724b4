pub mod asset;
pub mod collection;
pub mod label;
pub mod memory;
pub mod postgres;

pub use asset::AssetRepository;
pub use collection::CollectionRepository;
pub use label::LabelRepository;
pub use memory::InMemoryCatalog;
pub use postgres::PgCatalog;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::error::AppResult;
use crate::models::{
    Asset, Collection, CollectionDetail, CollectionLabelLink, CollectionSummary, Label, NewAsset,
};

/// Base repository trait for entities addressed by a generated integer id
#[async_trait]
pub trait Repository<T>
where
    T: Send + Sync,
{
    /// Find entity by ID
    async fn find_by_id(db: &DatabaseConnection, id: i64) -> AppResult<T>;

    /// List entities with pagination, newest first
    async fn list(db: &DatabaseConnection, limit: u64, offset: u64) -> AppResult<Vec<T>>;

    /// Count total entities
    async fn count(db: &DatabaseConnection) -> AppResult<u64>;
}

/// Persistent store used by the ingestion pipeline and the read endpoints.
///
/// Every method is one logical write or read; implementations provide their
/// own atomicity and nothing here spans a transaction across calls.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Insert a collection and return it with its generated id
    async fn insert_collection(&self, name: &str) -> AppResult<Collection>;

    /// Insert all label links in one batch. Unknown label ids fail the whole batch.
    async fn insert_label_links(&self, links: &[CollectionLabelLink]) -> AppResult<()>;

    /// Insert the metadata record for an uploaded asset
    async fn insert_asset(&self, asset: NewAsset) -> AppResult<Asset>;

    async fn create_label(&self, name: &str) -> AppResult<Label>;

    /// All labels, newest first
    async fn list_labels(&self) -> AppResult<Vec<Label>>;

    /// Collections newest first, with labels, asset count and cover image
    async fn list_collections(&self, limit: u64, offset: u64)
        -> AppResult<Vec<CollectionSummary>>;

    async fn count_collections(&self) -> AppResult<u64>;

    /// A collection with its labels and assets (oldest asset first)
    async fn find_collection(&self, id: i64) -> AppResult<CollectionDetail>;
}
