use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entity::asset::{self, ActiveModel, Column, Entity as AssetEntity};
use crate::error::{AppError, AppResult};
use crate::models::{Asset, NewAsset};

/// Asset repository for database operations. Assets are append-only.
pub struct AssetRepository;

impl AssetRepository {
    pub async fn create(db: &DatabaseConnection, input: &NewAsset) -> AppResult<Asset> {
        let size_bytes = i64::try_from(input.size_bytes)
            .map_err(|_| AppError::Validation(format!("{} is too large", input.name)))?;

        let model = ActiveModel {
            collection_id: Set(input.collection_id),
            name: Set(input.name.clone()),
            storage_url: Set(input.storage_url.clone()),
            size_bytes: Set(size_bytes),
            content_type: Set(input.content_type.clone()),
            created_at: Set(time::OffsetDateTime::now_utc()),
            ..Default::default()
        };

        let result = model.insert(db).await?;
        Ok(result.into())
    }

    /// Assets of a collection in upload order
    pub async fn list_by_collection(
        db: &DatabaseConnection,
        collection_id: i64,
    ) -> AppResult<Vec<Asset>> {
        let models = AssetEntity::find()
            .filter(Column::CollectionId.eq(collection_id))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(db)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    pub async fn count_by_collection(db: &DatabaseConnection, collection_id: i64) -> AppResult<u64> {
        let count = AssetEntity::find()
            .filter(Column::CollectionId.eq(collection_id))
            .count(db)
            .await?;

        Ok(count)
    }

    /// URL of the first asset, used as the collection cover
    pub async fn cover_url(db: &DatabaseConnection, collection_id: i64) -> AppResult<Option<String>> {
        let first = AssetEntity::find()
            .filter(Column::CollectionId.eq(collection_id))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .one(db)
            .await?;

        Ok(first.map(|m| m.storage_url))
    }
}

impl From<asset::Model> for Asset {
    fn from(m: asset::Model) -> Self {
        Self {
            id: m.id,
            collection_id: m.collection_id,
            name: m.name,
            storage_url: m.storage_url,
            size_bytes: u64::try_from(m.size_bytes).unwrap_or_default(),
            content_type: m.content_type,
            created_at: m.created_at,
        }
    }
}
