use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::entity::collection::{self, ActiveModel, Column, Entity as CollectionEntity};
use crate::entity::collection_label::{
    self, ActiveModel as LinkActiveModel, Entity as CollectionLabelEntity,
};
use crate::entity::label::{self, Entity as LabelEntity};
use crate::error::{AppError, AppResult};
use crate::models::{Collection, CollectionLabelLink, Label};
use crate::repositories::Repository;

/// Collection repository for database operations
pub struct CollectionRepository;

#[async_trait]
impl Repository<Collection> for CollectionRepository {
    async fn find_by_id(db: &DatabaseConnection, id: i64) -> AppResult<Collection> {
        let model = CollectionEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Collection".to_string()))?;

        Ok(model.into())
    }

    async fn list(db: &DatabaseConnection, limit: u64, offset: u64) -> AppResult<Vec<Collection>> {
        let models = CollectionEntity::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .offset(offset)
            .limit(limit)
            .all(db)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn count(db: &DatabaseConnection) -> AppResult<u64> {
        let count = CollectionEntity::find().count(db).await?;
        Ok(count)
    }
}

impl CollectionRepository {
    /// Create a new collection
    pub async fn create(db: &DatabaseConnection, name: &str) -> AppResult<Collection> {
        let model = ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(time::OffsetDateTime::now_utc()),
            ..Default::default()
        };

        let result = model.insert(db).await?;
        Ok(result.into())
    }

    /// Insert all links in a single statement
    pub async fn link_labels(db: &DatabaseConnection, links: &[CollectionLabelLink]) -> AppResult<()> {
        if links.is_empty() {
            return Ok(());
        }

        let models = links.iter().map(|link| LinkActiveModel {
            collection_id: Set(link.collection_id),
            label_id: Set(link.label_id),
        });

        CollectionLabelEntity::insert_many(models)
            .exec_without_returning(db)
            .await?;
        Ok(())
    }

    /// Labels attached to a collection, by name
    pub async fn labels_of(db: &DatabaseConnection, collection_id: i64) -> AppResult<Vec<Label>> {
        let models = LabelEntity::find()
            .inner_join(CollectionLabelEntity)
            .filter(collection_label::Column::CollectionId.eq(collection_id))
            .order_by_asc(label::Column::Name)
            .all(db)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }
}

// Conversion from SeaORM model to our domain model
impl From<collection::Model> for Collection {
    fn from(m: collection::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            created_at: m.created_at,
        }
    }
}
