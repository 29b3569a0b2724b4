use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::entity::label::{self, ActiveModel, Column, Entity as LabelEntity};
use crate::error::{AppError, AppResult};
use crate::models::{CreateLabel, Label};

/// Label repository for database operations
pub struct LabelRepository;

impl LabelRepository {
    /// Create a new label. Names are unique.
    pub async fn create(db: &DatabaseConnection, input: &CreateLabel) -> AppResult<Label> {
        let model = ActiveModel {
            name: Set(input.name.clone()),
            created_at: Set(time::OffsetDateTime::now_utc()),
            ..Default::default()
        };

        let result = model.insert(db).await.map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => AppError::Conflict(format!("Label '{}'", input.name)),
            other => other,
        })?;
        Ok(result.into())
    }

    /// All labels, newest first
    pub async fn list_all(db: &DatabaseConnection) -> AppResult<Vec<Label>> {
        let models = LabelEntity::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }
}

impl From<label::Model> for Label {
    fn from(m: label::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            created_at: m.created_at,
        }
    }
}
