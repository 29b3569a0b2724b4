use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppResult;
use crate::handlers::validate_required;
use crate::middlewares::AdminUser;
use crate::models::Label;
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLabelRequest {
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LabelResponse {
    pub id: i64,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub created_at: time::OffsetDateTime,
}

impl From<Label> for LabelResponse {
    fn from(l: Label) -> Self {
        Self {
            id: l.id,
            name: l.name,
            created_at: l.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LabelListResponse {
    pub data: Vec<LabelResponse>,
}

// ============ Handlers ============

/// Create a label
#[utoipa::path(
    post,
    path = "/api/labels",
    request_body = CreateLabelRequest,
    responses(
        (status = 201, description = "Label created", body = LabelResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Label already exists")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Labels"
)]
pub async fn create_label(
    admin: AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateLabelRequest>,
) -> AppResult<(StatusCode, Json<LabelResponse>)> {
    let name = validate_required(&payload.name, "Label name", 100)?;

    let label = state.catalog.create_label(&name).await?;
    tracing::info!(label_id = label.id, name = %label.name, admin = %admin.email, "Label created");

    Ok((StatusCode::CREATED, Json(label.into())))
}

/// List all labels, newest first
#[utoipa::path(
    get,
    path = "/api/labels",
    responses(
        (status = 200, description = "All labels", body = LabelListResponse)
    ),
    tag = "Labels"
)]
pub async fn list_labels(State(state): State<AppState>) -> AppResult<Json<LabelListResponse>> {
    let labels = state.catalog.list_labels().await?;

    Ok(Json(LabelListResponse {
        data: labels.into_iter().map(|l| l.into()).collect(),
    }))
}
