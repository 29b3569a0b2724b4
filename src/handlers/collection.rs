use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;
use crate::handlers::{LabelResponse, PaginationParams};
use crate::models::{Asset, CollectionDetail, CollectionSummary};
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Serialize, ToSchema)]
pub struct CollectionResponse {
    pub id: i64,
    pub name: String,
    pub labels: Vec<LabelResponse>,
    pub asset_count: u64,
    /// Storage URL of the oldest asset, if any
    pub cover_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub created_at: time::OffsetDateTime,
}

impl From<CollectionSummary> for CollectionResponse {
    fn from(s: CollectionSummary) -> Self {
        Self {
            id: s.collection.id,
            name: s.collection.name,
            labels: s.labels.into_iter().map(|l| l.into()).collect(),
            asset_count: s.asset_count,
            cover_url: s.cover_url,
            created_at: s.collection.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CollectionListResponse {
    pub data: Vec<CollectionResponse>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssetResponse {
    pub id: i64,
    pub name: String,
    pub storage_url: String,
    pub size_bytes: u64,
    pub content_type: String,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub created_at: time::OffsetDateTime,
}

impl From<Asset> for AssetResponse {
    fn from(a: Asset) -> Self {
        Self {
            id: a.id,
            name: a.name,
            storage_url: a.storage_url,
            size_bytes: a.size_bytes,
            content_type: a.content_type,
            created_at: a.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CollectionDetailResponse {
    pub id: i64,
    pub name: String,
    pub labels: Vec<LabelResponse>,
    pub assets: Vec<AssetResponse>,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub created_at: time::OffsetDateTime,
}

impl From<CollectionDetail> for CollectionDetailResponse {
    fn from(d: CollectionDetail) -> Self {
        Self {
            id: d.collection.id,
            name: d.collection.name,
            labels: d.labels.into_iter().map(|l| l.into()).collect(),
            assets: d.assets.into_iter().map(|a| a.into()).collect(),
            created_at: d.collection.created_at,
        }
    }
}

// ============ Handlers ============

/// List collections, newest first
#[utoipa::path(
    get,
    path = "/api/collections",
    params(PaginationParams),
    responses(
        (status = 200, description = "List of collections", body = CollectionListResponse)
    ),
    tag = "Collections"
)]
pub async fn list_collections(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<CollectionListResponse>> {
    let (limit, offset) = params.resolve();

    let collections = state.catalog.list_collections(limit, offset).await?;
    let total = state.catalog.count_collections().await?;

    Ok(Json(CollectionListResponse {
        data: collections.into_iter().map(|c| c.into()).collect(),
        total,
        limit,
        offset,
    }))
}

/// Get a collection with its labels and assets
#[utoipa::path(
    get,
    path = "/api/collections/{id}",
    params(
        ("id" = i64, Path, description = "Collection ID")
    ),
    responses(
        (status = 200, description = "Collection details", body = CollectionDetailResponse),
        (status = 404, description = "Collection not found")
    ),
    tag = "Collections"
)]
pub async fn get_collection(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<CollectionDetailResponse>> {
    let detail = state.catalog.find_collection(id).await?;
    Ok(Json(detail.into()))
}
