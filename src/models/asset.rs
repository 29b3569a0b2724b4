use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One stored image belonging to exactly one collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: i64,
    pub collection_id: i64,
    pub name: String,
    pub storage_url: String,
    pub size_bytes: u64,
    pub content_type: String,
    pub created_at: OffsetDateTime,
}

/// Metadata written right after a successful object-store upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAsset {
    pub collection_id: i64,
    pub name: String,
    pub storage_url: String,
    pub size_bytes: u64,
    pub content_type: String,
}
