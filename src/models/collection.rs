use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::{Asset, Label};

/// One ingested batch of images
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: i64,
    pub name: String,
    pub created_at: OffsetDateTime,
}

/// Link between a collection and a pre-existing label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionLabelLink {
    pub collection_id: i64,
    pub label_id: i64,
}

/// Listing row: a collection plus what a browse page needs to render it
#[derive(Debug, Clone, Serialize)]
pub struct CollectionSummary {
    pub collection: Collection,
    pub labels: Vec<Label>,
    pub asset_count: u64,
    pub cover_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionDetail {
    pub collection: Collection,
    pub labels: Vec<Label>,
    /// Oldest first
    pub assets: Vec<Asset>,
}
