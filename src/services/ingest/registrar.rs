use crate::models::{Collection, CollectionLabelLink};
use crate::repositories::Catalog;
use crate::services::ingest::IngestError;

/// Result of registering a collection
#[derive(Debug, Clone)]
pub struct Registration {
    pub collection: Collection,
    /// False when the label batch was rejected; the collection stays regardless
    pub labels_linked: bool,
}

/// Create the collection, then attach its labels in one batch.
///
/// A failed collection insert aborts the run. A failed label batch is logged
/// and ingestion carries on with an unlabeled collection.
pub async fn register(
    catalog: &dyn Catalog,
    name: &str,
    label_ids: &[i64],
) -> Result<Registration, IngestError> {
    let collection = catalog
        .insert_collection(name)
        .await
        .map_err(|e| IngestError::CollectionCreation(e.to_string()))?;

    tracing::info!(collection_id = collection.id, name = %collection.name, "Collection created");

    let links: Vec<CollectionLabelLink> = label_ids
        .iter()
        .map(|&label_id| CollectionLabelLink {
            collection_id: collection.id,
            label_id,
        })
        .collect();

    let labels_linked = match catalog.insert_label_links(&links).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(
                collection_id = collection.id,
                label_ids = ?label_ids,
                error = %e,
                "Failed to link labels to collection (non-fatal)"
            );
            false
        }
    };

    Ok(Registration {
        collection,
        labels_linked,
    })
}
