pub mod auth;
pub mod collection;
pub mod common;
pub mod label;
pub mod upload;

pub use auth::{login, me, AdminResponse, AuthResponse, LoginRequest};
pub use collection::{
    get_collection, list_collections, AssetResponse, CollectionDetailResponse,
    CollectionListResponse, CollectionResponse,
};
pub use common::{validate_required, PaginationParams};
pub use label::{create_label, list_labels, CreateLabelRequest, LabelListResponse, LabelResponse};
pub use upload::{upload_collection, UploadForm, UploadResponse};
