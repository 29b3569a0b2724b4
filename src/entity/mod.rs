pub mod asset;
pub mod collection;
pub mod collection_label;
pub mod label;
