pub mod asset;
pub mod collection;
pub mod label;

pub use asset::*;
pub use collection::*;
pub use label::*;
