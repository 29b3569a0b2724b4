pub mod auth;
pub mod ingest;

pub use auth::{AuthService, Claims};
pub use ingest::{IngestError, IngestLimits, IngestReport, IngestService, UploadSubmission};
