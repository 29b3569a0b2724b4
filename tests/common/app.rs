use std::sync::Arc;

use axum_test::TestServer;
use gallery_ingest::build_router;
use gallery_ingest::config::{
    default_image_extensions, AdminCredentials, Config, LogFormat, StorageConfig,
    DEFAULT_MAX_ENTRY_BYTES, DEFAULT_MAX_UPLOAD_BYTES,
};
use gallery_ingest::repositories::InMemoryCatalog;
use gallery_ingest::state::AppState;
use gallery_ingest::storage::InMemoryStorage;

#[allow(dead_code)]
pub const ADMIN_EMAIL: &str = "admin@example.com";
#[allow(dead_code)]
pub const ADMIN_PASSWORD: &str = "gallery-admin";

/// Test configuration
pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused@localhost/gallery_test".to_string(),
        jwt_secret: "test-jwt-secret-that-is-at-least-32-characters-long".to_string(),
        jwt_expiration_hours: 24,
        admin: AdminCredentials {
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
        },
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
        image_extensions: default_image_extensions(),
        storage: StorageConfig::Local {
            root: "./unused".to_string(),
            public_base_url: "http://127.0.0.1/objects".to_string(),
        },
        host: "127.0.0.1".to_string(),
        port: 0,
        log_format: LogFormat::Pretty,
    }
}

/// Test application wrapper
#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    /// Handles onto the same backends the router uses
    pub catalog: InMemoryCatalog,
    pub storage: InMemoryStorage,
}

#[allow(dead_code)]
impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    /// Create a test application with a custom configuration
    pub async fn with_config(config: Config) -> Self {
        // In-memory backends avoid PostgreSQL and S3 in tests
        let catalog = InMemoryCatalog::new();
        let storage = InMemoryStorage::new();

        let state = AppState::with_backends(
            config,
            Arc::new(catalog.clone()),
            Arc::new(storage.clone()),
        );

        let router = build_router(state.clone());
        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            state,
            catalog,
            storage,
        }
    }
}
