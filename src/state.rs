use std::sync::Arc;

use sea_orm::{ConnectOptions, Database};
use sqlx::postgres::PgPool;

use crate::config::Config;
use crate::repositories::{Catalog, PgCatalog};
use crate::services::{IngestLimits, IngestService};
use crate::storage::{self, Storage};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Persistent store for collections, labels and assets
    pub catalog: Arc<dyn Catalog>,
    /// Object store for asset bytes
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    /// Connect to PostgreSQL (running migrations) and the configured object store
    pub async fn new(config: Config) -> Result<Self, AppStateError> {
        // Connect to PostgreSQL with SQLx (for migrations)
        let pg_pool = PgPool::connect(&config.database_url)
            .await
            .map_err(|e| AppStateError::Postgres(e.to_string()))?;

        sqlx::migrate!("./migrations")
            .run(&pg_pool)
            .await
            .map_err(|e| AppStateError::Migration(e.to_string()))?;
        pg_pool.close().await;

        // Connect to PostgreSQL with SeaORM
        let mut opt = ConnectOptions::new(&config.database_url);
        opt.max_connections(20)
            .min_connections(2)
            .sqlx_logging(true);

        let db = Database::connect(opt)
            .await
            .map_err(|e| AppStateError::Postgres(e.to_string()))?;

        let storage = storage::from_config(&config.storage)
            .await
            .map_err(|e| AppStateError::Storage(e.to_string()))?;

        Ok(Self {
            config,
            catalog: Arc::new(PgCatalog::new(db)),
            storage,
        })
    }

    /// Create AppState with custom backends (for testing)
    pub fn with_backends(
        config: Config,
        catalog: Arc<dyn Catalog>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        Self {
            config,
            catalog,
            storage,
        }
    }

    /// Pipeline bound to this state's backends and limits
    pub fn ingest_service(&self) -> IngestService {
        IngestService::new(
            self.catalog.clone(),
            self.storage.clone(),
            IngestLimits::from_config(&self.config),
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("PostgreSQL connection error: {0}")]
    Postgres(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Object storage error: {0}")]
    Storage(String),
}
