use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

use super::super::config::DatabaseBackendConfig;
use crate::backend::database::{
    PostgresHaustierDeleter, PostgresHaustierFileStore, PostgresHaustierInserter,
    PostgresHaustierReader, PostgresHaustierUpdater, UnifiedHaustierDeleteOps,
    UnifiedHaustierFileOps, UnifiedHaustierInsertOps, UnifiedHaustierReadOps,
    UnifiedHaustierUpdateOps,
};
use crate::backend::{Backend, HaustierBackend};
use crate::error::{AppError, AppResult};
use crate::models::{Haustier, HaustierFile};
use crate::parser::{Pageable, Suchkriterien};

/// PostgreSQL database backend implementation
///
/// Stores decimals as NUMERIC(5,2) and attachments as BYTEA.
pub struct PostgresBackend {
    pool: PgPool,
    read_ops: UnifiedHaustierReadOps<PostgresHaustierReader>,
    insert_ops: UnifiedHaustierInsertOps<PostgresHaustierInserter>,
    update_ops: UnifiedHaustierUpdateOps<PostgresHaustierUpdater>,
    delete_ops: UnifiedHaustierDeleteOps<PostgresHaustierDeleter>,
    file_ops: UnifiedHaustierFileOps<PostgresHaustierFileStore>,
}

impl PostgresBackend {
    /// Create a new PostgreSQL backend instance
    pub fn new(pool: PgPool) -> Self {
        // Create database-specific adapters
        let reader = PostgresHaustierReader::new(pool.clone());
        let inserter = PostgresHaustierInserter::new(pool.clone());
        let updater = PostgresHaustierUpdater::new(pool.clone());
        let deleter = PostgresHaustierDeleter::new(pool.clone());
        let file_store = PostgresHaustierFileStore::new(pool.clone());

        Self {
            pool,
            read_ops: UnifiedHaustierReadOps::new(reader),
            insert_ops: UnifiedHaustierInsertOps::new(inserter),
            update_ops: UnifiedHaustierUpdateOps::new(updater),
            delete_ops: UnifiedHaustierDeleteOps::new(deleter),
            file_ops: UnifiedHaustierFileOps::new(file_store),
        }
    }

    /// Get the connection pool reference
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Backend for PostgresBackend {
    async fn connect(config: &DatabaseBackendConfig) -> AppResult<Self> {
        config
            .validate()
            .map_err(|e| AppError::Configuration(format!("Invalid backend config: {}", e)))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&config.connection_url)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to PostgreSQL: {}", e)))?;

        Ok(Self::new(pool))
    }

    async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Health check failed: {}", e)))?;

        Ok(())
    }

    async fn init_schema(&self) -> AppResult<()> {
        super::schema::init_schema(&self.pool).await
    }

    async fn cleanup(&self) -> AppResult<()> {
        self.pool.close().await;
        Ok(())
    }
}

#[async_trait]
impl HaustierBackend for PostgresBackend {
    async fn find_haustier_by_id(&self, id: i64, mit_fotos: bool) -> AppResult<Option<Haustier>> {
        self.read_ops.find_haustier_by_id(id, mit_fotos).await
    }

    async fn find_haustiere(
        &self,
        criteria: &Suchkriterien,
        pageable: &Pageable,
    ) -> AppResult<(Vec<Haustier>, i64)> {
        self.read_ops.find_haustiere(criteria, pageable).await
    }

    async fn find_file_by_haustier_id(&self, haustier_id: i64) -> AppResult<Option<HaustierFile>> {
        self.file_ops.find_file_by_haustier_id(haustier_id).await
    }

    async fn exists_by_name(&self, name: &str, exclude_id: Option<i64>) -> AppResult<bool> {
        self.read_ops.exists_by_name(name, exclude_id).await
    }

    async fn create_haustier(&self, haustier: &Haustier) -> AppResult<i64> {
        self.insert_ops.create_haustier(haustier).await
    }

    async fn update_haustier(
        &self,
        id: i64,
        version: i32,
        haustier: &Haustier,
    ) -> AppResult<Option<i32>> {
        self.update_ops.update_haustier(id, version, haustier).await
    }

    async fn replace_file(&self, haustier_id: i64, file: &HaustierFile) -> AppResult<()> {
        self.file_ops.replace_file(haustier_id, file).await
    }

    async fn delete_haustier(&self, id: i64) -> AppResult<bool> {
        self.delete_ops.delete_haustier(id).await
    }
}
