use crate::error::AppResult;
use crate::models::{Haustier, HaustierFile};
use crate::parser::{Pageable, Suchkriterien};
use async_trait::async_trait;
use std::sync::Arc;

pub mod database;

/// Supported database backend types
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseType {
    PostgreSQL,
    SQLite,
}

impl DatabaseType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "postgresql" | "postgres" => Some(DatabaseType::PostgreSQL),
            "sqlite" => Some(DatabaseType::SQLite),
            _ => None,
        }
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseType::PostgreSQL => write!(f, "postgresql"),
            DatabaseType::SQLite => write!(f, "sqlite"),
        }
    }
}

/// Core backend abstraction
///
/// Connection handling and schema setup shared by every storage
/// implementation.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Connect and initialize the storage backend
    async fn connect(config: &crate::backend::database::DatabaseBackendConfig) -> AppResult<Self>
    where
        Self: Sized;

    /// Check if the storage backend is healthy and accessible
    async fn health_check(&self) -> AppResult<()>;

    /// Create tables and indexes if they do not exist yet
    async fn init_schema(&self) -> AppResult<()>;

    /// Clean up resources when storage is no longer needed
    async fn cleanup(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Pet record persistence
///
/// Handles the pet CRUD operations together with the nested description,
/// photos and the binary attachment.
#[async_trait]
pub trait HaustierBackend: Backend {
    /// Find a pet with its description, optionally with its photos
    async fn find_haustier_by_id(&self, id: i64, mit_fotos: bool) -> AppResult<Option<Haustier>>;

    /// Find pets matching the criteria; returns one page and the total count
    async fn find_haustiere(
        &self,
        criteria: &Suchkriterien,
        pageable: &Pageable,
    ) -> AppResult<(Vec<Haustier>, i64)>;

    /// Find the binary attachment of a pet
    async fn find_file_by_haustier_id(&self, haustier_id: i64) -> AppResult<Option<HaustierFile>>;

    /// Check whether a pet with this name exists, ignoring `exclude_id`
    async fn exists_by_name(&self, name: &str, exclude_id: Option<i64>) -> AppResult<bool>;

    /// Insert a pet with description and photos; returns the generated ID
    async fn create_haustier(&self, haustier: &Haustier) -> AppResult<i64>;

    /// Update the scalar fields if the stored version equals `version`
    ///
    /// Returns the new version, or `None` if no row with this ID and
    /// version exists.
    async fn update_haustier(
        &self,
        id: i64,
        version: i32,
        haustier: &Haustier,
    ) -> AppResult<Option<i32>>;

    /// Store a file for a pet, replacing a previous one
    async fn replace_file(&self, haustier_id: i64, file: &HaustierFile) -> AppResult<()>;

    /// Delete a pet with all dependent rows
    async fn delete_haustier(&self, id: i64) -> AppResult<bool>;
}

/// Factory for creating backend instances
pub struct BackendFactory;

impl BackendFactory {
    /// Create a backend based on configuration
    pub async fn create(
        config: &crate::backend::database::DatabaseBackendConfig,
    ) -> AppResult<Arc<dyn HaustierBackend>> {
        let backend = Self::create_backend(config).await?;
        Ok(Arc::from(backend))
    }

    /// Create a backend based on configuration (returns Box)
    pub async fn create_backend(
        config: &crate::backend::database::DatabaseBackendConfig,
    ) -> AppResult<Box<dyn HaustierBackend>> {
        match config.database_type {
            DatabaseType::PostgreSQL => {
                let backend =
                    crate::backend::database::postgres::PostgresBackend::connect(config).await?;
                Ok(Box::new(backend))
            }
            DatabaseType::SQLite => {
                let backend =
                    crate::backend::database::sqlite::SqliteBackend::connect(config).await?;
                Ok(Box::new(backend))
            }
        }
    }
}
