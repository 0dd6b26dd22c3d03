use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

use super::super::config::DatabaseBackendConfig;
use crate::backend::database::{
    SqliteHaustierDeleter, SqliteHaustierFileStore, SqliteHaustierInserter, SqliteHaustierReader,
    SqliteHaustierUpdater, UnifiedHaustierDeleteOps, UnifiedHaustierFileOps,
    UnifiedHaustierInsertOps, UnifiedHaustierReadOps, UnifiedHaustierUpdateOps,
};
use crate::backend::{Backend, HaustierBackend};
use crate::error::{AppError, AppResult};
use crate::models::{Haustier, HaustierFile};
use crate::parser::{Pageable, Suchkriterien};

/// SQLite database backend implementation
pub struct SqliteBackend {
    pool: SqlitePool,
    read_ops: UnifiedHaustierReadOps<SqliteHaustierReader>,
    insert_ops: UnifiedHaustierInsertOps<SqliteHaustierInserter>,
    update_ops: UnifiedHaustierUpdateOps<SqliteHaustierUpdater>,
    delete_ops: UnifiedHaustierDeleteOps<SqliteHaustierDeleter>,
    file_ops: UnifiedHaustierFileOps<SqliteHaustierFileStore>,
}

impl SqliteBackend {
    /// Create a new SQLite backend instance
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            read_ops: UnifiedHaustierReadOps::new(SqliteHaustierReader::new(pool.clone())),
            insert_ops: UnifiedHaustierInsertOps::new(SqliteHaustierInserter::new(pool.clone())),
            update_ops: UnifiedHaustierUpdateOps::new(SqliteHaustierUpdater::new(pool.clone())),
            delete_ops: UnifiedHaustierDeleteOps::new(SqliteHaustierDeleter::new(pool.clone())),
            file_ops: UnifiedHaustierFileOps::new(SqliteHaustierFileStore::new(pool.clone())),
            pool,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Backend for SqliteBackend {
    async fn connect(config: &DatabaseBackendConfig) -> AppResult<Self> {
        config
            .validate()
            .map_err(|e| AppError::Configuration(format!("Invalid backend config: {}", e)))?;

        let options = SqliteConnectOptions::from_str(&config.sqlx_url())
            .map_err(|e| AppError::Configuration(format!("Invalid SQLite URL: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true);

        let mut pool_options =
            SqlitePoolOptions::new().acquire_timeout(Duration::from_secs(config.connection_timeout));
        if config.is_memory_database() {
            // The database lives as long as its single connection
            pool_options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        } else {
            pool_options = pool_options.max_connections(config.max_connections);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to SQLite: {}", e)))?;

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
impl HaustierBackend for SqliteBackend {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Beschreibung, Foto, HaustierArt};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    async fn backend() -> SqliteBackend {
        let backend = SqliteBackend::connect(&DatabaseBackendConfig::memory_sqlite())
            .await
            .unwrap();
        backend.init_schema().await.unwrap();
        backend
    }

    fn haustier(name: &str) -> Haustier {
        Haustier {
            id: None,
            version: None,
            name: name.to_string(),
            alter: 2,
            art: HaustierArt::Hund,
            gewicht: Decimal::new(1234, 2),
            groesse: Some(Decimal::new(4050, 2)),
            vermittelt: false,
            aufnahmedatum: NaiveDate::from_ymd_opt(2023, 8, 15).unwrap(),
            rasse: "Beagle".to_string(),
            schlagwoerter: vec!["VERSPIELT".to_string()],
            beschreibung: Some(Beschreibung {
                id: None,
                beschreibung: "Neugierig".to_string(),
                haltungshinweise: Some("Garten".to_string()),
            }),
            fotos: Some(vec![Foto {
                id: None,
                beschriftung: "Portrait".to_string(),
                content_type: "image/png".to_string(),
            }]),
            erzeugt: None,
            aktualisiert: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let backend = backend().await;
        let id = backend.create_haustier(&haustier("Rex")).await.unwrap();

        let found = backend.find_haustier_by_id(id, true).await.unwrap().unwrap();
        assert_eq!(found.version, Some(0));
        assert_eq!(found.gewicht, Decimal::new(1234, 2));
        assert_eq!(found.groesse, Some(Decimal::new(4050, 2)));
        assert_eq!(found.schlagwoerter, vec!["VERSPIELT"]);
        assert_eq!(found.fotos.unwrap().len(), 1);
        assert!(found.erzeugt.is_some());

        let without_fotos = backend.find_haustier_by_id(id, false).await.unwrap().unwrap();
        assert!(without_fotos.fotos.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected() {
        let backend = backend().await;
        backend.create_haustier(&haustier("Rex")).await.unwrap();

        let result = backend.create_haustier(&haustier("Rex")).await;
        assert!(matches!(result, Err(AppError::NameExists(_))));
        assert!(backend.exists_by_name("Rex", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_checks_version() {
        let backend = backend().await;
        let id = backend.create_haustier(&haustier("Rex")).await.unwrap();

        let mut changed = haustier("Rexi");
        changed.alter = 3;
        assert_eq!(backend.update_haustier(id, 0, &changed).await.unwrap(), Some(1));
        assert_eq!(backend.update_haustier(id, 0, &changed).await.unwrap(), None);

        let found = backend.find_haustier_by_id(id, false).await.unwrap().unwrap();
        assert_eq!(found.name, "Rexi");
        assert_eq!(found.alter, 3);
        assert_eq!(found.version, Some(1));
    }

    #[tokio::test]
    async fn test_delete_removes_dependents() {
        let backend = backend().await;
        let id = backend.create_haustier(&haustier("Rex")).await.unwrap();
        let file = HaustierFile {
            id: None,
            filename: "rex.png".to_string(),
            mimetype: "image/png".to_string(),
            data: vec![0x89, 0x50],
        };
        backend.replace_file(id, &file).await.unwrap();

        assert!(backend.delete_haustier(id).await.unwrap());
        assert!(!backend.delete_haustier(id).await.unwrap());
        assert!(backend.find_haustier_by_id(id, true).await.unwrap().is_none());
        assert!(backend.find_file_by_haustier_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_with_criteria() {
        let backend = backend().await;
        backend.create_haustier(&haustier("Rex")).await.unwrap();
        let mut katze = haustier("Mimi");
        katze.art = HaustierArt::Katze;
        katze.schlagwoerter = vec![];
        backend.create_haustier(&katze).await.unwrap();

        let criteria = Suchkriterien {
            art: Some(HaustierArt::Katze),
            ..Default::default()
        };
        let (found, total) = backend
            .find_haustiere(&criteria, &Pageable::default())
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(found[0].name, "Mimi");

        let criteria = Suchkriterien {
            verspielt: true,
            gewicht: Some(Decimal::new(20, 0)),
            beschreibung: Some("NEUGIER".to_string()),
            ..Default::default()
        };
        let (found, total) = backend
            .find_haustiere(&criteria, &Pageable::default())
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(found[0].name, "Rex");
    }
}
