use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use super::super::haustier_file::{HaustierFileStore, DEFAULT_MIMETYPE};
use crate::error::{AppError, AppResult};
use crate::models::HaustierFile;

/// SQLite-specific implementation of HaustierFileStore
pub struct SqliteHaustierFileStore {
    pool: SqlitePool,
}

impl SqliteHaustierFileStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HaustierFileStore for SqliteHaustierFileStore {
    async fn fetch_file(&self, haustier_id: i64) -> AppResult<Option<HaustierFile>> {
        let row = sqlx::query(
            "SELECT id, filename, mimetype, data FROM haustier_file WHERE haustier_id = ?1",
        )
        .bind(haustier_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to find file: {}", e)))?;

        Ok(row.map(|row| {
            let mimetype: Option<String> = row.get("mimetype");
            HaustierFile {
                id: Some(row.get("id")),
                filename: row.get("filename"),
                mimetype: mimetype.unwrap_or_else(|| DEFAULT_MIMETYPE.to_string()),
                data: row.get("data"),
            }
        }))
    }

    async fn execute_file_replace(&self, haustier_id: i64, file: HaustierFile) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query("DELETE FROM haustier_file WHERE haustier_id = ?1")
            .bind(haustier_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete file: {}", e)))?;

        sqlx::query(
            "INSERT INTO haustier_file (data, filename, mimetype, haustier_id) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&file.data)
        .bind(&file.filename)
        .bind(&file.mimetype)
        .bind(haustier_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(format!("Failed to store file: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit transaction: {}", e)))?;

        Ok(())
    }
}
