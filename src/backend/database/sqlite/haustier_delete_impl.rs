use async_trait::async_trait;
use sqlx::SqlitePool;

use super::super::haustier_delete::{HaustierDeleteProcessor, HaustierDeleter};
use crate::error::{AppError, AppResult};

/// SQLite-specific implementation of HaustierDeleter
pub struct SqliteHaustierDeleter {
    pool: SqlitePool,
}

impl SqliteHaustierDeleter {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HaustierDeleter for SqliteHaustierDeleter {
    async fn execute_haustier_delete(&self, id: i64) -> AppResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        for table in HaustierDeleteProcessor::dependent_tables() {
            let sql = format!("DELETE FROM {} WHERE haustier_id = ?1", table);
            sqlx::query(&sql)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::Database(format!("Failed to delete from {}: {}", table, e)))?;
        }

        let result = sqlx::query("DELETE FROM haustier WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete pet: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit transaction: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
