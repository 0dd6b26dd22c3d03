use async_trait::async_trait;
use sqlx::SqlitePool;

use super::super::haustier_update::{HaustierUpdater, PreparedHaustierUpdateData};
use super::{decimal_to_real, map_database_error};
use crate::error::AppResult;

/// SQLite-specific implementation of HaustierUpdater
pub struct SqliteHaustierUpdater {
    pool: SqlitePool,
}

impl SqliteHaustierUpdater {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HaustierUpdater for SqliteHaustierUpdater {
    async fn execute_haustier_update(&self, data: PreparedHaustierUpdateData) -> AppResult<Option<i32>> {
        let result = sqlx::query(
            r#"UPDATE haustier SET version = version + 1, name = ?1, "alter" = ?2, art = ?3,
               gewicht = ?4, groesse = ?5, vermittelt = ?6, aufnahmedatum = ?7, rasse = ?8,
               schlagwoerter = ?9, aktualisiert = ?10
               WHERE id = ?11 AND version = ?12"#,
        )
        .bind(&data.name)
        .bind(data.alter)
        .bind(&data.art)
        .bind(decimal_to_real(data.gewicht))
        .bind(data.groesse.map(decimal_to_real))
        .bind(data.vermittelt)
        .bind(data.aufnahmedatum)
        .bind(&data.rasse)
        .bind(&data.schlagwoerter)
        .bind(data.timestamp)
        .bind(data.id)
        .bind(data.expected_version)
        .execute(&self.pool)
        .await
        .map_err(|e| map_database_error(e, &data.name))?;

        if result.rows_affected() > 0 {
            Ok(Some(data.expected_version + 1))
        } else {
            Ok(None)
        }
    }
}
