use async_trait::async_trait;
use sqlx::PgPool;

use super::super::haustier_update::{HaustierUpdater, PreparedHaustierUpdateData};
use super::map_database_error;
use crate::error::AppResult;

/// PostgreSQL-specific implementation of HaustierUpdater
pub struct PostgresHaustierUpdater {
    pool: PgPool,
}

impl PostgresHaustierUpdater {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HaustierUpdater for PostgresHaustierUpdater {
    async fn execute_haustier_update(&self, data: PreparedHaustierUpdateData) -> AppResult<Option<i32>> {
        let version: Option<i32> = sqlx::query_scalar(
            r#"UPDATE haustier SET version = version + 1, name = $1, "alter" = $2, art = $3,
               gewicht = $4, groesse = $5, vermittelt = $6, aufnahmedatum = $7, rasse = $8,
               schlagwoerter = $9, aktualisiert = $10
               WHERE id = $11 AND version = $12
               RETURNING version"#,
        )
        .bind(&data.name)
        .bind(data.alter)
        .bind(&data.art)
        .bind(data.gewicht)
        .bind(data.groesse)
        .bind(data.vermittelt)
        .bind(data.aufnahmedatum)
        .bind(&data.rasse)
        .bind(&data.schlagwoerter)
        .bind(data.timestamp)
        .bind(data.id)
        .bind(data.expected_version)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_database_error(e, &data.name))?;

        Ok(version)
    }
}
