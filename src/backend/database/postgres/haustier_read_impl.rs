use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::super::haustier_read::{HaustierReader, HaustierRow};
use super::super::query_builder::{BuiltQuery, SqlDialect};
use super::bind_param;
use crate::error::{AppError, AppResult};
use crate::models::Foto;

/// PostgreSQL-specific implementation of HaustierReader
pub struct PostgresHaustierReader {
    pool: PgPool,
}

impl PostgresHaustierReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn decode_row(row: &PgRow) -> Result<HaustierRow, sqlx::Error> {
        Ok(HaustierRow {
            id: row.try_get("id")?,
            version: row.try_get("version")?,
            name: row.try_get("name")?,
            alter: row.try_get("alter")?,
            art: row.try_get("art")?,
            gewicht: row.try_get("gewicht")?,
            groesse: row.try_get("groesse")?,
            vermittelt: row.try_get("vermittelt")?,
            aufnahmedatum: row.try_get("aufnahmedatum")?,
            rasse: row.try_get("rasse")?,
            schlagwoerter: row.try_get("schlagwoerter")?,
            erzeugt: row.try_get("erzeugt")?,
            aktualisiert: row.try_get("aktualisiert")?,
            beschreibung_id: row.try_get("beschreibung_id")?,
            beschreibung: row.try_get("beschreibung")?,
            haltungshinweise: row.try_get("haltungshinweise")?,
        })
    }
}

#[async_trait]
impl HaustierReader for PostgresHaustierReader {
    fn dialect(&self) -> SqlDialect {
        SqlDialect::PostgreSQL
    }

    async fn fetch_rows(&self, query: &BuiltQuery) -> AppResult<Vec<HaustierRow>> {
        let mut sql_query = sqlx::query(&query.sql);
        for param in &query.params {
            sql_query = bind_param(sql_query, param);
        }

        let rows = sql_query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to find pets: {}", e)))?;

        rows.iter()
            .map(|row| {
                Self::decode_row(row)
                    .map_err(|e| AppError::Database(format!("Failed to decode pet: {}", e)))
            })
            .collect()
    }

    async fn fetch_count(&self, query: &BuiltQuery) -> AppResult<i64> {
        let mut sql_query = sqlx::query(&query.sql);
        for param in &query.params {
            sql_query = bind_param(sql_query, param);
        }

        let row = sql_query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to count pets: {}", e)))?;

        row.try_get(0)
            .map_err(|e| AppError::Database(format!("Failed to count pets: {}", e)))
    }

    async fn fetch_fotos(&self, sql: &str, haustier_id: i64) -> AppResult<Vec<Foto>> {
        let rows = sqlx::query(sql)
            .bind(haustier_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to find photos: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|row| Foto {
                id: Some(row.get("id")),
                beschriftung: row.get("beschriftung"),
                content_type: row.get("content_type"),
            })
            .collect())
    }

    async fn count_by_name(&self, name: &str, exclude_id: Option<i64>) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM haustier WHERE name = $1 AND id <> $2")
                .bind(name)
                .bind(exclude_id.unwrap_or(0))
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::Database(format!("Failed to check name: {}", e)))?;
        Ok(count)
    }
}
