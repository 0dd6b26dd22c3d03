use async_trait::async_trait;
use sqlx::SqlitePool;

use super::super::haustier_insert::{HaustierInserter, PreparedHaustierInsertData};
use super::{decimal_to_real, map_database_error};
use crate::error::AppResult;

/// SQLite-specific implementation of HaustierInserter
pub struct SqliteHaustierInserter {
    pool: SqlitePool,
}

impl SqliteHaustierInserter {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HaustierInserter for SqliteHaustierInserter {
    async fn execute_haustier_insert(&self, data: PreparedHaustierInsertData) -> AppResult<i64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_database_error(e, &data.name))?;

        let result = sqlx::query(
            r#"INSERT INTO haustier (version, name, "alter", art, gewicht, groesse, vermittelt,
               aufnahmedatum, rasse, schlagwoerter, erzeugt, aktualisiert)
               VALUES (0, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)"#,
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
        .execute(&mut *tx)
        .await
        .map_err(|e| map_database_error(e, &data.name))?;

        let id = result.last_insert_rowid();

        sqlx::query(
            "INSERT INTO beschreibung (beschreibung, haltungshinweise, haustier_id) VALUES (?1, ?2, ?3)",
        )
        .bind(&data.beschreibung.beschreibung)
        .bind(&data.beschreibung.haltungshinweise)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_database_error(e, &data.name))?;

        for foto in &data.fotos {
            sqlx::query(
                "INSERT INTO foto (beschriftung, content_type, haustier_id) VALUES (?1, ?2, ?3)",
            )
            .bind(&foto.beschriftung)
            .bind(&foto.content_type)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_database_error(e, &data.name))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_database_error(e, &data.name))?;

        Ok(id)
    }
}
