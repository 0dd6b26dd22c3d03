use crate::error::{AppError, AppResult};
use sqlx::PgPool;

const STATEMENTS: &[(&str, &str)] = &[
    (
        "haustier table",
        r#"
        CREATE TABLE IF NOT EXISTS haustier (
            id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
            version INTEGER NOT NULL DEFAULT 0,
            name TEXT NOT NULL,
            "alter" INTEGER NOT NULL,
            art TEXT NOT NULL CHECK (art IN ('HUND', 'KATZE', 'KLEINTIER')),
            gewicht NUMERIC(5,2) NOT NULL,
            groesse NUMERIC(5,2),
            vermittelt BOOLEAN NOT NULL DEFAULT FALSE,
            aufnahmedatum DATE NOT NULL,
            rasse TEXT NOT NULL,
            schlagwoerter TEXT,
            erzeugt TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            aktualisiert TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT haustier_name_key UNIQUE (name)
        )
        "#,
    ),
    (
        "beschreibung table",
        r#"
        CREATE TABLE IF NOT EXISTS beschreibung (
            id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
            beschreibung TEXT NOT NULL,
            haltungshinweise TEXT,
            haustier_id BIGINT NOT NULL UNIQUE REFERENCES haustier(id)
        )
        "#,
    ),
    (
        "foto table",
        r#"
        CREATE TABLE IF NOT EXISTS foto (
            id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
            beschriftung TEXT NOT NULL,
            content_type TEXT NOT NULL,
            haustier_id BIGINT NOT NULL REFERENCES haustier(id)
        )
        "#,
    ),
    (
        "foto index",
        "CREATE INDEX IF NOT EXISTS foto_haustier_id_idx ON foto(haustier_id)",
    ),
    (
        "haustier_file table",
        r#"
        CREATE TABLE IF NOT EXISTS haustier_file (
            id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
            data BYTEA NOT NULL,
            filename TEXT NOT NULL,
            mimetype TEXT,
            haustier_id BIGINT NOT NULL UNIQUE REFERENCES haustier(id)
        )
        "#,
    ),
];

/// Initialize the database schema for PostgreSQL
pub async fn init_schema(pool: &PgPool) -> AppResult<()> {
    for (what, sql) in STATEMENTS {
        sqlx::query(sql)
            .execute(pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to create {}: {}", what, e)))?;
    }
    Ok(())
}
