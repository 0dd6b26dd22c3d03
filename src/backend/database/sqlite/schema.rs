use crate::error::{AppError, AppResult};
use sqlx::SqlitePool;

const STATEMENTS: &[(&str, &str)] = &[
    (
        "haustier table",
        r#"
        CREATE TABLE IF NOT EXISTS haustier (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            version INTEGER NOT NULL DEFAULT 0,
            name TEXT NOT NULL UNIQUE,
            "alter" INTEGER NOT NULL,
            art TEXT NOT NULL CHECK (art IN ('HUND', 'KATZE', 'KLEINTIER')),
            gewicht REAL NOT NULL,
            groesse REAL,
            vermittelt BOOLEAN NOT NULL DEFAULT 0,
            aufnahmedatum DATE NOT NULL,
            rasse TEXT NOT NULL,
            schlagwoerter TEXT,
            erzeugt DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            aktualisiert DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    ),
    (
        "beschreibung table",
        r#"
        CREATE TABLE IF NOT EXISTS beschreibung (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            beschreibung TEXT NOT NULL,
            haltungshinweise TEXT,
            haustier_id INTEGER NOT NULL UNIQUE REFERENCES haustier(id)
        )
        "#,
    ),
    (
        "foto table",
        r#"
        CREATE TABLE IF NOT EXISTS foto (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            beschriftung TEXT NOT NULL,
            content_type TEXT NOT NULL,
            haustier_id INTEGER NOT NULL REFERENCES haustier(id)
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
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            data BLOB NOT NULL,
            filename TEXT NOT NULL,
            mimetype TEXT,
            haustier_id INTEGER NOT NULL UNIQUE REFERENCES haustier(id)
        )
        "#,
    ),
];

/// Initialize the database schema for SQLite
pub async fn init_schema(pool: &SqlitePool) -> AppResult<()> {
    for (what, sql) in STATEMENTS {
        sqlx::query(sql)
            .execute(pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to create {}: {}", what, e)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    #[tokio::test]
    async fn test_schema_creation_is_idempotent() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        init_schema(&pool).await.unwrap();
        init_schema(&pool).await.unwrap();

        for table in ["haustier", "beschreibung", "foto", "haustier_file"] {
            let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
                .fetch_one(&pool)
                .await
                .unwrap();
            assert_eq!(count.0, 0);
        }
    }
}
