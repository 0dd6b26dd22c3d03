//! SQLite adapters
//!
//! SQLite has no fixed-point type, so decimals are stored as REAL and
//! rounded back to two places when read.

pub mod backend_impl;
pub mod haustier_delete_impl;
pub mod haustier_file_impl;
pub mod haustier_insert_impl;
pub mod haustier_read_impl;
pub mod haustier_update_impl;
pub mod schema;

pub use backend_impl::SqliteBackend;
pub use haustier_delete_impl::SqliteHaustierDeleter;
pub use haustier_file_impl::SqliteHaustierFileStore;
pub use haustier_insert_impl::SqliteHaustierInserter;
pub use haustier_read_impl::SqliteHaustierReader;
pub use haustier_update_impl::SqliteHaustierUpdater;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::Sqlite;

use crate::backend::database::query_builder::SqlParam;
use crate::error::AppError;

pub(crate) fn decimal_to_real(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

pub(crate) fn real_to_decimal(value: f64) -> Decimal {
    Decimal::from_f64_retain(value)
        .unwrap_or_default()
        .round_dp(2)
}

/// Bind a positional parameter to a SQLite query
pub(crate) fn bind_param<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    param: &'q SqlParam,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match param {
        SqlParam::Text(value) => query.bind(value.as_str()),
        SqlParam::Int(value) => query.bind(*value),
        SqlParam::BigInt(value) => query.bind(*value),
        SqlParam::Decimal(value) => query.bind(decimal_to_real(*value)),
        SqlParam::Bool(value) => query.bind(*value),
        SqlParam::Date(value) => query.bind(*value),
    }
}

/// Map SQLite-specific database errors to appropriate application errors
pub fn map_database_error(e: sqlx::Error, name: &str) -> AppError {
    match e {
        sqlx::Error::Database(db_err) => {
            let error_message = db_err.message();

            if error_message.contains("UNIQUE constraint failed: haustier.name") {
                AppError::NameExists(name.to_string())
            } else {
                AppError::Database(format!("Database error: {}", error_message))
            }
        }
        other => AppError::Database(format!("Database error: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_round_trip() {
        let value = Decimal::new(3055, 2);
        assert_eq!(real_to_decimal(decimal_to_real(value)), value);
        assert_eq!(real_to_decimal(0.1 + 0.2), Decimal::new(30, 2));
    }

    #[test]
    fn test_driver_errors_become_internal_database_errors() {
        let error = map_database_error(sqlx::Error::RowNotFound, "Bello");
        assert!(matches!(error, AppError::Database(_)));
        assert_eq!(error.status_code(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
