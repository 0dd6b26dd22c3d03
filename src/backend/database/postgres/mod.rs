//! PostgreSQL adapters

pub mod backend_impl;
pub mod haustier_delete_impl;
pub mod haustier_file_impl;
pub mod haustier_insert_impl;
pub mod haustier_read_impl;
pub mod haustier_update_impl;
pub mod schema;

pub use backend_impl::PostgresBackend;
pub use haustier_delete_impl::PostgresHaustierDeleter;
pub use haustier_file_impl::PostgresHaustierFileStore;
pub use haustier_insert_impl::PostgresHaustierInserter;
pub use haustier_read_impl::PostgresHaustierReader;
pub use haustier_update_impl::PostgresHaustierUpdater;

use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::Postgres;

use crate::backend::database::query_builder::SqlParam;
use crate::error::AppError;

const UNIQUE_VIOLATION: &str = "23505";
const NAME_CONSTRAINT: &str = "haustier_name_key";

/// Bind a positional parameter to a PostgreSQL query
pub(crate) fn bind_param<'q>(
    query: Query<'q, Postgres, PgArguments>,
    param: &'q SqlParam,
) -> Query<'q, Postgres, PgArguments> {
    match param {
        SqlParam::Text(value) => query.bind(value.as_str()),
        SqlParam::Int(value) => query.bind(*value),
        SqlParam::BigInt(value) => query.bind(*value),
        SqlParam::Decimal(value) => query.bind(*value),
        SqlParam::Bool(value) => query.bind(*value),
        SqlParam::Date(value) => query.bind(*value),
    }
}

/// Map PostgreSQL-specific database errors to appropriate application errors
pub fn map_database_error(e: sqlx::Error, name: &str) -> AppError {
    match e {
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
                && db_err.constraint() == Some(NAME_CONSTRAINT)
            {
                return AppError::NameExists(name.to_string());
            }
            AppError::Database(format!("Database error: {}", db_err.message()))
        }
        other => AppError::Database(format!("Database error: {}", other)),
    }
}
