//! Database abstraction layer for pet records
//!
//! This module provides a unified interface for database operations across
//! different database backends (PostgreSQL, SQLite) while keeping
//! database-specific SQL in the adapters.
//!
//! # Architecture
//!
//! ```text
//! Common Logic (haustier_insert.rs, haustier_update.rs, query_builder.rs, ...)
//!     ↓
//! Database-specific implementations
//!     ├── postgres/ (PostgreSQL-specific code)
//!     └── sqlite/   (SQLite-specific code)
//! ```

pub mod config;
pub mod haustier_delete;
pub mod haustier_file;
pub mod haustier_insert;
pub mod haustier_read;
pub mod haustier_update;
pub mod postgres;
pub mod query_builder;
pub mod sqlite;

pub use config::DatabaseBackendConfig;

pub use haustier_delete::UnifiedHaustierDeleteOps;
pub use haustier_file::UnifiedHaustierFileOps;
pub use haustier_insert::UnifiedHaustierInsertOps;
pub use haustier_read::UnifiedHaustierReadOps;
pub use haustier_update::UnifiedHaustierUpdateOps;
pub use query_builder::{QueryBuilder, SqlDialect, SqlParam};

pub use postgres::{
    PostgresHaustierDeleter, PostgresHaustierFileStore, PostgresHaustierInserter,
    PostgresHaustierReader, PostgresHaustierUpdater,
};
pub use sqlite::{
    SqliteHaustierDeleter, SqliteHaustierFileStore, SqliteHaustierInserter, SqliteHaustierReader,
    SqliteHaustierUpdater,
};
