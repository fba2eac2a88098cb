//! Storage module for the deduplicating category store
//!
//! One SQLite table holds every extracted category, keyed by a unique
//! `name`. All writes go through a conditional insert so concurrent callers
//! (threads, processes, or async tasks) can race on the same name without
//! external locking: the loser's write is a silent no-op enforced by the
//! uniqueness constraint itself.

mod pool;
mod schema;
mod sqlite;

pub use pool::{PooledStore, StorePool};
pub use schema::{initialize_schema, SCHEMA_SQL};
pub use sqlite::CategoryStore;

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Store pool closed")]
    PoolClosed,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A persisted category row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRecord {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}
