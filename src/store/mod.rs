//! # Student Store
//!
//! The backing-store seam for the students table. [`StudentStore`] is the
//! only thing the data access layer talks to, so a backend can be swapped
//! (PostgreSQL in production, SQLite for local runs and tests) without
//! touching validation or HTTP code.
//!
//! Writes go through [`StudentStore::write`], which hands the caller a
//! [`StudentTx`] inside a transaction that serialises concurrent writers.
//! Duplicate checks and the write that follows therefore see the same
//! table state.

pub mod config;
mod errors;
pub mod pg;
pub mod sql;
pub mod sqlite;

use std::sync::Arc;

pub use config::{Backend, StoreConfig};
pub use errors::{StoreError, StoreResult};
pub use pg::PostgresStore;
pub use sqlite::SqliteStore;

use crate::student::{Column, Filter, ListQuery, Student, StudentFields, StudentResult};

/// Work executed inside a write transaction. Returning `Err` rolls back.
pub type WriteWork<'a> = dyn FnMut(&mut dyn StudentTx) -> StudentResult<()> + 'a;

/// Statements available inside a write transaction
pub trait StudentTx {
    /// Whether any row other than `exclude_id` holds `value` in `column`
    fn exists(&mut self, column: Column, value: &str, exclude_id: Option<i64>)
        -> StoreResult<bool>;

    /// Insert a row and return its new id
    fn insert(&mut self, fields: &StudentFields) -> StoreResult<i64>;

    /// Replace all fields of row `id`; returns rows affected
    fn update(&mut self, id: i64, fields: &StudentFields) -> StoreResult<u64>;
}

/// A backing store for student rows
pub trait StudentStore: Send + Sync {
    /// Create the table if it does not exist
    fn init_schema(&self) -> StoreResult<()>;

    /// Run `work` in a serialised write transaction.
    ///
    /// Commits when `work` returns `Ok`, rolls back otherwise.
    fn write(&self, work: &mut WriteWork<'_>) -> StudentResult<()>;

    /// Number of rows matching `filter`
    fn count(&self, filter: Option<&Filter>) -> StoreResult<u64>;

    /// The rows of one page, sorted
    fn fetch_page(&self, query: &ListQuery) -> StoreResult<Vec<Student>>;

    /// Delete row `id`; returns rows affected
    fn delete(&self, id: i64) -> StoreResult<u64>;
}

/// Open the store selected by `config.url`
pub fn open(config: &StoreConfig) -> StoreResult<Arc<dyn StudentStore>> {
    match config.backend()? {
        Backend::Postgres => Ok(Arc::new(PostgresStore::new(config)?)),
        Backend::Sqlite(path) => Ok(Arc::new(SqliteStore::open(&path)?)),
        Backend::SqliteMemory => Ok(Arc::new(SqliteStore::in_memory()?)),
    }
}
