//! Storage module for persisting filter selections
//!
//! The filter engine persists its state under a single key, the way a
//! browser page would use local storage. This module provides:
//! - The `KeyValueStore` trait the engine writes through
//! - A SQLite-backed store that survives across runs
//! - An in-memory store for tests and throwaway sessions

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{KeyValueStore, StorageError, StorageResult};

use std::path::Path;

/// Opens (or creates) the SQLite store at `path`
///
/// # Returns
///
/// * `Ok(SqliteStore)` - Successfully initialized storage
/// * `Err(StorageError)` - Failed to open the database
pub fn open_storage(path: &Path) -> StorageResult<SqliteStore> {
    SqliteStore::new(path)
}
