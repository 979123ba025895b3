//! Storage traits and error types
//!
//! This module defines the trait interface for key-value backends and
//! associated error types.

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// String key-value store with local-storage semantics
///
/// Values are overwritten wholesale on every `set`; there is no merging
/// or versioning.
pub trait KeyValueStore {
    /// Reads the value stored under `key`
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Deletes the value stored under `key`, if any
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}
