//! Storage layer error types.

use indigo_types::IndigoError;
use thiserror::Error;

/// Errors that can occur in the storage layer
#[derive(Error, Debug)]
pub enum StorageError {
    /// RocksDB operation failed
    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),

    /// Column family not found
    #[error("Column family not found: {0}")]
    ColumnFamilyNotFound(String),

    /// Namespace or id is not a valid store id
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The attempt wrote more distinct keys than the backend allows
    #[error("Too many writes in one transaction (limit {limit}), rejected write to {key}")]
    TooManyWrites { limit: usize, key: String },

    /// Read of a key that already has a pending write in this attempt
    #[error("Object {0} has a pending update. Read operations aren't allowed after updates")]
    PendingWrite(String),

    /// Optimistic commit lost against a concurrent writer
    #[error("Transaction conflict: {0}")]
    Conflict(String),

    /// A lock guarding the backend was poisoned
    #[error("Lock error: {0}")]
    Lock(String),

    /// Backend returned something the contract doesn't allow
    #[error("Backend error: {0}")]
    Backend(String),
}

impl StorageError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StorageError::Conflict(_))
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl From<StorageError> for IndigoError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidKey(_) => IndigoError::InvalidArgument(err.to_string()),
            StorageError::TooManyWrites { .. } => IndigoError::ResourceExhausted(err.to_string()),
            StorageError::Serialization(msg) => IndigoError::Serialization(msg),
            other => IndigoError::Storage(other.to_string()),
        }
    }
}
