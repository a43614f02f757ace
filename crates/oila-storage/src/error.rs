//! Storage error types

use thiserror::Error;

/// Result type alias for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Storage-specific error types
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Lock poisoned: {0}")]
    Lock(String),
}

impl From<StorageError> for oila_core::Error {
    fn from(error: StorageError) -> Self {
        oila_core::Error::Storage(error.to_string())
    }
}
