//! Error types for Oila Core

use thiserror::Error;

use crate::limits::LimitError;
use crate::person::PersonId;
use crate::union::UnionId;
use crate::validate::ValidationError;

/// Result type alias using Oila's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Oila error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Person not found: {0}")]
    PersonNotFound(PersonId),

    #[error("Union not found: {0}")]
    UnionNotFound(UnionId),

    #[error("Rejected mutation: {0}")]
    Validation(#[from] ValidationError),

    #[error("Limit exceeded: {0}")]
    Limit(#[from] LimitError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
