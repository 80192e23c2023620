//! Storage error types.
//!
//! Used by repository implementations and callers of storage APIs.

use formbot_core::FormbotError;
use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        StorageError::Database(e.to_string())
    }
}

impl From<StorageError> for FormbotError {
    fn from(e: StorageError) -> Self {
        FormbotError::Database(e.to_string())
    }
}
