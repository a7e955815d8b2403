//! Storage error types.

use skycast_core::error::{DatabaseError, RusqliteErrorExt};
use thiserror::Error;

/// Errors from the local stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database rejected or failed an operation.
    #[error("Storage error: {0}")]
    Storage(#[from] DatabaseError),

    /// The blocking task running the query panicked or was cancelled.
    #[error("Storage task failed: {0}")]
    Task(String),
}

impl StoreError {
    /// Collapse into the shared database error type.
    pub fn into_database_error(self) -> DatabaseError {
        match self {
            Self::Storage(e) => e,
            Self::Task(msg) => DatabaseError::QueryFailed(msg),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Storage(e.into_database_error())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
