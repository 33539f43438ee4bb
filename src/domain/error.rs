//! Domain errors

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PagingError {
    #[error("Page size must be greater than zero (got {0})")]
    InvalidPageSize(u64),

    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Remote fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid records: {0}")]
    InvalidRecords(String),
}

impl PagingError {
    /// Whether the failure came from the round trip itself and a later
    /// refresh may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PagingError::Database(_) | PagingError::Backend(_) | PagingError::Timeout(_)
        )
    }
}

/// Result type for paging operations
pub type PagingResult<T> = Result<T, PagingError>;
