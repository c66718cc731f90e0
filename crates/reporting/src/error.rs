//! Reporting error types.

use thiserror::Error;

/// Errors that can occur while answering a read-side query.
#[derive(Debug, Error)]
pub enum ReportingError {
    /// An error occurred in the entity store.
    #[error("Store error: {0}")]
    Store(#[from] inventory_store::StoreError),
}

/// Result type for reporting operations.
pub type Result<T> = std::result::Result<T, ReportingError>;
