//! Store error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Migration failed: {0}")]
    Migration(String),

    /// A row could not be mapped back to its type.
    #[error("Invalid row: {0}")]
    InvalidRow(String),

    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
