//! Store Errors
//!
//! Error types for account and user persistence.

/// Errors that can occur in a store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique column already holds the value
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A row expected to exist was not there at write time
    #[error("Record missing: {0}")]
    Missing(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Check if this error is a uniqueness conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }
}

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
