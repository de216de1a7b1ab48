//! Media error types.

use thiserror::Error;
use uuid::Uuid;

use crate::storage::StorageError;

/// Media record operation errors.
#[derive(Debug, Error)]
pub enum MediaError {
    /// Media asset record not found.
    #[error("media asset not found: {0}")]
    NotFound(Uuid),

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl MediaError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound(id)
    }

    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}
