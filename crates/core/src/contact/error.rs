//! Contact error types.

use thiserror::Error;

/// Contact resolution errors.
#[derive(Debug, Error)]
pub enum ContactError {
    /// No contact with that reference, or the contact has no phone on record.
    #[error("contact not found: {0}")]
    NotFound(String),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl ContactError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(contact_ref: impl Into<String>) -> Self {
        Self::NotFound(contact_ref.into())
    }

    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}
