//! Dispatch error types.

use thiserror::Error;

use crate::contact::ContactError;
use crate::messaging::MessagingError;

/// Outbound dispatch errors.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Malformed job: missing recipient identifier or message payload.
    /// Detected before any external call.
    #[error("invalid job: {0}")]
    Validation(String),

    /// The contact reference does not resolve to a phone number.
    #[error("contact not found: {0}")]
    ContactNotFound(String),

    /// Contact lookup failed for infrastructure reasons.
    #[error("contact lookup failed: {0}")]
    Resolver(String),

    /// The messaging provider rejected the send.
    #[error("provider send failed: {0}")]
    Upstream(#[from] MessagingError),
}

impl DispatchError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether retrying the same job could plausibly succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Validation(_) | Self::ContactNotFound(_) => false,
            Self::Resolver(_) => true,
            Self::Upstream(err) => err.is_transient(),
        }
    }
}

impl From<ContactError> for DispatchError {
    fn from(err: ContactError) -> Self {
        match err {
            ContactError::NotFound(contact_ref) => Self::ContactNotFound(contact_ref),
            ContactError::Repository(msg) => Self::Resolver(msg),
        }
    }
}
