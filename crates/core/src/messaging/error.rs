//! Messaging error types.

use thiserror::Error;

/// Messaging provider errors.
#[derive(Debug, Error)]
pub enum MessagingError {
    /// Client could not be constructed from configuration.
    #[error("messaging configuration error: {0}")]
    Configuration(String),

    /// The provider rejected the call.
    ///
    /// 4xx responses are permanent (bad template, bad params, size/type
    /// limits); 5xx responses are likely transient.
    #[error("provider rejected request ({status}): {message}")]
    Api {
        /// HTTP status returned by the provider.
        status: u16,
        /// Provider error body.
        message: String,
    },

    /// The request timed out.
    #[error("provider request timed out")]
    Timeout,

    /// Network-level failure before a response was received.
    #[error("network error: {0}")]
    Network(String),

    /// The provider returned a body this client cannot interpret.
    #[error("unexpected provider response: {0}")]
    InvalidResponse(String),
}

impl MessagingError {
    /// Whether retrying the same call could plausibly succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Api { status, .. } => *status >= 500,
            Self::Timeout | Self::Network(_) => true,
            Self::Configuration(_) | Self::InvalidResponse(_) => false,
        }
    }
}

impl From<reqwest::Error> for MessagingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err.to_string())
        }
    }
}
