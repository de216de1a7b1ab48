//! Messaging types and wire structures.

use serde::{Deserialize, Serialize};

/// Provider-assigned identifier for an accepted outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageHandle(pub String);

impl std::fmt::Display for MessageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to media attached to a template message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    /// Publicly reachable URL of the media.
    pub url: String,
    /// Filename shown to the recipient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// Metadata the provider reports for hosted media.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderMedia {
    /// Short-lived download URL.
    pub url: String,
    /// MIME type.
    pub mime_type: String,
    /// SHA-256 checksum of the content.
    #[serde(default)]
    pub sha256: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub file_size: Option<u64>,
}
