//! Media types and data structures.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Media kind classification, following the messaging provider's taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Image (jpeg, png, webp).
    Image,
    /// Video clip.
    Video,
    /// Voice note or audio clip.
    Audio,
    /// Document of any kind.
    #[default]
    Document,
    /// Sticker.
    Sticker,
}

impl MediaKind {
    /// Convert to the string value used on the wire and in the database.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Document => "document",
            Self::Sticker => "sticker",
        }
    }

    /// Parse from a stored string value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            "audio" => Some(Self::Audio),
            "document" => Some(Self::Document),
            "sticker" => Some(Self::Sticker),
            _ => None,
        }
    }
}

/// Lifecycle status of a media asset.
///
/// `Pending` (upload in flight) transitions to `Uploaded` once the backend
/// accepts the bytes, or to `Failed` when the backend rejects them. Both
/// `Uploaded` and `Failed` are terminal; there is no transition out of
/// `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaStatus {
    /// Upload in flight.
    Pending,
    /// Backend accepted the bytes; URL and metadata available.
    Uploaded,
    /// Backend rejected the upload (size/type limit). Terminal.
    Failed,
}

impl MediaStatus {
    /// Convert to database string value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Uploaded => "uploaded",
            Self::Failed => "failed",
        }
    }

    /// Parse from database string value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "uploaded" => Some(Self::Uploaded),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Upload parameters accepted by every storage backend.
#[derive(Debug, Clone)]
pub struct UploadParams {
    /// Media kind classification.
    pub kind: MediaKind,
    /// Original filename.
    pub file_name: String,
    /// MIME type of the payload.
    pub mime_type: String,
    /// Raw media bytes.
    pub data: Bytes,
}

/// Transient snapshot of a media asset as served by a storage backend.
///
/// The manager never persists these; callers record the fields they need
/// (notably `storage_provider`, which identifies the backend that actually
/// served the asset after any failover).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaInfo {
    /// Backend-scoped media identifier (storage key).
    pub id: String,
    /// Name of the backend that served this snapshot.
    pub storage_provider: String,
    /// MIME type.
    pub mime_type: String,
    /// Original filename, when known.
    pub file_name: Option<String>,
    /// Size in bytes, when known.
    pub size: Option<u64>,
    /// Download URL, when the backend can produce one.
    pub url: Option<String>,
    /// Lifecycle status.
    pub status: MediaStatus,
}

/// Input for creating a durable media asset record.
#[derive(Debug, Clone)]
pub struct CreateMediaAssetInput {
    /// Record ID.
    pub id: Uuid,
    /// Backend-scoped media identifier.
    pub media_id: String,
    /// Backend that stored the asset.
    pub storage_provider: String,
    /// MIME type.
    pub mime_type: String,
    /// Original filename.
    pub file_name: Option<String>,
    /// Size in bytes.
    pub file_size: Option<i64>,
    /// Download URL at record time.
    pub url: Option<String>,
    /// Lifecycle status.
    pub status: MediaStatus,
}

/// Durable media asset record (owned by the caller, not the manager).
#[derive(Debug, Clone)]
pub struct MediaAsset {
    /// Record ID.
    pub id: Uuid,
    /// Backend-scoped media identifier.
    pub media_id: String,
    /// Backend that stored the asset.
    pub storage_provider: String,
    /// MIME type.
    pub mime_type: String,
    /// Original filename.
    pub file_name: Option<String>,
    /// Size in bytes.
    pub file_size: Option<i64>,
    /// Download URL as of the last refresh.
    pub url: Option<String>,
    /// Lifecycle status.
    pub status: MediaStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
