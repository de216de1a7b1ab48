//! Media management for messaging assets.
//!
//! This module provides business logic for binary media handling:
//! - Upload validation and dispatch to a storage backend
//! - Metadata/URL refresh for stored media
//! - Deletion
//! - Transparent failover from a primary to a fallback backend
//!
//! The manager returns transient snapshots only; the durable asset record is
//! owned by the caller through [`MediaAssetRepository`].

mod error;
mod service;
mod types;

pub use error::MediaError;
pub use service::{MediaAssetRepository, MediaManager, MediaStorageConfig, StorageBackend};
pub use types::{CreateMediaAssetInput, MediaAsset, MediaInfo, MediaKind, MediaStatus, UploadParams};
