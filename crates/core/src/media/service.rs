//! Media manager implementation.

use tracing::warn;
use uuid::Uuid;

use super::error::MediaError;
use super::types::{CreateMediaAssetInput, MediaAsset, MediaInfo, MediaStatus, UploadParams};
use crate::storage::{ObjectStore, StorageConfig, StorageError};

/// Uniform contract implemented by every storage backend.
///
/// Backends raise backend-native errors through this interface; no error
/// normalization happens here beyond the [`StorageError`] variants.
pub trait StorageBackend: Send + Sync {
    /// Name of this backend, recorded on served snapshots.
    fn provider_name(&self) -> &str;

    /// Validate and store media bytes, returning an `Uploaded` snapshot.
    fn upload(
        &self,
        params: &UploadParams,
    ) -> impl std::future::Future<Output = Result<MediaInfo, StorageError>> + Send;

    /// Refresh metadata and URL for stored media.
    fn get(
        &self,
        media_id: &str,
    ) -> impl std::future::Future<Output = Result<MediaInfo, StorageError>> + Send;

    /// Delete stored media. Returns `true` when an object was removed.
    fn delete(
        &self,
        media_id: &str,
    ) -> impl std::future::Future<Output = Result<bool, StorageError>> + Send;

    /// Resolve a download URL for stored media.
    fn resolve_url(
        &self,
        media_id: &str,
    ) -> impl std::future::Future<Output = Result<String, StorageError>> + Send;
}

/// Repository trait for durable media asset records.
///
/// This trait is implemented by the db crate. The media manager itself never
/// persists; the caller owns the record and is responsible for capturing
/// `MediaInfo.storage_provider` so later reads go to the right backend.
pub trait MediaAssetRepository: Send + Sync {
    /// Create a new media asset record.
    fn create(
        &self,
        input: CreateMediaAssetInput,
    ) -> impl std::future::Future<Output = Result<MediaAsset, MediaError>> + Send;

    /// Find a media asset record by ID.
    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<MediaAsset>, MediaError>> + Send;

    /// Update status and URL after a refresh. `Failed` is terminal.
    fn update_status(
        &self,
        id: Uuid,
        status: MediaStatus,
        url: Option<String>,
    ) -> impl std::future::Future<Output = Result<MediaAsset, MediaError>> + Send;

    /// Delete a media asset record by ID.
    fn delete(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<bool, MediaError>> + Send;
}

/// Media storage configuration: a primary backend plus an optional fallback.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct MediaStorageConfig {
    /// Primary storage backend.
    pub primary: StorageConfig,
    /// Optional fallback storage backend.
    #[serde(default)]
    pub fallback: Option<StorageConfig>,
}

/// Media manager presenting one interface over a primary and an optional
/// fallback storage backend.
///
/// Every operation applies the same failover policy: attempt the primary;
/// if it fails and a fallback is configured, log a warning and retry the
/// identical operation against the fallback, returning its result; otherwise
/// propagate the error unchanged. There is no partial-success
/// reconciliation across backends.
pub struct MediaManager<B: StorageBackend> {
    primary: B,
    fallback: Option<B>,
}

impl MediaManager<ObjectStore> {
    /// Construct object-store backends from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if either backend cannot be initialized; this fails
    /// at startup, never per-request.
    pub fn from_config(config: MediaStorageConfig) -> Result<Self, StorageError> {
        let primary = ObjectStore::from_config(config.primary)?;
        let fallback = config.fallback.map(ObjectStore::from_config).transpose()?;
        Ok(Self::new(primary, fallback))
    }
}

impl<B: StorageBackend> MediaManager<B> {
    /// Create a media manager over explicit backends.
    #[must_use]
    pub fn new(primary: B, fallback: Option<B>) -> Self {
        Self { primary, fallback }
    }

    /// Upload media bytes.
    ///
    /// # Errors
    ///
    /// Propagates the backend error when the primary fails and no fallback
    /// is configured, or when the fallback fails too.
    pub async fn upload(&self, params: &UploadParams) -> Result<MediaInfo, StorageError> {
        match self.primary.upload(params).await {
            Ok(info) => Ok(info),
            Err(err) => match &self.fallback {
                Some(fallback) => {
                    self.warn_failover("upload", &err);
                    fallback.upload(params).await
                }
                None => Err(err),
            },
        }
    }

    /// Refresh metadata and URL for stored media.
    ///
    /// # Errors
    ///
    /// Propagates the backend error after exhausting failover.
    pub async fn get(&self, media_id: &str) -> Result<MediaInfo, StorageError> {
        match self.primary.get(media_id).await {
            Ok(info) => Ok(info),
            Err(err) => match &self.fallback {
                Some(fallback) => {
                    self.warn_failover("get", &err);
                    fallback.get(media_id).await
                }
                None => Err(err),
            },
        }
    }

    /// Delete stored media. Returns `true` when an object was removed.
    ///
    /// # Errors
    ///
    /// Propagates the backend error after exhausting failover.
    pub async fn delete(&self, media_id: &str) -> Result<bool, StorageError> {
        match self.primary.delete(media_id).await {
            Ok(removed) => Ok(removed),
            Err(err) => match &self.fallback {
                Some(fallback) => {
                    self.warn_failover("delete", &err);
                    fallback.delete(media_id).await
                }
                None => Err(err),
            },
        }
    }

    /// Resolve a download URL for stored media.
    ///
    /// # Errors
    ///
    /// Propagates the backend error after exhausting failover.
    pub async fn get_url(&self, media_id: &str) -> Result<String, StorageError> {
        match self.primary.resolve_url(media_id).await {
            Ok(url) => Ok(url),
            Err(err) => match &self.fallback {
                Some(fallback) => {
                    self.warn_failover("get_url", &err);
                    fallback.resolve_url(media_id).await
                }
                None => Err(err),
            },
        }
    }

    fn warn_failover(&self, operation: &str, err: &StorageError) {
        warn!(
            provider = self.primary.provider_name(),
            operation,
            error = %err,
            "primary storage backend failed, retrying against fallback"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaKind;
    use bytes::Bytes;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock backend for testing: stores snapshots in a map and can be
    /// switched to fail every operation.
    struct MockBackend {
        name: String,
        fail: bool,
        objects: Mutex<HashMap<String, MediaInfo>>,
        upload_calls: Mutex<Vec<UploadParams>>,
    }

    impl MockBackend {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                fail: false,
                objects: Mutex::new(HashMap::new()),
                upload_calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(name: &str) -> Self {
            Self {
                fail: true,
                ..Self::new(name)
            }
        }
    }

    impl StorageBackend for MockBackend {
        fn provider_name(&self) -> &str {
            &self.name
        }

        async fn upload(&self, params: &UploadParams) -> Result<MediaInfo, StorageError> {
            self.upload_calls.lock().unwrap().push(params.clone());
            if self.fail {
                return Err(StorageError::operation("backend offline"));
            }
            let info = MediaInfo {
                id: format!("{}/{}", self.name, params.file_name),
                storage_provider: self.name.clone(),
                mime_type: params.mime_type.clone(),
                file_name: Some(params.file_name.clone()),
                size: Some(params.data.len() as u64),
                url: None,
                status: MediaStatus::Uploaded,
            };
            self.objects
                .lock()
                .unwrap()
                .insert(info.id.clone(), info.clone());
            Ok(info)
        }

        async fn get(&self, media_id: &str) -> Result<MediaInfo, StorageError> {
            if self.fail {
                return Err(StorageError::operation("backend offline"));
            }
            self.objects
                .lock()
                .unwrap()
                .get(media_id)
                .cloned()
                .ok_or_else(|| StorageError::not_found(media_id))
        }

        async fn delete(&self, media_id: &str) -> Result<bool, StorageError> {
            if self.fail {
                return Err(StorageError::operation("backend offline"));
            }
            Ok(self.objects.lock().unwrap().remove(media_id).is_some())
        }

        async fn resolve_url(&self, media_id: &str) -> Result<String, StorageError> {
            if self.fail {
                return Err(StorageError::operation("backend offline"));
            }
            Ok(format!("https://{}.example.com/{media_id}", self.name))
        }
    }

    fn sample_params() -> UploadParams {
        UploadParams {
            kind: MediaKind::Image,
            file_name: "promo.png".to_string(),
            mime_type: "image/png".to_string(),
            data: Bytes::from_static(b"\x89PNG fake bytes"),
        }
    }

    #[tokio::test]
    async fn test_upload_uses_primary_when_healthy() {
        let manager = MediaManager::new(MockBackend::new("primary"), Some(MockBackend::new("fb")));

        let info = manager.upload(&sample_params()).await.unwrap();
        assert_eq!(info.storage_provider, "primary");
        assert_eq!(info.status, MediaStatus::Uploaded);
        assert!(manager.fallback.as_ref().unwrap().upload_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_failover_invokes_fallback_once_with_same_params() {
        let manager = MediaManager::new(
            MockBackend::failing("primary"),
            Some(MockBackend::new("fb")),
        );

        let params = sample_params();
        let info = manager.upload(&params).await.unwrap();
        assert_eq!(info.storage_provider, "fb");

        let calls = manager.fallback.as_ref().unwrap().upload_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].file_name, params.file_name);
        assert_eq!(calls[0].mime_type, params.mime_type);
        assert_eq!(calls[0].data, params.data);
    }

    #[tokio::test]
    async fn test_upload_without_fallback_propagates_original_error() {
        let manager = MediaManager::new(MockBackend::failing("primary"), None);

        let err = manager.upload(&sample_params()).await.unwrap_err();
        assert!(matches!(err, StorageError::Operation(_)));
        assert!(err.to_string().contains("backend offline"));
    }

    #[tokio::test]
    async fn test_upload_failover_error_propagates_when_both_fail() {
        let manager = MediaManager::new(
            MockBackend::failing("primary"),
            Some(MockBackend::failing("fb")),
        );

        let err = manager.upload(&sample_params()).await.unwrap_err();
        assert!(matches!(err, StorageError::Operation(_)));
    }

    #[tokio::test]
    async fn test_upload_then_get_roundtrip_preserves_metadata() {
        let manager = MediaManager::new(MockBackend::new("primary"), None);

        let params = sample_params();
        let uploaded = manager.upload(&params).await.unwrap();
        let fetched = manager.get(&uploaded.id).await.unwrap();

        assert_eq!(fetched.mime_type, params.mime_type);
        assert_eq!(fetched.file_name.as_deref(), Some(params.file_name.as_str()));
    }

    #[tokio::test]
    async fn test_get_failover() {
        let primary = MockBackend::failing("primary");
        let fallback = MockBackend::new("fb");
        // Seed the fallback so the refresh can be satisfied there.
        let seeded = fallback
            .upload(&sample_params())
            .await
            .expect("seed upload");
        let manager = MediaManager::new(primary, Some(fallback));

        let info = manager.get(&seeded.id).await.unwrap();
        assert_eq!(info.storage_provider, "fb");
    }

    #[tokio::test]
    async fn test_get_url_failover() {
        let manager = MediaManager::new(
            MockBackend::failing("primary"),
            Some(MockBackend::new("fb")),
        );

        let url = manager.get_url("fb/promo.png").await.unwrap();
        assert!(url.contains("fb.example.com"));
    }

    #[tokio::test]
    async fn test_delete_without_fallback_propagates() {
        let manager = MediaManager::new(MockBackend::failing("primary"), None);

        let err = manager.delete("primary/promo.png").await.unwrap_err();
        assert!(matches!(err, StorageError::Operation(_)));
    }

    #[tokio::test]
    async fn test_delete_reports_missing_object() {
        let manager = MediaManager::new(MockBackend::new("primary"), None);

        assert!(!manager.delete("primary/absent.png").await.unwrap());
    }
}
