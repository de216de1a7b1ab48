//! Object store implementation using Apache OpenDAL.

use std::time::Duration;

use opendal::{ErrorKind, Operator, services};
use uuid::Uuid;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;
use crate::media::{MediaInfo, MediaStatus, StorageBackend, UploadParams};

/// Storage backend over an OpenDAL operator selected by provider config.
pub struct ObjectStore {
    operator: Operator,
    config: StorageConfig,
}

impl ObjectStore {
    /// Create an object store from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
            StorageProvider::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
        }
    }

    /// Validate an upload against config constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if media size or MIME type is invalid.
    pub fn validate_upload(&self, mime_type: &str, size: u64) -> Result<(), StorageError> {
        if size > self.config.max_file_size {
            return Err(StorageError::file_too_large(
                size,
                self.config.max_file_size,
            ));
        }

        if !self.config.is_mime_type_allowed(mime_type) {
            return Err(StorageError::invalid_mime_type(mime_type));
        }

        Ok(())
    }

    /// Generate a storage identifier for new media.
    ///
    /// Format: `{uuid}/{sanitized_filename}`
    #[must_use]
    pub fn generate_media_id(file_name: &str) -> String {
        format!("{}/{}", Uuid::new_v4(), sanitize_filename(file_name))
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the bucket/container name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        self.config.provider.bucket()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Resolve a download URL, returning `None` for backends that cannot
    /// presign (e.g. the local filesystem).
    async fn try_resolve_url(&self, media_id: &str) -> Result<Option<String>, StorageError> {
        let ttl = Duration::from_secs(self.config.url_ttl_secs);
        match self.operator.presign_read(media_id, ttl).await {
            Ok(presigned) => Ok(Some(presigned.uri().to_string())),
            Err(e) if e.kind() == ErrorKind::Unsupported => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl StorageBackend for ObjectStore {
    fn provider_name(&self) -> &str {
        self.config.provider.name()
    }

    async fn upload(&self, params: &UploadParams) -> Result<MediaInfo, StorageError> {
        self.validate_upload(&params.mime_type, params.data.len() as u64)?;

        let media_id = Self::generate_media_id(&params.file_name);
        self.operator
            .write_with(&media_id, params.data.clone())
            .content_type(&params.mime_type)
            .await?;

        let url = self.try_resolve_url(&media_id).await?;

        Ok(MediaInfo {
            id: media_id,
            storage_provider: self.name().to_string(),
            mime_type: params.mime_type.clone(),
            file_name: Some(sanitize_filename(&params.file_name)),
            size: Some(params.data.len() as u64),
            url,
            status: MediaStatus::Uploaded,
        })
    }

    async fn get(&self, media_id: &str) -> Result<MediaInfo, StorageError> {
        let meta = self.operator.stat(media_id).await?;
        let url = self.try_resolve_url(media_id).await?;

        Ok(MediaInfo {
            id: media_id.to_string(),
            storage_provider: self.name().to_string(),
            mime_type: meta
                .content_type()
                .map_or_else(|| "application/octet-stream".to_string(), String::from),
            file_name: file_name_of(media_id).map(String::from),
            size: Some(meta.content_length()),
            url,
            status: MediaStatus::Uploaded,
        })
    }

    async fn delete(&self, media_id: &str) -> Result<bool, StorageError> {
        if !self.operator.exists(media_id).await? {
            return Ok(false);
        }
        self.operator.delete(media_id).await?;
        Ok(true)
    }

    async fn resolve_url(&self, media_id: &str) -> Result<String, StorageError> {
        let ttl = Duration::from_secs(self.config.url_ttl_secs);
        let presigned = self.operator.presign_read(media_id, ttl).await?;
        Ok(presigned.uri().to_string())
    }
}

/// Extract the filename component of a media identifier.
fn file_name_of(media_id: &str) -> Option<&str> {
    media_id.split_once('/').map(|(_, name)| name)
}

/// Sanitize filename for storage identifiers.
///
/// Only allows ASCII alphanumeric characters, dots, hyphens, and underscores.
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Extension trait for pipe operator.
trait Pipe: Sized {
    fn pipe<F, R>(self, f: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        f(self)
    }
}

impl<T> Pipe for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn local_store() -> ObjectStore {
        let config = StorageConfig::new(StorageProvider::local_fs("./test"));
        ObjectStore::from_config(config).expect("should create store")
    }

    #[rstest]
    #[case("promo.png", "promo.png")]
    #[case("my file (1).pdf", "my_file__1_.pdf")]
    #[case("test@#$%.doc", "test____.doc")]
    #[case("日本語.pdf", "___.pdf")]
    fn test_sanitize_filename(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(sanitize_filename(raw), expected);
    }

    #[test]
    fn test_generate_media_id_format() {
        let id = ObjectStore::generate_media_id("promo image.png");
        let parts: Vec<&str> = id.split('/').collect();
        assert_eq!(parts.len(), 2);
        assert!(Uuid::parse_str(parts[0]).is_ok());
        assert_eq!(parts[1], "promo_image.png");
    }

    #[test]
    fn test_file_name_of() {
        assert_eq!(
            file_name_of("550e8400-e29b-41d4-a716-446655440000/promo.png"),
            Some("promo.png")
        );
        assert_eq!(file_name_of("bare-key"), None);
    }

    #[test]
    fn test_validate_upload_size() {
        let config =
            StorageConfig::new(StorageProvider::local_fs("./test")).with_max_file_size(1024);
        let store = ObjectStore::from_config(config).expect("should create store");

        // Valid size
        assert!(store.validate_upload("image/png", 512).is_ok());

        // Too large
        let err = store.validate_upload("image/png", 2048).unwrap_err();
        assert!(matches!(err, StorageError::FileTooLarge { .. }));
    }

    #[test]
    fn test_validate_upload_mime_type() {
        let store = local_store();

        // Valid MIME types
        assert!(store.validate_upload("image/jpeg", 1024).is_ok());
        assert!(store.validate_upload("application/pdf", 1024).is_ok());

        // Invalid MIME type
        let err = store
            .validate_upload("application/x-executable", 1024)
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidMimeType { .. }));
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(local_store().name(), "local");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        // Sanitized filenames only contain safe characters.
        proptest! {
            #[test]
            fn prop_sanitized_filename_safe_chars(filename in ".*") {
                let sanitized = sanitize_filename(&filename);

                for c in sanitized.chars() {
                    let is_safe = c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_';
                    prop_assert!(is_safe, "Unexpected character in sanitized filename: {}", c);
                }
            }
        }

        // MIME validation accepts exactly the allowed list.
        proptest! {
            #[test]
            fn prop_mime_type_validation(mime_type in "[a-z]+/[a-z0-9.-]+") {
                let store = local_store();
                let result = store.validate_upload(&mime_type, 1024);
                let is_allowed = store.config().is_mime_type_allowed(&mime_type);

                if is_allowed {
                    prop_assert!(result.is_ok(), "Expected Ok for allowed MIME type");
                } else {
                    let is_invalid = matches!(result, Err(StorageError::InvalidMimeType { .. }));
                    prop_assert!(is_invalid, "Expected InvalidMimeType error");
                }
            }
        }

        // Size validation rejects exactly the oversize uploads.
        proptest! {
            #[test]
            fn prop_file_size_validation(
                max_size in 1024u64..10_000_000,
                media_size in 0u64..20_000_000,
            ) {
                let config = StorageConfig::new(StorageProvider::local_fs("./test"))
                    .with_max_file_size(max_size);
                let store = ObjectStore::from_config(config).expect("should create store");

                let result = store.validate_upload("image/png", media_size);

                if media_size <= max_size {
                    prop_assert!(result.is_ok(), "Expected Ok for valid media size");
                } else {
                    let is_too_large = matches!(result, Err(StorageError::FileTooLarge { .. }));
                    prop_assert!(is_too_large, "Expected FileTooLarge error");
                }
            }
        }

        // Media id generation always yields `{uuid}/{safe_name}`.
        proptest! {
            #[test]
            fn prop_media_id_format(filename in "[a-zA-Z0-9_ -]{1,50}\\.[a-z]{2,4}") {
                let id = ObjectStore::generate_media_id(&filename);
                let parts: Vec<&str> = id.split('/').collect();
                prop_assert_eq!(parts.len(), 2);
                prop_assert!(Uuid::parse_str(parts[0]).is_ok());
            }
        }
    }
}
