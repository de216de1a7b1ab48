//! Media asset repository for database operations.
//!
//! Implements the durable media asset record owned by callers of the media
//! manager.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use crate::entities::media_assets;
use courier_core::media::{
    CreateMediaAssetInput, MediaAsset, MediaAssetRepository as MediaAssetRepoTrait, MediaError,
    MediaStatus,
};

/// Media asset repository implementation.
#[derive(Debug, Clone)]
pub struct MediaAssetRepository {
    db: DatabaseConnection,
}

impl MediaAssetRepository {
    /// Create a new media asset repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl MediaAssetRepoTrait for MediaAssetRepository {
    async fn create(&self, input: CreateMediaAssetInput) -> Result<MediaAsset, MediaError> {
        let active_model = media_assets::ActiveModel {
            id: Set(input.id),
            media_id: Set(input.media_id.clone()),
            storage_provider: Set(input.storage_provider.clone()),
            mime_type: Set(input.mime_type.clone()),
            file_name: Set(input.file_name.clone()),
            file_size: Set(input.file_size),
            url: Set(input.url.clone()),
            status: Set(input.status.as_str().to_string()),
            created_at: Set(Utc::now().into()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| MediaError::repository(e.to_string()))?;

        to_domain(model)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MediaAsset>, MediaError> {
        let model = media_assets::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| MediaError::repository(e.to_string()))?;

        model.map(to_domain).transpose()
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: MediaStatus,
        url: Option<String>,
    ) -> Result<MediaAsset, MediaError> {
        let model = media_assets::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| MediaError::repository(e.to_string()))?
            .ok_or_else(|| MediaError::not_found(id))?;

        let mut active_model: media_assets::ActiveModel = model.into();
        active_model.status = Set(status.as_str().to_string());
        if let Some(url) = url {
            active_model.url = Set(Some(url));
        }

        let model = active_model
            .update(&self.db)
            .await
            .map_err(|e| MediaError::repository(e.to_string()))?;

        to_domain(model)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, MediaError> {
        let result = media_assets::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| MediaError::repository(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}

/// Convert database model to domain model.
fn to_domain(model: media_assets::Model) -> Result<MediaAsset, MediaError> {
    let status = MediaStatus::parse(&model.status)
        .ok_or_else(|| MediaError::repository(format!("unknown media status: {}", model.status)))?;

    Ok(MediaAsset {
        id: model.id,
        media_id: model.media_id,
        storage_provider: model.storage_provider,
        mime_type: model.mime_type,
        file_name: model.file_name,
        file_size: model.file_size,
        url: model.url,
        status,
        created_at: model.created_at.with_timezone(&chrono::Utc),
    })
}
