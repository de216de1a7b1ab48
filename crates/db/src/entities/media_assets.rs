//! `SeaORM` Entity for the media_assets table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "media_assets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Backend-scoped media identifier (storage key).
    pub media_id: String,
    /// Backend that stored the asset; later reads must target it.
    pub storage_provider: String,
    pub mime_type: String,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
    pub url: Option<String>,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
