//! `SeaORM` entity definitions.

pub mod contacts;
pub mod media_assets;
