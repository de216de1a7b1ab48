//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the two tables this subsystem reads
//!   and writes (`contacts`, `media_assets`)
//! - Repository implementations of the core resolution and media-record
//!   contracts
//!
//! The wider suite owns the schema; no migrations live here.

pub mod entities;
pub mod repositories;

pub use repositories::{ContactRepository, MediaAssetRepository};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a pooled connection to the database.
///
/// The pool is shared by every concurrent job handler; contact resolution is
/// read-only.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(
    database_url: &str,
    max_connections: u32,
    min_connections: u32,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(max_connections)
        .min_connections(min_connections);
    Database::connect(options).await
}
