//! Repository implementations of the core persistence contracts.
//!
//! Repositories hide the `SeaORM` details from the rest of the application;
//! core code only sees the traits they implement.

pub mod contact;
pub mod media_asset;

pub use contact::ContactRepository;
pub use media_asset::MediaAssetRepository;
