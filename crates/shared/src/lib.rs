//! Shared types and configuration for Courier.
//!
//! This crate provides common pieces used across all other crates:
//! - Phone number value type with wire-format normalization
//! - Configuration management

pub mod config;
pub mod types;

pub use config::AppConfig;
pub use types::PhoneNumber;
