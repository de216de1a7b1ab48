//! Common types used across the application.

pub mod phone;

pub use phone::PhoneNumber;
