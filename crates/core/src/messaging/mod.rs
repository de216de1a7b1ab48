//! Messaging provider client.
//!
//! A thin SDK over the provider's send and media HTTP endpoints. The
//! dispatch pipeline only depends on the [`MessagingClient`] contract;
//! [`CloudApiClient`] is the production implementation.

mod client;
mod error;
mod types;

pub use client::{CloudApiClient, MessagingClient};
pub use error::MessagingError;
pub use types::{MediaRef, MessageHandle, ProviderMedia};
