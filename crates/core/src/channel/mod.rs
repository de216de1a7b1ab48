//! Job channel: the publish/subscribe transport between producers and the
//! worker.
//!
//! Delivery is best-effort, at-most-once. There is no acknowledgment
//! protocol, no persistence, and no replay: a message published while no
//! subscriber is connected is lost silently, and a lagging subscriber drops
//! messages. Per-subscriber delivery order equals publish order,
//! best-effort. Consumers must not assume stronger semantics.

mod memory;

#[cfg(feature = "redis")]
mod redis;

use thiserror::Error;

pub use memory::{InMemoryJobChannel, InMemorySubscription};

#[cfg(feature = "redis")]
pub use redis::{RedisJobChannel, RedisSubscription};

/// Channel transport errors.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The underlying transport failed.
    #[error("channel operation failed: {0}")]
    Operation(String),
}

impl ChannelError {
    /// Create an operation error.
    #[must_use]
    pub fn operation(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }
}

/// Publish/subscribe transport for serialized jobs.
pub trait JobChannel: Send + Sync {
    /// Subscription handle produced by [`JobChannel::subscribe`].
    type Subscription: JobSubscription;

    /// Publish a raw payload to a named channel.
    ///
    /// Publishing succeeds even when nobody is listening; the message is
    /// simply lost (at-most-once).
    fn publish(
        &self,
        channel: &str,
        payload: &str,
    ) -> impl std::future::Future<Output = Result<(), ChannelError>> + Send;

    /// Subscribe to a named channel.
    fn subscribe(
        &self,
        channel: &str,
    ) -> impl std::future::Future<Output = Result<Self::Subscription, ChannelError>> + Send;
}

/// A live subscription to one channel.
pub trait JobSubscription: Send {
    /// Receive the next message; `None` once the channel is closed.
    fn next(&mut self) -> impl std::future::Future<Output = Option<String>> + Send;
}
