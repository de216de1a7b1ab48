//! Redis-backed job channel for standalone worker deployments.

use std::pin::Pin;

use futures::{Stream, StreamExt};
use redis::AsyncCommands;
use tracing::warn;

use super::{ChannelError, JobChannel, JobSubscription};

/// Job channel over Redis pub/sub.
///
/// Redis pub/sub is fire-and-forget: subscribers only see messages published
/// while they are connected, which matches the at-most-once transport
/// contract exactly.
pub struct RedisJobChannel {
    client: redis::Client,
}

impl RedisJobChannel {
    /// Create a channel from a Redis connection URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn new(url: &str) -> Result<Self, ChannelError> {
        let client =
            redis::Client::open(url).map_err(|e| ChannelError::operation(e.to_string()))?;
        Ok(Self { client })
    }
}

impl JobChannel for RedisJobChannel {
    type Subscription = RedisSubscription;

    async fn publish(&self, channel: &str, payload: &str) -> Result<(), ChannelError> {
        let mut conn = self
            .client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|e| ChannelError::operation(e.to_string()))?;
        let _: () = conn
            .publish(channel, payload)
            .await
            .map_err(|e| ChannelError::operation(e.to_string()))?;
        Ok(())
    }

    async fn subscribe(&self, channel: &str) -> Result<Self::Subscription, ChannelError> {
        let mut pubsub = self
            .client
            .get_async_pubsub()
            .await
            .map_err(|e| ChannelError::operation(e.to_string()))?;
        pubsub
            .subscribe(channel)
            .await
            .map_err(|e| ChannelError::operation(e.to_string()))?;

        Ok(RedisSubscription {
            stream: Box::pin(pubsub.into_on_message()),
        })
    }
}

/// Subscription handle for [`RedisJobChannel`].
pub struct RedisSubscription {
    stream: Pin<Box<dyn Stream<Item = redis::Msg> + Send>>,
}

impl JobSubscription for RedisSubscription {
    async fn next(&mut self) -> Option<String> {
        loop {
            let msg = self.stream.next().await?;
            match msg.get_payload::<String>() {
                Ok(payload) => return Some(payload),
                Err(err) => warn!(error = %err, "dropping undecodable channel message"),
            }
        }
    }
}
