//! In-process job channel for tests and embedded deployments.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tracing::warn;

use super::{ChannelError, JobChannel, JobSubscription};

const DEFAULT_CAPACITY: usize = 1024;

/// In-memory publish/subscribe broker backed by `tokio::sync::broadcast`.
///
/// Faithful to the transport contract: publishing with no subscriber loses
/// the message, and a subscriber that falls more than `capacity` messages
/// behind has the overflow dropped.
#[derive(Clone)]
pub struct InMemoryJobChannel {
    topics: Arc<Mutex<HashMap<String, broadcast::Sender<String>>>>,
    capacity: usize,
}

impl InMemoryJobChannel {
    /// Create a broker with the default per-channel buffer capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a broker with an explicit per-channel buffer capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            topics: Arc::new(Mutex::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    fn sender(&self, channel: &str) -> broadcast::Sender<String> {
        let mut topics = self.topics.lock().expect("channel registry poisoned");
        topics
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }

    /// Number of live subscriptions on a channel.
    #[must_use]
    pub fn subscriber_count(&self, channel: &str) -> usize {
        let topics = self.topics.lock().expect("channel registry poisoned");
        topics
            .get(channel)
            .map_or(0, broadcast::Sender::receiver_count)
    }
}

impl Default for InMemoryJobChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl JobChannel for InMemoryJobChannel {
    type Subscription = InMemorySubscription;

    async fn publish(&self, channel: &str, payload: &str) -> Result<(), ChannelError> {
        // A send error only means there are no receivers right now; the
        // message is lost, which is exactly the at-most-once contract.
        let _ = self.sender(channel).send(payload.to_string());
        Ok(())
    }

    async fn subscribe(&self, channel: &str) -> Result<Self::Subscription, ChannelError> {
        Ok(InMemorySubscription {
            receiver: self.sender(channel).subscribe(),
        })
    }
}

/// Subscription handle for [`InMemoryJobChannel`].
pub struct InMemorySubscription {
    receiver: broadcast::Receiver<String>,
}

impl JobSubscription for InMemorySubscription {
    async fn next(&mut self) -> Option<String> {
        loop {
            match self.receiver.recv().await {
                Ok(payload) => return Some(payload),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "subscriber lagged; messages dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_subscribe_roundtrip() {
        let channel = InMemoryJobChannel::new();
        let mut sub = channel.subscribe("outbound-jobs").await.unwrap();

        channel.publish("outbound-jobs", "{\"a\":1}").await.unwrap();
        assert_eq!(sub.next().await.as_deref(), Some("{\"a\":1}"));
    }

    #[tokio::test]
    async fn test_subscriber_count() {
        let channel = InMemoryJobChannel::new();
        assert_eq!(channel.subscriber_count("outbound-jobs"), 0);

        let sub = channel.subscribe("outbound-jobs").await.unwrap();
        assert_eq!(channel.subscriber_count("outbound-jobs"), 1);

        drop(sub);
        assert_eq!(channel.subscriber_count("outbound-jobs"), 0);
    }

    #[tokio::test]
    async fn test_publish_before_subscribe_is_lost() {
        let channel = InMemoryJobChannel::new();
        channel.publish("outbound-jobs", "lost").await.unwrap();

        let mut sub = channel.subscribe("outbound-jobs").await.unwrap();
        channel.publish("outbound-jobs", "kept").await.unwrap();

        assert_eq!(sub.next().await.as_deref(), Some("kept"));
    }

    #[tokio::test]
    async fn test_channels_are_isolated() {
        let channel = InMemoryJobChannel::new();
        let mut campaigns = channel.subscribe("campaigns").await.unwrap();
        let mut chats = channel.subscribe("chats").await.unwrap();

        channel.publish("campaigns", "c").await.unwrap();
        channel.publish("chats", "m").await.unwrap();

        assert_eq!(campaigns.next().await.as_deref(), Some("c"));
        assert_eq!(chats.next().await.as_deref(), Some("m"));
    }

    #[tokio::test]
    async fn test_delivery_order_matches_publish_order() {
        let channel = InMemoryJobChannel::new();
        let mut sub = channel.subscribe("outbound-jobs").await.unwrap();

        for i in 0..10 {
            channel
                .publish("outbound-jobs", &i.to_string())
                .await
                .unwrap();
        }
        for i in 0..10 {
            assert_eq!(sub.next().await.as_deref(), Some(i.to_string().as_str()));
        }
    }

    #[tokio::test]
    async fn test_subscription_ends_when_broker_dropped() {
        let channel = InMemoryJobChannel::new();
        let mut sub = channel.subscribe("outbound-jobs").await.unwrap();
        drop(channel);

        assert_eq!(sub.next().await, None);
    }

    #[tokio::test]
    async fn test_lagged_subscriber_drops_overflow() {
        let channel = InMemoryJobChannel::with_capacity(2);
        let mut sub = channel.subscribe("outbound-jobs").await.unwrap();

        for i in 0..5 {
            channel
                .publish("outbound-jobs", &i.to_string())
                .await
                .unwrap();
        }

        // The two newest messages survive; the rest were dropped.
        assert_eq!(sub.next().await.as_deref(), Some("3"));
        assert_eq!(sub.next().await.as_deref(), Some("4"));
    }
}
