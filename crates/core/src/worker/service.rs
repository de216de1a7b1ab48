//! Worker implementation.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, watch};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::channel::{ChannelError, JobChannel, JobSubscription};
use crate::contact::ContactResolver;
use crate::messaging::MessagingClient;
use crate::outbound::{Job, OutboundDispatcher};

/// Worker runtime settings.
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    /// Name of the channel to subscribe to.
    pub channel: String,
    /// Maximum number of jobs processed concurrently.
    pub max_concurrent: usize,
    /// Per-dispatch timeout.
    pub dispatch_timeout: Duration,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            channel: "outbound-jobs".to_string(),
            max_concurrent: 16,
            dispatch_timeout: Duration::from_secs(30),
        }
    }
}

/// Worker errors.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// The channel subscription could not be established.
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),
}

/// Consumes serialized jobs from the channel and drives the dispatcher.
///
/// Each inbound message is handled on its own task, but a semaphore caps how
/// many handlers run at once, so a burst of publishes cannot unbound the
/// number of concurrent outbound API calls. Handler completion may reorder
/// observable side effects relative to publish order.
pub struct Worker<C, R, M>
where
    C: JobChannel,
    R: ContactResolver,
    M: MessagingClient,
{
    channel: C,
    dispatcher: Arc<OutboundDispatcher<R, M>>,
    settings: WorkerSettings,
}

impl<C, R, M> Worker<C, R, M>
where
    C: JobChannel,
    R: ContactResolver + 'static,
    M: MessagingClient + 'static,
{
    /// Create a new worker.
    #[must_use]
    pub fn new(channel: C, dispatcher: Arc<OutboundDispatcher<R, M>>, settings: WorkerSettings) -> Self {
        Self {
            channel,
            dispatcher,
            settings,
        }
    }

    /// Run the subscription loop until shutdown is requested or the channel
    /// closes.
    ///
    /// Shutdown does not cancel in-flight handlers; it stops taking new
    /// messages and waits for the handlers to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel subscription cannot be established.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> Result<(), WorkerError> {
        let mut subscription = self.channel.subscribe(&self.settings.channel).await?;
        info!(
            channel = %self.settings.channel,
            max_concurrent = self.settings.max_concurrent,
            "worker subscribed"
        );

        let semaphore = Arc::new(Semaphore::new(self.settings.max_concurrent));
        let mut handlers: JoinSet<()> = JoinSet::new();

        loop {
            // Reap finished handlers without blocking the subscription.
            while handlers.try_join_next().is_some() {}

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                message = subscription.next() => {
                    let Some(raw) = message else { break };
                    info!(bytes = raw.len(), "job received");

                    // Waiting here is the backpressure point: when every
                    // permit is taken, the subscription stops draining.
                    let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                        break;
                    };
                    let dispatcher = Arc::clone(&self.dispatcher);
                    let timeout = self.settings.dispatch_timeout;
                    handlers.spawn(async move {
                        process_job(&raw, &dispatcher, timeout).await;
                        drop(permit);
                    });
                }
            }
        }

        // In-flight handlers finish; no new messages are taken.
        while handlers.join_next().await.is_some() {}
        info!("worker stopped");
        Ok(())
    }
}

/// Process one raw payload: parse, dispatch, log the terminal outcome.
async fn process_job<R, M>(raw: &str, dispatcher: &OutboundDispatcher<R, M>, timeout: Duration)
where
    R: ContactResolver,
    M: MessagingClient,
{
    let job: Job = match serde_json::from_str(raw) {
        Ok(job) => job,
        Err(err) => {
            warn!(error = %err, "dropping job with unparseable payload");
            return;
        }
    };

    match tokio::time::timeout(timeout, dispatcher.dispatch(&job)).await {
        Ok(Ok(handle)) => info!(message_id = %handle, "job dispatched"),
        Ok(Err(err)) => warn!(
            error = %err,
            transient = err.is_transient(),
            "dispatch failed; job discarded"
        ),
        Err(_) => warn!(
            timeout_secs = timeout.as_secs(),
            "dispatch timed out; job discarded"
        ),
    }
}
