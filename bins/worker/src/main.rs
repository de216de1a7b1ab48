//! Courier dispatch worker
//!
//! Main entry point for the outbound-message worker: subscribes to the job
//! channel and dispatches each job through the messaging provider.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use courier_core::channel::RedisJobChannel;
use courier_core::messaging::CloudApiClient;
use courier_core::outbound::OutboundDispatcher;
use courier_core::worker::{Worker, WorkerSettings};
use courier_db::{ContactRepository, connect};
use courier_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "courier=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database (read-only here: contact resolution)
    let db = connect(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!("Connected to database");

    // Wire the dispatch pipeline
    let resolver = Arc::new(ContactRepository::new(db));
    let client = Arc::new(CloudApiClient::new(&config.messaging)?);
    let dispatcher = Arc::new(OutboundDispatcher::new(resolver, client));

    let channel = RedisJobChannel::new(&config.channel.url)?;
    let settings = WorkerSettings {
        channel: config.channel.name.clone(),
        max_concurrent: config.worker.max_concurrent,
        dispatch_timeout: Duration::from_secs(config.worker.dispatch_timeout_secs),
    };
    let worker = Worker::new(channel, dispatcher, settings);

    // Stop taking new jobs on ctrl-c; in-flight handlers finish first
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            let _ = shutdown_tx.send(true);
        }
    });

    info!(channel = %config.channel.name, "Worker starting");
    worker.run(shutdown_rx).await?;

    Ok(())
}
