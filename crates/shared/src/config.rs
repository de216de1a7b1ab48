//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Job channel configuration.
    #[serde(default)]
    pub channel: ChannelConfig,
    /// Messaging provider configuration.
    pub messaging: MessagingConfig,
    /// Worker configuration.
    #[serde(default)]
    pub worker: WorkerConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Job channel configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelConfig {
    /// Name of the channel the worker subscribes to.
    #[serde(default = "default_channel_name")]
    pub name: String,
    /// Broker connection URL.
    #[serde(default = "default_channel_url")]
    pub url: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            name: default_channel_name(),
            url: default_channel_url(),
        }
    }
}

fn default_channel_name() -> String {
    "outbound-jobs".to_string()
}

fn default_channel_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

/// Messaging provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagingConfig {
    /// Base URL of the provider API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Bearer token for the provider API.
    pub access_token: String,
    /// Sender phone number identifier assigned by the provider.
    pub phone_number_id: String,
    /// Language code sent with template messages.
    #[serde(default = "default_template_language")]
    pub template_language: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_api_base_url() -> String {
    "https://graph.facebook.com/v19.0".to_string()
}

fn default_template_language() -> String {
    "en_US".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

/// Worker configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerConfig {
    /// Maximum number of jobs processed concurrently.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    /// Per-dispatch timeout in seconds.
    #[serde(default = "default_dispatch_timeout")]
    pub dispatch_timeout_secs: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            dispatch_timeout_secs: default_dispatch_timeout(),
        }
    }
}

fn default_max_concurrent() -> usize {
    16
}

fn default_dispatch_timeout() -> u64 {
    30
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("COURIER").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_defaults() {
        let worker = WorkerConfig::default();
        assert_eq!(worker.max_concurrent, 16);
        assert_eq!(worker.dispatch_timeout_secs, 30);
    }

    #[test]
    fn test_channel_default_name() {
        let channel = ChannelConfig::default();
        assert_eq!(channel.name, "outbound-jobs");
    }
}
