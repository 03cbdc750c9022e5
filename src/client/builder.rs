use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use url::Url;

use super::{ClientState, ConnectionManager, ConnectionState, FeedClient};
use crate::types::constants::HISTORY_CAPACITY;
use crate::types::{FeedError, Result};

/// Configuration for [`FeedClient`]. All durations are in milliseconds;
/// `None` falls back to the defaults in [`crate::types::constants`].
#[derive(Debug, Clone, Default)]
pub struct FeedClientOptions {
    pub heartbeat_interval: Option<u64>,
    pub connect_timeout: Option<u64>,
    pub staleness_threshold: Option<u64>,
    pub staleness_check_interval: Option<u64>,
    pub max_reconnect_attempts: Option<u32>,
    pub initial_reconnect_delay: Option<u64>,
    pub max_reconnect_delay: Option<u64>,
    pub reconnect_settle_delay: Option<u64>,
    pub history_capacity: Option<usize>,
}

/// Builder for FeedClient that handles validation and initialization
pub struct FeedClientBuilder {
    endpoint: String,
    options: FeedClientOptions,
}

impl FeedClientBuilder {
    /// Create a new builder.
    ///
    /// A missing or malformed endpoint is a construction-time failure; the
    /// client refuses to be built rather than failing later at connect time.
    pub fn new(endpoint: impl Into<String>, options: FeedClientOptions) -> Result<Self> {
        let endpoint = endpoint.into();

        if endpoint.is_empty() {
            return Err(FeedError::Config("endpoint URL is required".to_string()));
        }

        let url = Url::parse(&endpoint)?;
        match url.scheme() {
            "ws" | "wss" => {}
            other => {
                return Err(FeedError::Config(format!(
                    "unsupported endpoint scheme: {}",
                    other
                )));
            }
        }

        Ok(Self { endpoint, options })
    }

    /// Build the client
    pub fn build(self) -> FeedClient {
        let history_capacity = self.options.history_capacity.unwrap_or(HISTORY_CAPACITY);

        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        let (error_tx, _) = watch::channel(None);
        let (attempts_tx, _) = watch::channel(0u32);

        FeedClient {
            endpoint: self.endpoint,
            options: self.options,
            connection: Arc::new(ConnectionManager::new()),
            state: Arc::new(RwLock::new(ClientState::new(history_capacity))),
            state_tx,
            error_tx,
            attempts_tx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_endpoint_is_rejected() {
        let result = FeedClientBuilder::new("", FeedClientOptions::default());
        assert!(matches!(result, Err(FeedError::Config(_))));
    }

    #[test]
    fn test_malformed_endpoint_is_rejected() {
        let result = FeedClientBuilder::new("not a url", FeedClientOptions::default());
        assert!(matches!(result, Err(FeedError::UrlParse(_))));
    }

    #[test]
    fn test_http_scheme_is_rejected() {
        let result = FeedClientBuilder::new("http://example.com/ws", FeedClientOptions::default());
        assert!(matches!(result, Err(FeedError::Config(_))));
    }

    #[test]
    fn test_ws_endpoints_are_accepted() {
        assert!(FeedClientBuilder::new("ws://127.0.0.1:9000/ws", FeedClientOptions::default()).is_ok());
        assert!(FeedClientBuilder::new("wss://feed.example.com/ws", FeedClientOptions::default()).is_ok());
    }
}
