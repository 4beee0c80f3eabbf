//! Client configuration

use std::time::Duration;

/// Environment variable holding the API base URL
pub const API_URL_ENV: &str = "HOTEL_API_URL";

/// Local development endpoint used when nothing is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Ceiling for every request. Exceeding it surfaces as a connection error.
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Freshness window of cached room data
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(5 * 60);

/// Client configuration for connecting to the rooms API
///
/// # Environment
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | HOTEL_API_URL | http://localhost:8080/api | API base URL |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8080/api")
    pub base_url: String,

    /// Request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Load configuration from the environment
    ///
    /// Blank values fall back to [`DEFAULT_API_URL`].
    pub fn from_env() -> Self {
        let base_url = std::env::var(API_URL_ENV)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }

    /// Create an HTTP client from this configuration
    pub fn build_client(&self) -> crate::ClientResult<crate::RoomClient> {
        crate::RoomClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

/// Cache behaviour of a [`RoomStore`](crate::RoomStore)
#[derive(Debug, Clone, Copy)]
pub struct StoreConfig {
    /// How long a successful fetch is served without going to the network
    pub stale_time: Duration,
}

impl StoreConfig {
    pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            stale_time: DEFAULT_STALE_TIME,
        }
    }
}
