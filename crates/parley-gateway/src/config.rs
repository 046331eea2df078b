//! Public configuration for the dialogue gateway client.

use std::time::Duration;

/// Default base URL of the interview service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Configuration for the dialogue gateway client.
///
/// # Example
///
/// ```
/// use parley_gateway::GatewayConfig;
/// use std::time::Duration;
///
/// let config = GatewayConfig::new()
///     .with_base_url("https://interviews.example.com")
///     .with_timeout(Duration::from_secs(45));
/// ```
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL; `/api/...` paths are appended to it
    pub(crate) base_url: String,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// Request timeout
    pub(crate) timeout: Duration,
    /// Retry attempts for read-back GETs
    pub(crate) max_retries: u8,
    /// Base delay for exponential backoff
    pub(crate) retry_base_delay: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!("parley-gateway/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 2,
            retry_base_delay: Duration::from_millis(500),
        }
    }
}

impl GatewayConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL of the interview service.
    ///
    /// Defaults to `http://localhost:8000`.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 30 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the number of retries for read-back requests.
    ///
    /// Defaults to 2. Session start and chat messages are never retried.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the base delay for exponential backoff retries.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}
