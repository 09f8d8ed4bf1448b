//! Client configuration.

use std::time::Duration;

use learnverse_core::error::TransportError;
use learnverse_core::{BaseUrl, Result};

/// Default TCP connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default per-read timeout. Long enough for streamed assistant replies.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(300);

/// Settings shared by every HTTP client the library builds, including the
/// dedicated token-refresh client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: BaseUrl,
    connect_timeout: Duration,
    read_timeout: Duration,
    user_agent: String,
}

impl ClientConfig {
    /// Configuration with default timeouts for the given API.
    pub fn new(base_url: BaseUrl) -> Self {
        Self {
            base_url,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            user_agent: concat!("learnverse/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Build a `reqwest::Client` with these settings.
    pub(crate) fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent(&self.user_agent)
            .connect_timeout(self.connect_timeout)
            .read_timeout(self.read_timeout)
            .build()
            .map_err(|e| {
                TransportError::Http {
                    message: format!("failed to build HTTP client: {}", e),
                }
                .into()
            })
    }
}
