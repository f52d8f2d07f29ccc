//! Outbound HTTP client builder.

use std::time::Duration;

use reqwest::header::HeaderMap;

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout, covering connect through body read.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
    /// Headers sent with every request, e.g. upstream API keys.
    pub default_headers: HeaderMap,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            user_agent: format!("telegram-auth/{}", env!("CARGO_PKG_VERSION")),
            default_headers: HeaderMap::new(),
        }
    }
}

/// Builder for the HTTP clients used to reach Telegram and the click store.
///
/// Clients never retry: a failed call surfaces to the caller immediately.
pub struct HttpClientBuilder {
    config: HttpClientConfig,
}

impl HttpClientBuilder {
    /// Create a new client builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: HttpClientConfig::default(),
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the user agent string.
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.config.user_agent = user_agent;
        self
    }

    /// Set headers sent with every request. Mark secret values sensitive before passing them.
    pub fn with_default_headers(mut self, headers: HeaderMap) -> Self {
        self.config.default_headers = headers;
        self
    }

    /// Build the configured HTTP client.
    pub fn build(self) -> Result<reqwest::Client, crate::Error> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(self.config.timeout)
            .user_agent(self.config.user_agent)
            .default_headers(self.config.default_headers)
            .build()?;

        Ok(client)
    }
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
