//! Public configuration for the remote clients.
//!
//! One config covers the PulseMCP client, the GitHub client, the detection
//! tiers and the health probe.

use std::time::Duration;

pub const DEFAULT_PULSE_BASE_URL: &str = "https://api.pulsemcp.com";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Configuration for the remote clients.
///
/// # Example
///
/// ```
/// use mcpdir_remote::RemoteConfig;
/// use std::time::Duration;
///
/// let config = RemoteConfig::new()
///     .with_max_retries(5)
///     .with_retry_delay(Duration::from_millis(250));
/// ```
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL for the PulseMCP API
    pub(crate) pulse_base_url: String,
    /// Base URL for the GitHub REST API
    pub(crate) github_api_url: String,
    /// Bearer token sent to GitHub only
    pub(crate) github_token: Option<String>,
    /// User agent string for HTTP requests (GitHub rejects requests without one)
    pub(crate) user_agent: String,
    /// Request timeout
    pub(crate) timeout: Duration,
    /// Maximum number of retry attempts for transient errors
    pub(crate) max_retries: u8,
    /// Base delay for exponential backoff
    pub(crate) retry_base_delay: Duration,
    /// Hard abort for a single health check
    pub(crate) health_timeout: Duration,
    /// Responses slower than this are reported as degraded
    pub(crate) degraded_after: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            pulse_base_url: DEFAULT_PULSE_BASE_URL.to_string(),
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            github_token: None,
            user_agent: concat!("mcpdir/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_base_delay: Duration::from_millis(500),
            health_timeout: Duration::from_secs(3),
            degraded_after: Duration::from_secs(2),
        }
    }
}

impl RemoteConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults to `https://api.pulsemcp.com`.
    #[must_use]
    pub fn with_pulse_base_url(mut self, url: impl Into<String>) -> Self {
        self.pulse_base_url = url.into();
        self
    }

    /// Defaults to `https://api.github.com`.
    #[must_use]
    pub fn with_github_api_url(mut self, url: impl Into<String>) -> Self {
        self.github_api_url = url.into();
        self
    }

    /// Set an optional GitHub token.
    #[must_use]
    pub fn with_github_token(mut self, token: Option<String>) -> Self {
        self.github_token = token.filter(|t| !t.trim().is_empty());
        self
    }

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

    /// Set the maximum number of retry attempts for transient errors.
    ///
    /// Defaults to 3 retries.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the base delay for exponential backoff retries.
    ///
    /// Defaults to 500ms.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Defaults to 3 seconds.
    #[must_use]
    pub const fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    pub fn pulse_base_url(&self) -> &str {
        &self.pulse_base_url
    }

    pub fn github_api_url(&self) -> &str {
        &self.github_api_url
    }

    pub const fn max_retries(&self) -> u8 {
        self.max_retries
    }

    pub const fn has_github_token(&self) -> bool {
        self.github_token.is_some()
    }
}
