//! Session configuration options.

use std::time::Duration;

/// Default OAuth2 token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://id.sophos.com/api/v2/oauth2/token";

/// Default identity lookup endpoint.
pub const DEFAULT_WHOAMI_URL: &str = "https://api.central.sophos.com/whoami/v1";

/// Configuration for a [`TenantSession`](crate::TenantSession).
///
/// # Example
///
/// ```
/// use sophos_central::SessionConfig;
/// use std::time::Duration;
///
/// let config = SessionConfig::default()
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("my-app/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Retry configuration
    pub retry: RetryConfig,
    /// OAuth2 token endpoint
    pub token_url: String,
    /// Identity lookup endpoint
    pub whoami_url: String,
    /// Subtracted from the token lifetime when computing its expiry
    pub expiry_margin: chrono::Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("sophos-central/{} (Rust)", env!("CARGO_PKG_VERSION")),
            retry: RetryConfig::default(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            whoami_url: DEFAULT_WHOAMI_URL.to_string(),
            expiry_margin: chrono::Duration::seconds(120),
        }
    }
}

impl SessionConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the retry configuration.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Override the token endpoint.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Override the identity lookup endpoint.
    pub fn with_whoami_url(mut self, url: impl Into<String>) -> Self {
        self.whoami_url = url.into();
        self
    }

    /// Set the safety margin subtracted from the token lifetime.
    pub fn with_expiry_margin(mut self, margin: chrono::Duration) -> Self {
        self.expiry_margin = margin;
        self
    }

    /// Check that both identity URLs parse.
    pub(crate) fn validate(&self) -> crate::Result<()> {
        url::Url::parse(&self.token_url)?;
        url::Url::parse(&self.whoami_url)?;
        if self.retry.max_attempts == 0 {
            return Err(crate::Error::Config(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration for automatic retries.
///
/// Every request, including the two authentication calls, is retried on
/// transport errors and on the statuses in `retry_statuses`. The last
/// response is handed back once attempts run out.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Base of the exponential backoff
    pub backoff_factor: Duration,
    /// Upper bound on any single delay
    pub max_backoff: Duration,
    /// HTTP status codes to retry on
    pub retry_statuses: Vec<u16>,
    /// Whether a `Retry-After` header overrides the computed delay
    pub respect_retry_after: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff_factor: Duration::from_secs(2),
            max_backoff: Duration::from_secs(120),
            retry_statuses: vec![429, 500, 502, 503, 504],
            respect_retry_after: true,
        }
    }
}

impl RetryConfig {
    /// Create a configuration with a single attempt.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    /// Set the total number of attempts.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the backoff factor.
    pub fn with_backoff_factor(mut self, factor: Duration) -> Self {
        self.backoff_factor = factor;
        self
    }

    /// Set the maximum backoff duration.
    pub fn with_max_backoff(mut self, duration: Duration) -> Self {
        self.max_backoff = duration;
        self
    }

    /// Enable or disable honoring `Retry-After`.
    pub fn with_retry_after(mut self, enabled: bool) -> Self {
        self.respect_retry_after = enabled;
        self
    }

    /// Delay before the given retry (1-based).
    ///
    /// The first retry fires immediately; retry `n > 1` waits
    /// `backoff_factor * 2^(n-1)`, capped at `max_backoff`.
    pub fn backoff_for_retry(&self, retry: u32) -> Duration {
        if retry <= 1 {
            return Duration::ZERO;
        }
        let multiplier = 2u32.saturating_pow(retry - 1);
        self.backoff_factor
            .saturating_mul(multiplier)
            .min(self.max_backoff)
    }

    /// Check if a status code should be retried.
    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.token_url, DEFAULT_TOKEN_URL);
        assert_eq!(config.whoami_url, DEFAULT_WHOAMI_URL);
        assert_eq!(config.expiry_margin, chrono::Duration::seconds(120));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_url_rejected() {
        let config = SessionConfig::default().with_token_url("not a url");
        assert!(matches!(config.validate(), Err(crate::Error::UrlParse(_))));
    }

    #[test]
    fn test_retry_backoff() {
        let config = RetryConfig::default();
        assert_eq!(config.backoff_for_retry(1), Duration::ZERO);
        assert_eq!(config.backoff_for_retry(2), Duration::from_secs(4));
        assert_eq!(config.backoff_for_retry(3), Duration::from_secs(8));
        assert_eq!(config.backoff_for_retry(4), Duration::from_secs(16));
    }

    #[test]
    fn test_retry_backoff_max() {
        let config = RetryConfig::default().with_max_backoff(Duration::from_secs(10));

        // 2 * 2^3 = 16, but capped at 10
        assert_eq!(config.backoff_for_retry(4), Duration::from_secs(10));
        assert_eq!(config.backoff_for_retry(40), Duration::from_secs(10));
    }

    #[test]
    fn test_should_retry_status() {
        let config = RetryConfig::default();
        assert!(config.should_retry_status(429));
        assert!(config.should_retry_status(503));
        assert!(!config.should_retry_status(404));
        assert!(!config.should_retry_status(401));
    }

    #[test]
    fn test_no_retry() {
        assert_eq!(RetryConfig::no_retry().max_attempts, 1);
        assert_eq!(RetryConfig::default().with_max_attempts(0).max_attempts, 1);
    }
}
