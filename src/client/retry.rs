//! Blocking HTTP client with the session's retry policy.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Method, StatusCode};
use tracing::{debug, warn};

use crate::models::HttpMethod;
use crate::Result;

use super::config::{RetryConfig, SessionConfig};

/// Owns the pooled connection and replays requests according to a
/// [`RetryConfig`].
///
/// The final response is returned even when its status is still
/// retryable, so callers do their own success/error classification.
pub(crate) struct RetryingClient {
    http: Client,
    retry: RetryConfig,
}

impl RetryingClient {
    pub(crate) fn new(config: &SessionConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            http,
            retry: config.retry.clone(),
        })
    }

    pub(crate) fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http.request(method, url)
    }

    /// Execute the request, retrying transient failures.
    pub(crate) fn send(&self, builder: RequestBuilder) -> reqwest::Result<Response> {
        let request = builder.build()?;
        let attempts = if HttpMethod::from_method(request.method()).is_some() {
            self.retry.max_attempts.max(1)
        } else {
            1
        };

        let mut attempt = 1;
        loop {
            // Streaming bodies cannot be replayed.
            let Some(current) = request.try_clone() else {
                return self.http.execute(request);
            };

            let method = current.method().clone();
            let url = current.url().clone();
            debug!(attempt, %method, %url, "sending HTTP request");

            match self.http.execute(current) {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt, %method, %url, %status, "received HTTP response");

                    if attempt < attempts && self.retry.should_retry_status(status.as_u16()) {
                        let delay =
                            delay_after_response(&self.retry, attempt, status, response.headers());
                        warn!(attempt, %method, %url, %status, ?delay, "retrying after HTTP status");
                        drop(response);
                        pause(delay);
                        attempt += 1;
                        continue;
                    }

                    return Ok(response);
                }
                Err(err) => {
                    debug!(attempt, %method, %url, error = %err, "HTTP request failed");

                    if attempt < attempts && should_retry_error(&err) {
                        let delay = self.retry.backoff_for_retry(attempt);
                        warn!(attempt, %method, %url, ?delay, "retrying after transport error");
                        pause(delay);
                        attempt += 1;
                        continue;
                    }

                    return Err(err);
                }
            }
        }
    }
}

/// Delay before retrying a response with a retryable status.
///
/// A numeric `Retry-After` on 429/503 replaces the exponential delay; both
/// are capped at `max_backoff`.
fn delay_after_response(
    retry: &RetryConfig,
    attempt: u32,
    status: StatusCode,
    headers: &HeaderMap,
) -> Duration {
    let computed = retry.backoff_for_retry(attempt);
    if !retry.respect_retry_after {
        return computed;
    }
    if !matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE
    ) {
        return computed;
    }
    headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_retry_after)
        .map(|delay| delay.min(retry.max_backoff))
        .unwrap_or(computed)
}

/// Parse a `Retry-After` header given in seconds. HTTP-date values are ignored.
fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

fn should_retry_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_parse_retry_after_seconds() {
        assert_eq!(parse_retry_after("7"), Some(Duration::from_secs(7)));
        assert_eq!(parse_retry_after(" 0 "), Some(Duration::ZERO));
    }

    #[test]
    fn test_parse_retry_after_date_ignored() {
        assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), None);
    }

    fn retry_after(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_retry_after_overrides_backoff() {
        let config = RetryConfig::default();
        let delay = delay_after_response(
            &config,
            3,
            StatusCode::TOO_MANY_REQUESTS,
            &retry_after("7"),
        );
        assert_eq!(delay, Duration::from_secs(7));
    }

    #[test]
    fn test_retry_after_capped_at_max_backoff() {
        let config = RetryConfig::default().with_max_backoff(Duration::from_secs(10));
        let delay = delay_after_response(
            &config,
            1,
            StatusCode::SERVICE_UNAVAILABLE,
            &retry_after("3600"),
        );
        assert_eq!(delay, Duration::from_secs(10));
    }

    #[test]
    fn test_retry_after_ignored_for_other_statuses() {
        let config = RetryConfig::default();
        let delay = delay_after_response(
            &config,
            2,
            StatusCode::BAD_GATEWAY,
            &retry_after("30"),
        );
        assert_eq!(delay, Duration::from_secs(4));
    }

    #[test]
    fn test_retry_after_disabled_or_unparseable() {
        let config = RetryConfig::default().with_retry_after(false);
        let delay = delay_after_response(
            &config,
            2,
            StatusCode::TOO_MANY_REQUESTS,
            &retry_after("30"),
        );
        assert_eq!(delay, Duration::from_secs(4));

        let config = RetryConfig::default();
        let delay = delay_after_response(
            &config,
            2,
            StatusCode::TOO_MANY_REQUESTS,
            &retry_after("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert_eq!(delay, Duration::from_secs(4));
    }

    #[test]
    fn test_client_builds_from_default_config() {
        assert!(RetryingClient::new(&SessionConfig::default()).is_ok());
    }
}
