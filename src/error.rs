//! Error types for the Sophos Central API client.
//!
//! Only session construction and explicit refreshes surface these errors.
//! Ordinary request failures are folded into [`ApiResponse`](crate::ApiResponse)
//! instead.

use thiserror::Error;

/// A specialized `Result` type for Sophos Central operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the Sophos Central client.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Token exchange or identity lookup failed
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Invalid input provided to a function
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The session's HTTP client has been released
    #[error("Session is closed.")]
    SessionClosed,
}

impl Error {
    /// Returns `true` if this error is potentially transient and the
    /// operation could be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(err) => err.is_timeout() || err.is_connect() || err.is_request(),
            _ => false,
        }
    }

    /// Returns `true` if this is an authentication-related error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Authentication(_))
    }

    /// Build an authentication error for a failed step of the handshake.
    pub(crate) fn auth_status(step: &str, status: u16, body: &str) -> Self {
        Error::Authentication(format!("{step} failed ({status}): {body}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_auth() {
        assert!(Error::Authentication("failed".into()).is_auth_error());
        assert!(!Error::SessionClosed.is_auth_error());
        assert!(!Error::InvalidInput("bad".into()).is_auth_error());
    }

    #[test]
    fn test_error_not_retryable() {
        assert!(!Error::SessionClosed.is_retryable());
        assert!(!Error::Config("bad".into()).is_retryable());
    }

    #[test]
    fn test_auth_status_message() {
        let err = Error::auth_status("Token exchange", 401, "{\"error\":\"invalid_client\"}");
        assert_eq!(
            err.to_string(),
            "Authentication failed: Token exchange failed (401): {\"error\":\"invalid_client\"}"
        );
    }

    #[test]
    fn test_session_closed_message() {
        assert_eq!(Error::SessionClosed.to_string(), "Session is closed.");
    }
}
