//! OAuth2 client-credentials token exchange.

use chrono::{DateTime, Duration, Utc};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::client::{RetryingClient, SessionConfig};
use crate::{Error, Result};

use super::Credentials;

/// A bearer token and the instant after which it is treated as stale.
pub(crate) struct Token {
    access_token: SecretString,
    expires_at: DateTime<Utc>,
}

impl Token {
    /// Build a token that expires `expires_in - margin` after `issued_at`.
    ///
    /// `expires_in` comes from the server, so an expiry outside chrono's
    /// range is an authentication error.
    pub(crate) fn new(
        access_token: String,
        issued_at: DateTime<Utc>,
        expires_in: i64,
        margin: Duration,
    ) -> Result<Self> {
        let expires_at = Duration::try_seconds(expires_in)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .and_then(|expiry| expiry.checked_sub_signed(margin))
            .ok_or_else(|| {
                Error::Authentication(
                    "Token exchange returned an out-of-range expires_in".to_string(),
                )
            })?;

        Ok(Self {
            access_token: SecretString::from(access_token),
            expires_at,
        })
    }

    pub(crate) fn secret(&self) -> &SecretString {
        &self.access_token
    }

    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token.expose_secret())
    }

    pub(crate) fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub(crate) fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// POST the credentials to the token endpoint.
pub(crate) fn exchange(
    http: &RetryingClient,
    config: &SessionConfig,
    credentials: &Credentials,
) -> Result<Token> {
    let form = [
        ("grant_type", "client_credentials"),
        ("scope", "token"),
        ("client_id", credentials.client_id()),
        ("client_secret", credentials.client_secret()),
    ];

    let builder = http
        .request(Method::POST, &config.token_url)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .form(&form);

    let issued_at = Utc::now();
    let response = http
        .send(builder)
        .map_err(|err| Error::Authentication(format!("Token exchange request failed: {err}")))?;

    let status = response.status();
    let body = response
        .text()
        .map_err(|err| Error::Authentication(format!("Token exchange body unreadable: {err}")))?;

    if !status.is_success() {
        return Err(Error::auth_status("Token exchange", status.as_u16(), &body));
    }

    let token_response: TokenResponse = serde_json::from_str(&body).map_err(|err| {
        Error::Authentication(format!("Token exchange returned an unexpected body: {err}"))
    })?;

    Token::new(
        token_response.access_token,
        issued_at,
        token_response.expires_in,
        config.expiry_margin,
    )
}
