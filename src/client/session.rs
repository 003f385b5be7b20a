//! The authenticated tenant session.

use chrono::{DateTime, Utc};
use reqwest::blocking::Response;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE,
};
use secrecy::SecretString;
use tracing::{debug, warn};

use crate::auth::{self, AuthState, Credentials, Identity};
use crate::models::{ApiResponse, HttpMethod, IdType, RequestOptions, TenantId};
use crate::{Error, Result};

use super::config::SessionConfig;
use super::retry::RetryingClient;

const X_TENANT_ID: &str = "x-tenant-id";

/// An authenticated session against one Sophos Central tenant.
///
/// Construction authenticates eagerly. The bearer token is refreshed
/// lazily: every request first checks the token's expiry and re-runs the
/// full handshake (token exchange and whoami) when it has passed.
///
/// Requests never fail with `Err`; they return an [`ApiResponse`] that
/// distinguishes success, HTTP errors, transport errors and a closed
/// session. The HTTP client is released by [`close`](Self::close) or when
/// the session is dropped.
///
/// # Example
///
/// ```no_run
/// use sophos_central::{ApiResponse, RequestOptions, TenantSession};
///
/// # fn example() -> sophos_central::Result<()> {
/// let mut session = TenantSession::connect("client-id", "client-secret")?;
///
/// match session.get("/endpoint/v1/endpoints", RequestOptions::new().query("pageSize", 10)) {
///     ApiResponse::Success { data } => println!("{data}"),
///     ApiResponse::Error { error, details } => eprintln!("{error}: {details}"),
/// }
/// # Ok(())
/// # }
/// ```
pub struct TenantSession {
    credentials: Credentials,
    config: SessionConfig,
    http: Option<RetryingClient>,
    state: AuthState,
}

/// A session opened with partner credentials. Behaves exactly like
/// [`TenantSession`].
pub type Partner = TenantSession;

impl TenantSession {
    /// Authenticate with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for empty credentials and
    /// [`Error::Authentication`] if the token exchange or the identity
    /// lookup does not succeed.
    pub fn connect(client_id: impl Into<String>, client_secret: impl Into<String>) -> Result<Self> {
        Self::connect_with_config(client_id, client_secret, SessionConfig::default())
    }

    /// Authenticate with a custom configuration.
    pub fn connect_with_config(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        config: SessionConfig,
    ) -> Result<Self> {
        let credentials = Credentials::new(client_id, client_secret)?;
        config.validate()?;

        let http = RetryingClient::new(&config)?;
        let state = auth::authenticate(&http, &config, &credentials)?;

        Ok(Self {
            credentials,
            config,
            http: Some(http),
            state,
        })
    }

    /// Re-run the full authentication handshake now.
    ///
    /// The current token and identity are only replaced if both calls
    /// succeed.
    pub fn refresh(&mut self) -> Result<()> {
        let http = self.http.as_ref().ok_or(Error::SessionClosed)?;
        self.state = auth::authenticate(http, &self.config, &self.credentials)?;
        Ok(())
    }

    /// Refresh the token if it has expired.
    pub fn ensure_token_valid(&mut self) -> Result<()> {
        if self.is_token_expired() {
            debug!(expires_at = %self.state.token.expires_at(), "token expired, re-authenticating");
            self.refresh()?;
        }
        Ok(())
    }

    /// Issue a request against `<api_host><endpoint>`.
    pub fn request(
        &mut self,
        method: HttpMethod,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApiResponse {
        if self.http.is_none() {
            return ApiResponse::session_closed();
        }

        if let Err(err) = self.ensure_token_valid() {
            warn!(%method, endpoint, error = %err, "token refresh failed");
            return ApiResponse::request_exception(err.to_string());
        }

        let Some(http) = self.http.as_ref() else {
            return ApiResponse::session_closed();
        };

        let headers = match self.build_headers(&options) {
            Ok(headers) => headers,
            Err(err) => return ApiResponse::request_exception(err.to_string()),
        };

        let url = format!("{}{}", self.state.identity.api_host(), endpoint);
        let mut builder = http.request(method.into(), &url).headers(headers);
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(body) = &options.json {
            builder = builder.json(body);
        }

        match http.send(builder) {
            Ok(response) => classify(response),
            Err(err) => {
                debug!(%method, %url, error = %err, "request exception");
                ApiResponse::request_exception(err.to_string())
            }
        }
    }

    /// Issue a GET request.
    pub fn get(&mut self, endpoint: &str, options: RequestOptions) -> ApiResponse {
        self.request(HttpMethod::Get, endpoint, options)
    }

    /// Issue a POST request.
    pub fn post(&mut self, endpoint: &str, options: RequestOptions) -> ApiResponse {
        self.request(HttpMethod::Post, endpoint, options)
    }

    /// Issue a PATCH request.
    pub fn patch(&mut self, endpoint: &str, options: RequestOptions) -> ApiResponse {
        self.request(HttpMethod::Patch, endpoint, options)
    }

    /// Issue a PUT request.
    pub fn put(&mut self, endpoint: &str, options: RequestOptions) -> ApiResponse {
        self.request(HttpMethod::Put, endpoint, options)
    }

    /// Issue a DELETE request.
    pub fn delete(&mut self, endpoint: &str, options: RequestOptions) -> ApiResponse {
        self.request(HttpMethod::Delete, endpoint, options)
    }

    /// Release the HTTP client. Calling this more than once is a no-op.
    pub fn close(&mut self) {
        if self.http.take().is_some() {
            debug!(tenant_id = %self.state.identity.tenant_id(), "session closed");
        }
    }

    /// Returns `true` once [`close`](Self::close) has run.
    pub fn is_closed(&self) -> bool {
        self.http.is_none()
    }

    /// Returns `true` if the token's expiry has passed.
    pub fn is_token_expired(&self) -> bool {
        self.state.token.is_expired_at(Utc::now())
    }

    /// When the current token stops being used.
    pub fn token_expires_at(&self) -> DateTime<Utc> {
        self.state.token.expires_at()
    }

    /// The current bearer token.
    pub fn access_token(&self) -> &SecretString {
        self.state.token.secret()
    }

    /// The resolved identity.
    pub fn identity(&self) -> &Identity {
        &self.state.identity
    }

    /// The authenticated tenant's id.
    pub fn tenant_id(&self) -> &TenantId {
        self.state.identity.tenant_id()
    }

    /// The kind of identity the credentials belong to.
    pub fn id_type(&self) -> &IdType {
        self.state.identity.id_type()
    }

    /// Base URL all requests are sent to.
    pub fn api_host(&self) -> &str {
        self.state.identity.api_host()
    }

    /// The client id this session authenticated with.
    pub fn client_id(&self) -> &str {
        self.credentials.client_id()
    }

    /// The configuration this session was built with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn build_headers(&self, options: &RequestOptions) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| Error::InvalidInput(format!("Invalid header name: {name}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| Error::InvalidInput(format!("Invalid value for header {name}")))?;
            headers.insert(name, value);
        }

        headers.insert(
            HeaderName::from_static(X_TENANT_ID),
            HeaderValue::from_str(self.tenant_id().as_str())
                .map_err(|_| Error::InvalidInput("Invalid tenant id".to_string()))?,
        );

        let mut bearer = HeaderValue::from_str(&self.state.token.bearer())
            .map_err(|_| Error::InvalidInput("Invalid token format".to_string()))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(headers)
    }
}

/// Sort a response into success, HTTP error, or unreadable body.
///
/// Any status below 400 counts as success and must carry a JSON body;
/// an empty or non-JSON body is reported as a request exception.
fn classify(response: Response) -> ApiResponse {
    let status = response.status();
    let body = match response.text() {
        Ok(body) => body,
        Err(err) => return ApiResponse::request_exception(err.to_string()),
    };

    if status.is_client_error() || status.is_server_error() {
        return ApiResponse::http_error(status.as_u16(), body);
    }

    match serde_json::from_str(&body) {
        Ok(data) => ApiResponse::success(data),
        Err(err) => ApiResponse::request_exception(err.to_string()),
    }
}

impl Drop for TenantSession {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for TenantSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantSession")
            .field("credentials", &self.credentials)
            .field("tenant_id", self.tenant_id())
            .field("api_host", &self.api_host())
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.token_expires_at())
            .field("closed", &self.is_closed())
            .finish()
    }
}
