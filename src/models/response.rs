//! Request options and the tagged result returned by every request.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a request against the tenant API.
///
/// Requests never return `Err` for HTTP or network failures; callers branch
/// on the variant instead. Serializes as
/// `{"status": "success", "data": ...}` or
/// `{"status": "error", "error": ..., "details": ...}`.
///
/// # Example
///
/// ```
/// use sophos_central::ApiResponse;
/// use serde_json::json;
///
/// let response = ApiResponse::success(json!({"items": []}));
/// assert_eq!(
///     serde_json::to_value(&response).unwrap(),
///     json!({"status": "success", "data": {"items": []}}),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ApiResponse {
    /// A 2xx response with its parsed JSON body
    Success {
        /// Parsed response body
        data: Value,
    },
    /// Any failure: HTTP status, transport, or closed session
    Error {
        /// Short description of the failure
        error: String,
        /// Raw response body or underlying error message
        details: String,
    },
}

impl ApiResponse {
    /// Message used when the session has been closed.
    pub const SESSION_CLOSED: &'static str = "Session is closed.";
    /// Message used for transport-level failures.
    pub const REQUEST_EXCEPTION: &'static str = "Request exception occurred.";

    /// A successful response.
    pub fn success(data: Value) -> Self {
        ApiResponse::Success { data }
    }

    /// A non-2xx HTTP response.
    pub fn http_error(status: u16, body: impl Into<String>) -> Self {
        ApiResponse::Error {
            error: format!("Request failed with status code {status}"),
            details: body.into(),
        }
    }

    /// A failure below the HTTP layer (connect, timeout, DNS, bad body).
    pub fn request_exception(message: impl Into<String>) -> Self {
        ApiResponse::Error {
            error: Self::REQUEST_EXCEPTION.to_string(),
            details: message.into(),
        }
    }

    /// The short-circuit result for a closed session.
    pub fn session_closed() -> Self {
        ApiResponse::Error {
            error: Self::SESSION_CLOSED.to_string(),
            details: Self::SESSION_CLOSED.to_string(),
        }
    }

    /// Returns `true` for a success result.
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success { .. })
    }

    /// Get the response data, if this is a success result.
    pub fn data(&self) -> Option<&Value> {
        match self {
            ApiResponse::Success { data } => Some(data),
            ApiResponse::Error { .. } => None,
        }
    }

    /// Get the error description, if this is an error result.
    pub fn error(&self) -> Option<&str> {
        match self {
            ApiResponse::Success { .. } => None,
            ApiResponse::Error { error, .. } => Some(error),
        }
    }

    /// Get the error details, if this is an error result.
    pub fn details(&self) -> Option<&str> {
        match self {
            ApiResponse::Success { .. } => None,
            ApiResponse::Error { details, .. } => Some(details),
        }
    }

    /// Consume the response, returning the data or the `(error, details)` pair.
    pub fn into_result(self) -> std::result::Result<Value, (String, String)> {
        match self {
            ApiResponse::Success { data } => Ok(data),
            ApiResponse::Error { error, details } => Err((error, details)),
        }
    }
}

/// Per-request passthrough options: query parameters, JSON body, extra headers.
///
/// # Example
///
/// ```
/// use sophos_central::RequestOptions;
/// use serde_json::json;
///
/// let options = RequestOptions::new()
///     .query("pageSize", "50")
///     .json(json!({"enabled": true}));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub(crate) query: Vec<(String, String)>,
    pub(crate) json: Option<Value>,
    pub(crate) headers: Vec<(String, String)>,
}

impl RequestOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Set the JSON request body.
    pub fn json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    /// Add an extra header. The session's own headers take precedence.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_error_shape() {
        let response = ApiResponse::http_error(404, "not here");
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "status": "error",
                "error": "Request failed with status code 404",
                "details": "not here"
            })
        );
    }

    #[test]
    fn test_session_closed_shape() {
        let response = ApiResponse::session_closed();
        assert_eq!(response.error(), Some("Session is closed."));
        assert_eq!(response.details(), Some("Session is closed."));
        assert!(!response.is_success());
    }

    #[test]
    fn test_deserialize_tagged() {
        let response: ApiResponse =
            serde_json::from_value(json!({"status": "success", "data": [1, 2]})).unwrap();
        assert_eq!(response.data(), Some(&json!([1, 2])));
    }

    #[test]
    fn test_into_result() {
        let err = ApiResponse::request_exception("dns failure").into_result();
        assert_eq!(
            err,
            Err(("Request exception occurred.".to_string(), "dns failure".to_string()))
        );
    }

    #[test]
    fn test_options_builder() {
        let options = RequestOptions::new()
            .query("pageSize", 50)
            .query("page", 2)
            .header("X-Trace", "abc");
        assert_eq!(
            options.query,
            vec![
                ("pageSize".to_string(), "50".to_string()),
                ("page".to_string(), "2".to_string())
            ]
        );
        assert_eq!(options.headers.len(), 1);
        assert!(options.json.is_none());
    }
}
