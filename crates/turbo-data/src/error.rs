//! HTTP client error types.

use thiserror::Error;
use turbo_auth::AuthError;

/// Errors that can occur when making HTTP requests.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Failed to send the request.
    #[error("Request failed: {0}")]
    Request(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Could not reach the backend.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Request timeout.
    #[error("Request timed out")]
    Timeout,

    /// HTTP error response.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        /// Parsed JSON error body, when the backend sent one.
        body: Option<serde_json::Value>,
    },

    /// Failed to parse response body.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// No usable credentials.
    #[error("Not authenticated: {0}")]
    Auth(AuthError),

    /// Renewal failed and the credentials were purged.
    #[error("Session expired: {0}")]
    SessionExpired(AuthError),

    /// Still rejected with 401 after a successful renewal.
    #[error("Request rejected as unauthorized after renewing credentials")]
    Unauthorized,
}

impl FetchError {
    /// HTTP status of an error response.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if the backend could not be reached in time.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            FetchError::Timeout | FetchError::Connection(_) | FetchError::Request(_)
        )
    }

    /// Check if the user has to log in again.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            FetchError::Auth(_) | FetchError::SessionExpired(_) | FetchError::Unauthorized
        )
    }

    /// A string field of the JSON error body.
    pub fn body_field(&self, field: &str) -> Option<&str> {
        match self {
            FetchError::Http {
                body: Some(body), ..
            } => body.get(field).and_then(serde_json::Value::as_str),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Json(e.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::Connection(e.to_string())
        } else if e.is_decode() {
            FetchError::Parse(e.to_string())
        } else if e.is_builder() {
            FetchError::InvalidUrl(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}
