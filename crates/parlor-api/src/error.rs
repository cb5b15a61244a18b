//! Error taxonomy for backend and storage requests.
//!
//! Three layers: transport failures ([`Error::Http`]), malformed
//! payloads ([`Error::Json`]), and structured backend rejections
//! ([`Error::Api`], carrying the status plus the backend's error code
//! and message, e.g. `missing_params` or `record_not_found`).

use serde_json::Value;

/// Convenience alias for API results.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by [`crate::ApiClient`] requests.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backend rejected the request with a structured error body.
    #[error("backend error: {source}")]
    Api {
        /// Parsed error detail.
        source: ApiError,
        /// Raw response body, kept for diagnostics.
        body: Option<String>,
    },

    /// Transport-level failure (DNS, TLS, connect, timeout).
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The token provider could not produce a bearer token.
    #[error("auth token unavailable: {0}")]
    Auth(#[from] crate::auth::AuthError),

    /// Client construction failed.
    #[error("failed to build API client: {0}")]
    Build(String),
}

/// A structured backend rejection.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message} (status {status})")]
pub struct ApiError {
    /// HTTP status of the response.
    pub status: u16,
    /// Backend error code, when the body carried one.
    pub code: Option<String>,
    /// Human-readable message.
    pub message: String,
}

impl ApiError {
    /// Parse an error body of the form `{"error": {"code", "message"}}`
    /// or `{"message": ...}`, falling back to a status-derived message.
    pub(crate) fn from_body(status: u16, body: &str) -> Self {
        let value = serde_json::from_str::<Value>(body).ok();

        let code = value
            .as_ref()
            .and_then(|v| v.pointer("/error/code"))
            .and_then(Value::as_str)
            .map(str::to_owned);

        let message = value
            .as_ref()
            .and_then(|v| {
                v.pointer("/error/message")
                    .or_else(|| v.get("message"))
                    .and_then(Value::as_str)
            })
            .map_or_else(|| format!("request failed with status {status}"), str::to_owned);

        Self { status, code, message }
    }
}
