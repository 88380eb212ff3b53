//! Error types for the `binance-futures-rs` crate.
//!
//! All fallible operations in this crate return [`Result<T>`], which is an
//! alias for `std::result::Result<T, Error>`.
//!
//! [`Error`] covers:
//! - **API errors** — structured `{code, msg}` responses from Binance
//! - **HTTP status errors** — unexpected status codes with response body
//! - **HTTP transport errors** — network, TLS, timeout failures
//! - **JSON errors** — deserialization failures
//! - **WebSocket errors** — connection and protocol errors
//! - **Invalid arguments** — client-side validation errors
//! - **Closed** — the REST pipeline or WebSocket stream is no longer usable

use std::fmt;

/// Structured error body returned by Binance on non-2xx responses, or
/// embedded in an otherwise-200 JSON body via a non-zero `code` field.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ApiErrorBody {
    /// Binance error code (negative integers, e.g. `-1021`).
    #[serde(default)]
    pub code: i64,
    /// Human-readable description of the error.
    #[serde(default)]
    pub msg: String,
}

impl fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.msg)
    }
}

/// All possible errors produced by the `binance-futures-rs` client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A structured `{code, msg}` error returned by the Binance API.
    #[error("API error: {0}")]
    Api(ApiErrorBody),

    /// The server returned an unexpected HTTP status code.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// The HTTP status code.
        status: reqwest::StatusCode,
        /// The response body text.
        body: String,
    },

    /// A network or transport-level error from `reqwest`.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to deserialize a JSON response or frame body.
    #[error("JSON deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A WebSocket-level error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// An error building or parsing a URL.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The caller provided an invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The credential pair required for this security class is absent.
    #[error("missing credentials for a request that requires an API key")]
    MissingCredentials,

    /// The REST pipeline or WebSocket stream has transitioned to a closed
    /// state and can no longer dispatch; the caller must reconnect.
    #[error("connection closed; caller must reconnect")]
    Closed,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
