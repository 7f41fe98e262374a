// ── Core error types ──
//
// Domain errors from wtag-core. Consumers never see HTTP status codes or
// JSON parse failures directly; `CoreError::from_api` translates
// transport-layer errors into these variants.

use std::time::Duration;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the tag service at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Remote session errors ────────────────────────────────────────
    #[error("Unable to select tag manager {mac}: {reason}")]
    SelectionFailed { mac: String, reason: String },

    #[error("Unable to get tags for tag manager {mac}: {reason}")]
    TagListFailed { mac: String, reason: String },

    // ── Node errors ──────────────────────────────────────────────────
    #[error("Node not found: {address}")]
    NodeNotFound { address: String },

    #[error("Unknown command: {name}")]
    UnknownCommand { name: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// The .NET exception type reported by the service, if any.
        exception: Option<String>,
    },

    // ── Local state ──────────────────────────────────────────────────
    #[error("Driver state at {path}: {message}")]
    Persistence { path: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl CoreError {
    /// Translate a client error. `timeout` is the request timeout the
    /// client was built with, reported back when a request hits it.
    pub fn from_api(err: wtag_api::Error, timeout: Duration) -> Self {
        match err {
            wtag_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            wtag_api::Error::SessionExpired => CoreError::AuthenticationFailed {
                message: "Session expired -- sign in again".into(),
            },
            wtag_api::Error::Transport(ref e) if e.is_timeout() => CoreError::Timeout {
                timeout_secs: timeout.as_secs(),
            },
            wtag_api::Error::Transport(ref e) if e.is_connect() => CoreError::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string),
                reason: e.to_string(),
            },
            wtag_api::Error::Transport(e) => CoreError::Api {
                message: e.to_string(),
                exception: None,
            },
            wtag_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            wtag_api::Error::Api { message, exception } => CoreError::Api { message, exception },
            wtag_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
