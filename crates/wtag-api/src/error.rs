use thiserror::Error;

/// Everything that can go wrong talking to the cloud API.
///
/// `wtag-core` maps these into its domain errors; nothing above it should
/// need to match on HTTP details.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// `SignIn` returned a fault (bad email or password, locked account).
    #[error("Sign-in rejected: {message}")]
    Authentication { message: String },

    /// The service no longer accepts the session cookie or bearer token.
    #[error("Session expired -- sign in again")]
    SessionExpired,

    // ── Transport ───────────────────────────────────────────────────
    /// Request never got a response: DNS, refused connection, timeout.
    #[error("Request to the tag service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Cannot build web method URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Service ─────────────────────────────────────────────────────
    /// Fault returned by an `.asmx` web method (`{ Message, ExceptionType }`).
    #[error("Tag service fault: {message}")]
    Api {
        message: String,
        exception: Option<String>,
    },

    /// Response body was not the `{ "d": ... }` shape the method promises.
    #[error("Unexpected response from the tag service: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Whether a fresh sign-in could fix this.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::SessionExpired)
    }
}
