// Cloud API HTTP client
//
// Wraps `reqwest::Client` with `.asmx` web-method URL construction and
// envelope unwrapping. Every web method is a JSON POST whose result comes
// back as `{ "d": ... }`; faults come back as HTTP 500 with an ASP.NET
// `{ Message, ExceptionType }` body. Endpoint groups (auth, managers,
// tags) live in separate files as inherent methods.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{AspNetFault, AspNetResponse};
use crate::transport::TransportConfig;

/// The two `.asmx` services the node server talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// Account-level methods: sign-in, manager listing and selection.
    Account,
    /// Methods scoped to the currently selected tag manager.
    Client,
}

impl Service {
    fn path(self) -> &'static str {
        match self {
            Self::Account => "ethAccount.asmx",
            Self::Client => "ethClient.asmx",
        }
    }
}

/// Raw HTTP client for the Wireless Sensor Tags cloud API.
///
/// The remote side is session-scoped: `SelectTagManager` changes which
/// manager subsequent `ethClient.asmx` calls act on. Callers that share a
/// client between managers must serialize select-then-call sequences.
pub struct WirelessTagClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
}

impl WirelessTagClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// automatically (session auth and manager selection live in cookies).
    /// `base_url` is the service root, e.g. `https://www.mytaglist.com`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.clone().with_cookie_jar().build_client()?;
        Ok(Self {
            http,
            base_url,
            token: None,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            token: None,
        }
    }

    /// Authenticate every request with an OAuth bearer token instead of a
    /// signed-in session.
    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    /// Whether requests carry a bearer token.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// The service root URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/{service}.asmx/{method}`.
    pub(crate) fn method_url(&self, service: Service, method: &str) -> Result<Url, Error> {
        let path = format!("{}/{method}", service.path());
        self.base_url.join(&path).map_err(Error::InvalidUrl)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// POST a JSON body to a web method and unwrap the `d` envelope.
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        service: Service,
        method: &str,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        let url = self.method_url(service, method)?;
        debug!("POST {}", url);

        let mut request = self.http.post(url).json(body);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let resp = request.send().await.map_err(Error::Transport)?;
        parse_envelope(resp).await
    }
}

/// Parse the `{ "d": ... }` envelope, or turn a fault body into an error.
async fn parse_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(Error::SessionExpired);
    }

    let body = resp.text().await.map_err(Error::Transport)?;

    if !status.is_success() {
        return Err(fault_error(status, &body));
    }

    let envelope: AspNetResponse<T> =
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: body.clone(),
        })?;

    Ok(envelope.d)
}

fn fault_error(status: reqwest::StatusCode, body: &str) -> Error {
    match serde_json::from_str::<AspNetFault>(body) {
        Ok(fault) if fault.is_unauthorized() => Error::SessionExpired,
        Ok(fault) => Error::Api {
            message: fault.message,
            exception: fault.exception_type,
        },
        Err(_) => Error::Api {
            message: format!("HTTP {status}"),
            exception: None,
        },
    }
}
