// ── Runtime node server configuration ──
//
// These types describe how to reach the tag service and how often to poll.
// They carry credential data but never touch disk; wtag-config builds a
// `ServerConfig` from a profile and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// How to authenticate with the tag service.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// OAuth bearer token issued to the node server.
    Token(SecretString),
    /// Account email and password (cookie session).
    Credentials {
        email: String,
        password: SecretString,
    },
}

/// Configuration for one node server instance.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Service root (e.g., `https://www.mytaglist.com`).
    pub api_url: Url,
    /// Authentication method and credentials.
    pub auth: AuthCredentials,
    /// Request timeout.
    pub timeout: Duration,
    /// How often drivers are re-reported (seconds). 0 = never.
    pub short_poll_secs: u64,
    /// How often manager status is refreshed from the cloud (seconds). 0 = never.
    pub long_poll_secs: u64,
    /// Where driver values are persisted between runs. `None` keeps them in memory.
    pub state_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Build a config with default timings for the given endpoint and credentials.
    pub fn new(api_url: Url, auth: AuthCredentials) -> Self {
        Self {
            api_url,
            auth,
            timeout: Duration::from_secs(30),
            short_poll_secs: 60,
            long_poll_secs: 600,
            state_path: None,
        }
    }
}
