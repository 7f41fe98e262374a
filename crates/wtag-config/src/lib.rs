//! Configuration for the wtag node server.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `wtag_core::ServerConfig`. The CLI layers its
//! global flags on top of what this crate resolves.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use wtag_core::{AuthCredentials, DEFAULT_BASE_URL, ServerConfig};

/// Service name under which secrets are kept in the system keyring.
pub const KEYRING_SERVICE: &str = "wtag";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} is invalid: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' has no usable credentials")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("cannot write config as TOML: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("cannot load config: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named account profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// The profile to use when none is named explicitly.
    pub fn default_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Seconds between driver re-reports.
    #[serde(default = "default_short_poll")]
    pub short_poll: u64,

    /// Seconds between tag manager status refreshes.
    #[serde(default = "default_long_poll")]
    pub long_poll: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            short_poll: default_short_poll(),
            long_poll: default_long_poll(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}
fn default_short_poll() -> u64 {
    60
}
fn default_long_poll() -> u64 {
    600
}

/// A named account profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Service root. Defaults to the public cloud.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Auth mode: "token" or "credentials".
    #[serde(default = "default_auth_mode")]
    pub auth_mode: String,

    /// OAuth bearer token (plaintext; prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the token.
    pub token_env: Option<String>,

    /// Account email for credentials auth.
    pub email: Option<String>,

    /// Account password (plaintext; prefer keyring).
    pub password: Option<String>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Override short poll period.
    pub short_poll: Option<u64>,

    /// Override long poll period.
    pub long_poll: Option<u64>,

    /// Where driver values are persisted.
    pub state_file: Option<PathBuf>,
}

fn default_api_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_auth_mode() -> String {
    "token".into()
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "wtag", "wtag")
}

/// Where the config file lives on this platform.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default driver state file of a profile.
pub fn default_state_path(profile_name: &str) -> PathBuf {
    let file = format!("{profile_name}.json");
    project_dirs().map_or_else(
        || home_fallback(".local/share").join(&file),
        |dirs| dirs.data_dir().join(&file),
    )
}

fn home_fallback(base: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(base);
    p.push("wtag");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path`, overlaid by `WTAG_*` variables.
///
/// Nested keys use a double underscore:
/// `WTAG_PROFILES__HOME__TOKEN_ENV=HOME_TOKEN`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("WTAG_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it can't be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Write `cfg` to [`config_path`].
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Keyring ─────────────────────────────────────────────────────────

fn keyring_lookup(profile_name: &str, kind: &str) -> Option<SecretString> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/{kind}")).ok()?;
    entry.get_password().ok().map(SecretString::from)
}

/// Store a secret (`token` or `password`) for a profile in the keyring.
pub fn store_secret(profile_name: &str, kind: &str, secret: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/{kind}"))?;
    entry.set_password(secret)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve a bearer token from the credential chain (no CLI flag step).
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's token_env → env var lookup
    if let Some(ref env_name) = profile.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Some(secret) = keyring_lookup(profile_name, "token") {
        return Ok(secret);
    }

    // 3. Plaintext in config
    if let Some(ref token) = profile.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve account email + password without CLI flags.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<(String, SecretString), ConfigError> {
    let email = profile
        .email
        .clone()
        .or_else(|| std::env::var("WTAG_EMAIL").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;

    // 1. Env var
    if let Ok(pw) = std::env::var("WTAG_PASSWORD") {
        return Ok((email, SecretString::from(pw)));
    }

    // 2. Keyring
    if let Some(pw) = keyring_lookup(profile_name, "password") {
        return Ok((email, pw));
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok((email, SecretString::from(pw.clone())));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Credentials for `profile`, chosen by its `auth_mode`.
pub fn resolve_auth(profile: &Profile, profile_name: &str) -> Result<AuthCredentials, ConfigError> {
    match profile.auth_mode.as_str() {
        "token" => {
            let token = resolve_token(profile, profile_name)?;
            Ok(AuthCredentials::Token(token))
        }
        "credentials" => {
            let (email, password) = resolve_credentials(profile, profile_name)?;
            Ok(AuthCredentials::Credentials { email, password })
        }
        other => Err(ConfigError::Validation {
            field: "auth_mode".into(),
            reason: format!("expected 'token' or 'credentials', got '{other}'"),
        }),
    }
}

/// Parse and validate a profile's `api_url`.
pub fn parse_api_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "api_url".into(),
        reason: format!("invalid URL: {raw}"),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("expected an http(s) URL, got '{raw}'"),
        });
    }
    Ok(url)
}

/// Build a `ServerConfig` from a profile, with no CLI flag overrides.
///
/// Timings fall back to `defaults`; the state file to
/// [`default_state_path`].
pub fn profile_to_server_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ServerConfig, ConfigError> {
    let auth = resolve_auth(profile, profile_name)?;
    profile_to_server_config_with_auth(profile, profile_name, defaults, auth)
}

/// Like [`profile_to_server_config`], with credentials already resolved
/// (e.g. a token passed on the command line).
pub fn profile_to_server_config_with_auth(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    auth: AuthCredentials,
) -> Result<ServerConfig, ConfigError> {
    let api_url = parse_api_url(&profile.api_url)?;

    let mut config = ServerConfig::new(api_url, auth);
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.short_poll_secs = profile.short_poll.unwrap_or(defaults.short_poll);
    config.long_poll_secs = profile.long_poll.unwrap_or(defaults.long_poll);
    config.state_path = Some(
        profile
            .state_file
            .clone()
            .unwrap_or_else(|| default_state_path(profile_name)),
    );
    Ok(config)
}
