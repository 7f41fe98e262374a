//! CLI configuration: thin wrapper around `wtag_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--api-url, --token, --timeout).

use secrecy::SecretString;

use wtag_core::{AuthCredentials, DEFAULT_BASE_URL, ServerConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use wtag_config::{Config, Profile, config_path, load_config_or_default, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.default_profile_name().to_owned())
}

/// Build a `ServerConfig` from the config file, active profile, and
/// CLI overrides.
///
/// Without a matching profile, `--token` (or `WTAG_TOKEN`) alone is
/// enough to reach the public cloud.
pub fn build_server_config(global: &GlobalOpts) -> Result<ServerConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
            available.sort();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        None => Profile {
            api_url: DEFAULT_BASE_URL.into(),
            auth_mode: "token".into(),
            ..Profile::default()
        },
    };

    // Flag > env > profile
    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }
    if global.timeout.is_some() {
        profile.timeout = global.timeout;
    }

    let auth = match global.token {
        Some(ref token) => AuthCredentials::Token(SecretString::from(token.clone())),
        None => wtag_config::resolve_auth(&profile, &profile_name)?,
    };

    Ok(wtag_config::profile_to_server_config_with_auth(
        &profile,
        &profile_name,
        &cfg.defaults,
        auth,
    )?)
}
