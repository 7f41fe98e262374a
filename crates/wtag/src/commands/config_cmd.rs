//! `wtag config ...`: local profile management. Never contacts the service.

use std::collections::HashMap;

use dialoguer::{Input, Password, Select};

use wtag_core::DEFAULT_BASE_URL;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

// ── Helpers ─────────────────────────────────────────────────────────

/// A prompt that could not be shown or read (no TTY, closed stdin).
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn profile_not_found(name: String, cfg: &Config) -> CliError {
    let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
    available.sort();
    CliError::ProfileNotFound {
        name,
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
    }
}

/// Ask where a secret goes. Returns it back when it belongs in the file.
fn store_secret(profile_name: &str, kind: &str, secret: String) -> Result<Option<String>, CliError> {
    let choices = &["Store in system keyring (recommended)", "Save to config file (plaintext)"];
    let selection = Select::new()
        .with_prompt(format!("Where to store the {kind}?"))
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        wtag_config::store_secret(profile_name, kind, &secret)?;
        eprintln!("   ✓ {kind} stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(secret))
    }
}

fn non_empty(field: &str, value: String) -> Result<String, CliError> {
    if value.trim().is_empty() {
        return Err(CliError::Validation {
            field: field.into(),
            reason: format!("{field} cannot be empty"),
        });
    }
    Ok(value)
}

/// Copy of `cfg` with plaintext secrets masked.
fn redacted(cfg: &Config) -> Config {
    let profiles: HashMap<String, Profile> = cfg
        .profiles
        .iter()
        .map(|(name, p)| {
            let mut p = p.clone();
            p.token = p.token.map(|_| REDACTED.into());
            p.password = p.password.map(|_| REDACTED.into());
            (name.clone(), p)
        })
        .collect();

    Config {
        default_profile: cfg.default_profile.clone(),
        defaults: cfg.defaults.clone(),
        profiles,
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(),

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(
                &global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|e| format!("{c:#?}\n# {e}")),
                |c| c.default_profile_name().to_owned(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile_name();
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: wtag config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(profile_not_found(name, &cfg));
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Now using profile '{name}' by default");
            Ok(())
        }

        // ── SetSecret ───────────────────────────────────────────────
        ConfigCommand::SetSecret => {
            let cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg
                .profiles
                .get(&profile_name)
                .ok_or_else(|| profile_not_found(profile_name.clone(), &cfg))?;

            let kind = match profile.auth_mode.as_str() {
                "credentials" => "password",
                _ => "token",
            };
            let secret = Password::new()
                .with_prompt(format!("New {kind}"))
                .interact()
                .map_err(prompt_err)?;
            let secret = non_empty(kind, secret)?;

            wtag_config::store_secret(&profile_name, kind, &secret)?;
            eprintln!("✓ {kind} stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}

// ── Init: interactive wizard ────────────────────────────────────────

fn init() -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("wtag configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    // 1. Profile name
    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    // 2. Service URL
    let api_url: String = Input::new()
        .with_prompt("Tag service URL")
        .default(DEFAULT_BASE_URL.into())
        .interact_text()
        .map_err(prompt_err)?;
    wtag_config::parse_api_url(&api_url)?;

    // 3. Auth mode
    let auth_choices = &["OAuth token (recommended)", "Account email/password"];
    let auth_selection = Select::new()
        .with_prompt("Authentication method")
        .items(auth_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let mut profile = Profile {
        api_url,
        ..Profile::default()
    };

    if auth_selection == 0 {
        let token = Password::new()
            .with_prompt("Token")
            .interact()
            .map_err(prompt_err)?;
        let token = non_empty("token", token)?;

        profile.auth_mode = "token".into();
        profile.token = store_secret(&profile_name, "token", token)?;
    } else {
        let email: String = Input::new()
            .with_prompt("Account email")
            .interact_text()
            .map_err(prompt_err)?;
        let password = Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(prompt_err)?;
        let email = non_empty("email", email)?;
        let password = non_empty("password", password)?;

        profile.auth_mode = "credentials".into();
        profile.email = Some(email);
        profile.password = store_secret(&profile_name, "password", password)?;
    }

    // 4. Merge into the existing config
    let mut cfg = config::load_config_or_default();
    cfg.profiles.insert(profile_name.clone(), profile);
    cfg.default_profile = Some(profile_name.clone());
    config::save_config(&cfg)?;

    eprintln!("\n✓ Saved profile '{profile_name}' to {}", config_path.display());
    eprintln!("  Try it: wtag managers");
    Ok(())
}
