//! Integration tests for the `wtag` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! configuration handling and error exit codes without a live tag service.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `wtag` binary with env isolation.
///
/// Clears all `WTAG_*` env vars and points config directories at
/// `home` so tests never touch the user's real configuration.
fn wtag_cmd_in(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("wtag");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("XDG_DATA_HOME", home.join(".local/share"))
        .env_remove("WTAG_PROFILE")
        .env_remove("WTAG_API_URL")
        .env_remove("WTAG_TOKEN")
        .env_remove("WTAG_OUTPUT")
        .env_remove("WTAG_TIMEOUT")
        .env_remove("WTAG_EMAIL")
        .env_remove("WTAG_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

fn wtag_cmd() -> assert_cmd::Command {
    wtag_cmd_in(Path::new("/tmp/wtag-cli-test-nonexistent"))
}

/// Write `text` as the config file under a fresh home directory.
fn home_with_config(text: &str) -> tempfile::TempDir {
    let home = tempfile::tempdir().unwrap();
    let dir = home.path().join(".config").join("wtag");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), text).unwrap();
    home
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = wtag_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    wtag_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Wireless Sensor Tag")
            .and(predicate::str::contains("managers"))
            .and(predicate::str::contains("tags"))
            .and(predicate::str::contains("run"))
            .and(predicate::str::contains("node")),
    );
}

#[test]
fn test_version_flag() {
    wtag_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("wtag"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    wtag_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    wtag_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = wtag_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success(), "Expected failure for invalid subcommand");
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_managers_without_credentials() {
    wtag_cmd()
        .arg("managers")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("credentials"));
}

#[test]
fn test_unknown_profile() {
    wtag_cmd()
        .args(["--profile", "nope", "managers"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("nope"));
}

#[test]
fn test_invalid_api_url() {
    wtag_cmd()
        .args(["--token", "t0ken", "--api-url", "not a url", "managers"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("api_url"));
}

#[test]
fn test_unreachable_service() {
    wtag_cmd()
        .args([
            "--token",
            "t0ken",
            "--api-url",
            "http://127.0.0.1:1",
            "--timeout",
            "5",
            "managers",
        ])
        .assert()
        .code(7);
}

#[test]
fn test_invalid_output_format() {
    let output = wtag_cmd()
        .args(["--output", "invalid", "managers"])
        .output()
        .unwrap();
    assert!(!output.status.success(), "Expected failure for invalid output format");
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_node_requires_target_and_command() {
    wtag_cmd()
        .args(["node", "0a1b2c3d4e5f"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("COMMAND"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_no_config() {
    // `config show` renders the default config when no file exists.
    wtag_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_path() {
    let home = tempfile::tempdir().unwrap();
    wtag_cmd_in(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_profiles_marks_default() {
    let home = home_with_config(
        r#"
default_profile = "cabin"

[profiles.home]
token = "abc"

[profiles.cabin]
auth_mode = "credentials"
email = "me@example.com"
"#,
    );

    wtag_cmd_in(home.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cabin *").and(predicate::str::contains("home")));
}

#[test]
fn test_config_show_redacts_secrets() {
    let home = home_with_config(
        r#"
[profiles.default]
token = "super-secret-token"
"#,
    );

    wtag_cmd_in(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("super-secret-token")
                .not()
                .and(predicate::str::contains("********")),
        );
}

#[test]
fn test_config_use_unknown_profile() {
    let home = home_with_config("[profiles.home]\ntoken = \"abc\"\n");

    wtag_cmd_in(home.path())
        .args(["config", "use", "cabin"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("home"));
}

#[test]
fn test_config_subcommands_exist() {
    wtag_cmd()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("path"))
                .and(predicate::str::contains("profiles")),
        );
}
