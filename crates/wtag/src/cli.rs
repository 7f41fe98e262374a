//! Clap derive structures for the `wtag` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// wtag -- Wireless Sensor Tags node server
#[derive(Debug, Parser)]
#[command(
    name = "wtag",
    version,
    about = "Mirror Wireless Sensor Tag managers into your home-automation hub",
    long_about = "Runs the Wireless Sensor Tags node server from the command line.\n\n\
        Tag managers on your account become nodes with an online status (ST)\n\
        and a use-tags flag (GV1); with use-tags on, their tags become child nodes.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Account profile to use
    #[arg(long, short = 'p', env = "WTAG_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Tag service URL (overrides profile)
    #[arg(long, env = "WTAG_API_URL", global = true)]
    pub api_url: Option<String>,

    /// OAuth bearer token (overrides profile credentials)
    #[arg(long, env = "WTAG_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "WTAG_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Colorize output: auto, always or never
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print nothing but errors
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "WTAG_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// Pretty-printed JSON
    Json,
    /// JSON on one line
    JsonCompact,
    /// YAML
    Yaml,
    /// Identifiers only, one per line
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Color when stdout is a terminal and NO_COLOR is unset
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the tag managers on the account
    #[command(alias = "m")]
    Managers,

    /// Select a tag manager and list its tags
    #[command(alias = "t")]
    Tags(TagsArgs),

    /// Start the node server and poll until interrupted
    Run(RunArgs),

    /// Send a command to one tag manager node
    Node(NodeArgs),

    /// Inspect and edit profiles in the config file
    Config(ConfigArgs),

    /// Print a shell completion script
    Completions(CompletionsArgs),
}

// ── Command Arguments ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TagsArgs {
    /// Tag manager MAC, as listed by `wtag managers`
    pub mac: String,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Exit after discovery instead of polling
    #[arg(long)]
    pub once: bool,
}

#[derive(Debug, Args)]
pub struct NodeArgs {
    /// Node address or tag manager MAC
    pub target: String,

    /// Command name: SET_USE_TAGS, DON or DOF
    pub command: String,

    /// Command value (SET_USE_TAGS: 0 or 1)
    #[arg(long)]
    pub value: Option<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactively add a profile
    Init,

    /// Display current configuration
    Show,

    /// Print the config file path
    Path,

    /// List profile names (* marks the default)
    Profiles,

    /// Make a profile the default
    Use {
        /// Profile to use when --profile is not given
        name: String,
    },

    /// Store the active profile's token or password in the system keyring
    SetSecret,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
