//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod config_cmd;
pub mod managers;
pub mod node;
pub mod run;
pub mod tags;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a service-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    let config = crate::config::build_server_config(global)?;

    match cmd {
        Command::Managers => managers::handle(&config, global).await,
        Command::Tags(args) => tags::handle(&config, args, global).await,
        Command::Run(args) => run::handle(config, args, global).await,
        Command::Node(args) => node::handle(config, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions are not service commands".into(),
        )),
    }
}
