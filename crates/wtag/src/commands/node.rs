//! `wtag node <TARGET> <COMMAND>`: run one command against a tag manager.

use wtag_core::{CommandPayload, NodeAddress, ServerConfig};

use crate::cli::{GlobalOpts, NodeArgs};
use crate::error::CliError;
use crate::output;

use super::util::{self, NodeSummary};

pub async fn handle(config: ServerConfig, args: NodeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let mut controller = util::start_controller(config).await?;
    controller.discover().await?;

    let payload = args
        .value
        .map_or_else(CommandPayload::empty, CommandPayload::with_value);
    controller.command(&args.target, &args.command, &payload)?;
    controller.save()?;

    let address = NodeAddress::legalize(&args.target);
    let node = controller
        .manager(&address)
        .ok_or_else(|| CliError::NotFound {
            resource_type: "node".into(),
            identifier: args.target.clone(),
            list_command: "managers".into(),
        })?;

    let summary = NodeSummary::of(&controller, node);
    let out = output::render_single(
        &global.output,
        &summary,
        |n| util::node_detail(n, color),
        |n| n.address.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
