//! `wtag run`: start the node server and poll until interrupted.

use chrono::Local;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use wtag_core::{DriverReport, ServerConfig};

use crate::cli::{GlobalOpts, OutputFormat, RunArgs};
use crate::error::CliError;
use crate::output;

use super::util::{self, NodeRow, NodeSummary};

pub async fn handle(config: ServerConfig, args: RunArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let mut controller = util::start_controller(config).await?;

    // Subscribe before discovery so startup reports are streamed too.
    let printer = (!args.once && !global.quiet).then(|| {
        tokio::spawn(print_reports(
            controller.subscribe(),
            global.output.clone(),
            color,
        ))
    });

    let added = controller.discover().await?;
    info!(added, "discovery complete");

    if args.once {
        controller.save()?;
        let nodes = NodeSummary::collect(&controller);
        let out = output::render_list(&global.output, &nodes, |n| NodeRow::from(n), |n| {
            n.address.clone()
        });
        output::print_output(&out, global.quiet);
        return Ok(());
    }

    if !global.quiet {
        eprintln!(
            "Node server running with {} tag manager(s). Press Ctrl-C to stop.",
            controller.managers().count()
        );
    }

    let cancel = CancellationToken::new();
    let stopper = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stopper.cancel();
        }
    });

    let result = controller.run(cancel).await;

    // Dropping the controller closes the report channel and ends the printer.
    drop(controller);
    if let Some(printer) = printer {
        let _ = printer.await;
    }

    result?;
    if !global.quiet {
        eprintln!("✓ Driver state saved");
    }
    Ok(())
}

/// Stream driver reports to stdout until the channel closes.
async fn print_reports(
    mut rx: broadcast::Receiver<DriverReport>,
    format: OutputFormat,
    color: bool,
) {
    loop {
        match rx.recv().await {
            Ok(report) => {
                let line = match format {
                    OutputFormat::Json | OutputFormat::JsonCompact => {
                        output::render_json_line(&report)
                    }
                    _ => format_report(&report, color),
                };
                output::print_output(&line, false);
            }
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "driver report output lagged"),
            Err(RecvError::Closed) => break,
        }
    }
}

fn format_report(report: &DriverReport, color: bool) -> String {
    format!(
        "{} {} {}={}",
        report.at.with_timezone(&Local).format("%H:%M:%S"),
        output::address_label(report.address.as_str(), color),
        report.driver,
        report.value,
    )
}
