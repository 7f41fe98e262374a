//! `wtag managers`: list the account's tag managers.

use tabled::Tabled;

use wtag_core::{ServerConfig, TagManager, TagSession};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ManagerRow {
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Selected")]
    selected: String,
}

impl From<&TagManager> for ManagerRow {
    fn from(m: &TagManager) -> Self {
        Self {
            mac: m.mac.to_string(),
            address: m.mac.address().to_string(),
            name: m.name.clone(),
            status: output::status_label(m.online, false),
            selected: if m.selected { "*" } else { "" }.into(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(config: &ServerConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let session = util::connect(config).await?;
    let managers = session.list_managers().await?;

    let out = output::render_list(&global.output, &managers, |m| ManagerRow::from(m), |m| {
        m.mac.to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
