//! Shared helpers for command handlers.

use serde::Serialize;
use tabled::Tabled;
use tracing::debug;

use wtag_core::{CloudSession, Controller, ServerConfig, TAG_MANAGER_NODE_ID, TagManagerNode};

use crate::error::CliError;
use crate::output;

/// Sign in (or attach the token) and return a live session.
pub async fn connect(config: &ServerConfig) -> Result<CloudSession, CliError> {
    debug!(url = %config.api_url, "connecting to tag service");
    Ok(CloudSession::connect(config).await?)
}

/// Connect and load persisted driver state.
pub async fn start_controller(config: ServerConfig) -> Result<Controller<CloudSession>, CliError> {
    let session = connect(&config).await?;
    Ok(Controller::new(config, session)?)
}

// ── Node summary ────────────────────────────────────────────────────

/// What the CLI shows for a running tag manager node.
#[derive(Debug, Serialize)]
pub struct NodeSummary {
    pub address: String,
    /// Node type id registered with the hub.
    pub node_def: &'static str,
    pub mac: String,
    pub name: String,
    pub online: bool,
    pub use_tags: bool,
    pub tags: usize,
}

impl NodeSummary {
    pub fn collect(controller: &Controller<CloudSession>) -> Vec<Self> {
        controller
            .managers()
            .map(|node| Self::of(controller, node))
            .collect()
    }

    pub fn of(controller: &Controller<CloudSession>, node: &TagManagerNode) -> Self {
        Self {
            address: node.address().to_string(),
            node_def: TAG_MANAGER_NODE_ID,
            mac: node.mac().to_string(),
            name: node.name().to_owned(),
            online: node.online(),
            use_tags: node.use_tags().is_on(),
            tags: controller.registry().tags_of(node.address()).count(),
        }
    }
}

#[derive(Tabled)]
pub struct NodeRow {
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Type")]
    node_def: &'static str,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "ST")]
    status: String,
    #[tabled(rename = "GV1")]
    use_tags: String,
    #[tabled(rename = "Tags")]
    tags: usize,
}

impl From<&NodeSummary> for NodeRow {
    fn from(n: &NodeSummary) -> Self {
        Self {
            address: n.address.clone(),
            node_def: n.node_def,
            mac: n.mac.clone(),
            name: n.name.clone(),
            status: output::status_label(n.online, false),
            use_tags: if n.use_tags { "on" } else { "off" }.into(),
            tags: n.tags,
        }
    }
}

/// Multi-line detail view of one node.
pub fn node_detail(n: &NodeSummary, color: bool) -> String {
    format!(
        "Address:  {}\nType:     {}\nMAC:      {}\nName:     {}\nStatus:   {}\nUse tags: {}\nTags:     {}",
        output::address_label(&n.address, color),
        n.node_def,
        n.mac,
        n.name,
        output::status_label(n.online, color),
        if n.use_tags { "on" } else { "off" },
        n.tags,
    )
}
