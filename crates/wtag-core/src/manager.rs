// ── Tag manager node ──
//
// Mirrors one physical tag manager as a drivers-based node. The host drives
// the lifecycle: `start()` once after registration, `query()` on every poll,
// `handle()` for commands. Two values are synchronized: `ST` (online) and
// `GV1` (use_tags). Remote failures are absorbed here and surface only as
// `ST = 0` plus an error log.

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::address::NodeAddress;
use crate::command::NodeCommand;
use crate::driver::{Driver, TAG_MANAGER_DRIVERS, default_value};
use crate::error::CoreError;
use crate::host::NodeHost;
use crate::model::{MacAddress, TagManager, TagRecord, TemperatureUnit, UseTags};
use crate::session::TagSession;
use crate::tag::TagNode;

/// Node type id of tag managers.
pub const TAG_MANAGER_NODE_ID: &str = "wTagManager";

/// Outcome of [`TagManagerNode::discover`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discovery {
    /// `use_tags` is off; the session was not touched.
    Disabled,
    /// The tag list could not be fetched; the node is now offline.
    Failed,
    /// The tag list was fetched and this many child nodes were offered to
    /// the host.
    Created(usize),
}

#[derive(Debug, Clone, Serialize)]
pub struct TagManagerNode {
    mac: MacAddress,
    address: NodeAddress,
    name: String,
    is_new: bool,
    online: Option<bool>,
    use_tags: Option<UseTags>,
    temperature_unit: TemperatureUnit,
}

impl TagManagerNode {
    /// `is_new` marks a manager seen for the first time, as opposed to one
    /// reloaded from persisted state.
    pub fn new(mac: MacAddress, name: impl Into<String>, is_new: bool) -> Self {
        let address = mac.address();
        Self {
            mac,
            address,
            name: name.into(),
            is_new,
            online: None,
            use_tags: None,
            temperature_unit: TemperatureUnit::default(),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn mac(&self) -> &MacAddress {
        &self.mac
    }

    pub fn address(&self) -> &NodeAddress {
        &self.address
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn online(&self) -> bool {
        self.online.unwrap_or(false)
    }

    pub fn use_tags(&self) -> UseTags {
        self.use_tags.unwrap_or_default()
    }

    pub fn temperature_unit(&self) -> TemperatureUnit {
        self.temperature_unit
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// One-shot initialization, run once the host has registered the node.
    pub async fn start<S, H>(&mut self, session: &S, host: &mut H)
    where
        S: TagSession,
        H: NodeHost,
    {
        self.set_online(true, false, host);

        if self.is_new {
            self.set_use_tags(UseTags::Off, false, host);
        } else {
            let restored = self.restored_use_tags(host);
            self.set_use_tags(restored, false, host);
        }
        info!(
            address = %self.address,
            node_def = TAG_MANAGER_NODE_ID,
            name = %self.name,
            is_new = self.is_new,
            use_tags = self.use_tags().as_driver_value(),
            "tag manager starting"
        );
        self.is_new = false;

        self.temperature_unit = TemperatureUnit::Fahrenheit;

        self.discover(session, host).await;
        self.query(host);
    }

    fn restored_use_tags<H: NodeHost>(&self, host: &H) -> UseTags {
        let fallback = default_value(TAG_MANAGER_DRIVERS, Driver::Gv1)
            .and_then(|v| UseTags::try_from(v).ok())
            .unwrap_or_default();

        match host.get_driver(&self.address, Driver::Gv1) {
            Some(raw) => UseTags::try_from(raw).unwrap_or_else(|e| {
                warn!(address = %self.address, error = %e, "ignoring persisted GV1");
                fallback
            }),
            None => fallback,
        }
    }

    /// Report all driver values to the hub.
    pub fn query<H: NodeHost>(&self, host: &mut H) {
        host.report_drivers(&self.address);
    }

    /// Enumerate child tags when `use_tags` is on.
    ///
    /// Each tag is offered to the host in service order with its 0-based
    /// position as index. This node keeps no per-child state; duplicate
    /// suppression on repeated discovery is up to the host.
    pub async fn discover<S, H>(&mut self, session: &S, host: &mut H) -> Discovery
    where
        S: TagSession,
        H: NodeHost,
    {
        debug!(address = %self.address, use_tags = self.use_tags().as_driver_value(), "discover");
        if !self.use_tags().is_on() {
            return Discovery::Disabled;
        }

        let Ok(tags) = self.fetch_tags(session, host).await else {
            return Discovery::Failed;
        };

        let count = tags.len();
        for (index, record) in tags.into_iter().enumerate() {
            debug!(address = %self.address, index, name = %record.name, "got tag");
            host.add_node(TagNode::new(&self.address, index, record));
        }
        Discovery::Created(count)
    }

    /// Fetch this manager's tags, updating `online` with the outcome.
    pub async fn fetch_tags<S, H>(
        &mut self,
        session: &S,
        host: &mut H,
    ) -> Result<Vec<TagRecord>, CoreError>
    where
        S: TagSession,
        H: NodeHost,
    {
        match session.fetch_tag_list(&self.mac).await {
            Ok(tags) => {
                self.set_online(true, false, host);
                Ok(tags)
            }
            Err(e) => {
                self.set_online(false, false, host);
                match &e {
                    CoreError::SelectionFailed { .. } => {
                        error!(address = %self.address, mac = %self.mac, error = %e, "unable to select tag manager");
                    }
                    _ => {
                        error!(address = %self.address, mac = %self.mac, error = %e, "unable to get tags");
                    }
                }
                Err(e)
            }
        }
    }

    // ── Setters ──────────────────────────────────────────────────────

    /// Apply a fresh listing entry for this manager.
    pub fn set_params<H: NodeHost>(&mut self, manager: &TagManager, host: &mut H) {
        self.set_online(manager.online, false, host);
    }

    /// Update `online` and report `ST`. Unforced writes of an unchanged
    /// value are skipped. Returns whether a report was issued.
    pub fn set_online<H: NodeHost>(&mut self, value: bool, force: bool, host: &mut H) -> bool {
        if !force && self.online == Some(value) {
            return false;
        }
        self.online = Some(value);
        host.set_driver(&self.address, Driver::St, i64::from(value));
        true
    }

    /// Update `use_tags` and report `GV1`, with the same change detection
    /// as [`set_online`](Self::set_online).
    pub fn set_use_tags<H: NodeHost>(&mut self, value: UseTags, force: bool, host: &mut H) -> bool {
        if !force && self.use_tags == Some(value) {
            return false;
        }
        self.use_tags = Some(value);
        host.set_driver(&self.address, Driver::Gv1, value.as_driver_value());
        true
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Apply a command from the hub. `DON`/`DOF` always report.
    pub fn handle<H: NodeHost>(&mut self, command: NodeCommand, host: &mut H) {
        debug!(address = %self.address, command = %command.name(), "command");
        match command {
            NodeCommand::SetUseTags(value) => {
                self.set_use_tags(value, false, host);
            }
            NodeCommand::On => {
                self.set_online(true, true, host);
            }
            NodeCommand::Off => {
                self.set_online(false, true, host);
            }
        }
    }
}
