// ── Node server controller ──
//
// Owns the tag manager adapters and the node registry, and plays the host
// framework's part: discovery at startup, short poll (re-report drivers),
// long poll (refresh manager status) and command dispatch. Adapters run
// one at a time through `&mut self`, so a node never sees overlapping
// operations.

use std::time::Duration;

use indexmap::IndexMap;
use tokio::sync::broadcast;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::address::NodeAddress;
use crate::command::{CommandPayload, NodeCommand};
use crate::config::ServerConfig;
use crate::driver::{DriverReport, TAG_MANAGER_DRIVERS};
use crate::error::CoreError;
use crate::manager::TagManagerNode;
use crate::registry::NodeRegistry;
use crate::session::TagSession;
use crate::store::DriverStore;

pub struct Controller<S> {
    config: ServerConfig,
    session: S,
    managers: IndexMap<NodeAddress, TagManagerNode>,
    registry: NodeRegistry,
}

impl<S: TagSession> Controller<S> {
    /// Create a controller, loading persisted driver state if the config
    /// names a state file.
    pub fn new(config: ServerConfig, session: S) -> Result<Self, CoreError> {
        let store = match config.state_path {
            Some(ref path) => DriverStore::load(path)?,
            None => DriverStore::in_memory(),
        };
        Ok(Self::with_store(config, session, store))
    }

    pub fn with_store(config: ServerConfig, session: S, store: DriverStore) -> Self {
        Self {
            config,
            session,
            managers: IndexMap::new(),
            registry: NodeRegistry::new(store),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Tag managers in discovery order.
    pub fn managers(&self) -> impl Iterator<Item = &TagManagerNode> {
        self.managers.values()
    }

    pub fn manager(&self, address: &NodeAddress) -> Option<&TagManagerNode> {
        self.managers.get(address)
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DriverReport> {
        self.registry.subscribe()
    }

    // ── Discovery & polling ──────────────────────────────────────────

    /// List the account's tag managers. New ones are registered and
    /// started; known ones get their status refreshed. Returns how many
    /// managers were added.
    pub async fn discover(&mut self) -> Result<usize, CoreError> {
        let listed = self.session.list_managers().await?;
        info!(count = listed.len(), "tag managers listed");

        let mut added = 0;
        for entry in listed {
            let address = entry.mac.address();

            if let Some(node) = self.managers.get_mut(&address) {
                node.set_params(&entry, &mut self.registry);
                continue;
            }

            let is_new = !self.registry.store().contains(&address);
            self.registry.register(&address, TAG_MANAGER_DRIVERS);

            let mut node = TagManagerNode::new(entry.mac.clone(), entry.name.clone(), is_new);
            node.start(&self.session, &mut self.registry).await;
            self.managers.insert(address, node);
            added += 1;
        }

        Ok(added)
    }

    /// Short poll: re-report every manager's drivers.
    pub fn query_all(&mut self) {
        for node in self.managers.values() {
            node.query(&mut self.registry);
        }
    }

    /// Long poll: re-list managers and mirror their online flag.
    pub async fn refresh_status(&mut self) -> Result<(), CoreError> {
        let listed = self.session.list_managers().await?;

        for entry in &listed {
            let address = entry.mac.address();
            match self.managers.get_mut(&address) {
                Some(node) => node.set_params(entry, &mut self.registry),
                None => debug!(%address, mac = %entry.mac, "ignoring unknown tag manager"),
            }
        }
        Ok(())
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Parse a raw hub command and run it against `target`.
    pub fn command(
        &mut self,
        target: &str,
        name: &str,
        payload: &CommandPayload,
    ) -> Result<(), CoreError> {
        let command = NodeCommand::parse(name, payload).inspect_err(|e| {
            warn!(node = target, command = name, error = %e, "rejected command");
        })?;
        self.execute(target, command)
    }

    /// Run `command` on the manager whose address or MAC is `target`.
    pub fn execute(&mut self, target: &str, command: NodeCommand) -> Result<(), CoreError> {
        let address = NodeAddress::legalize(target);
        let node = self
            .managers
            .get_mut(&address)
            .ok_or_else(|| CoreError::NodeNotFound {
                address: target.to_owned(),
            })?;

        node.handle(command, &mut self.registry);
        Ok(())
    }

    /// Persist driver values. No-op without a state file.
    pub fn save(&self) -> Result<(), CoreError> {
        self.registry.store().save()
    }

    // ── Poll loop ────────────────────────────────────────────────────

    /// Poll until `cancel` fires, then save driver state.
    ///
    /// Poll failures are logged and the loop keeps going.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<(), CoreError> {
        let mut short = poll_interval(self.config.short_poll_secs).await;
        let mut long = poll_interval(self.config.long_poll_secs).await;
        info!(
            short_poll = self.config.short_poll_secs,
            long_poll = self.config.long_poll_secs,
            managers = self.managers.len(),
            "node server running"
        );

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = next_tick(long.as_mut()) => {
                    if let Err(e) = self.refresh_status().await {
                        warn!(error = %e, "long poll failed");
                    }
                }
                () = next_tick(short.as_mut()) => self.query_all(),
            }
        }

        info!("node server stopping");
        self.save()
    }
}

/// Interval for a poll period in seconds, with the immediate first tick
/// consumed. `None` when polling is disabled.
async fn poll_interval(secs: u64) -> Option<Interval> {
    if secs == 0 {
        return None;
    }
    let mut interval = tokio::time::interval(Duration::from_secs(secs));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await;
    Some(interval)
}

async fn next_tick(interval: Option<&mut Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
