// ── Node registry ──
//
// The node server's `NodeHost`: persists driver values, broadcasts each
// report to subscribers (the stand-in for the hub connection) and keeps
// child tag nodes in discovery order.

use indexmap::IndexMap;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::address::NodeAddress;
use crate::driver::{Driver, DriverDef, DriverReport, TAG_DRIVERS};
use crate::host::NodeHost;
use crate::store::DriverStore;
use crate::tag::{TAG_NODE_ID, TagNode};

const REPORT_CHANNEL_SIZE: usize = 256;

pub struct NodeRegistry {
    store: DriverStore,
    tags: IndexMap<NodeAddress, TagNode>,
    report_tx: broadcast::Sender<DriverReport>,
}

impl NodeRegistry {
    pub fn new(store: DriverStore) -> Self {
        let (report_tx, _) = broadcast::channel(REPORT_CHANNEL_SIZE);
        Self {
            store,
            tags: IndexMap::new(),
            report_tx,
        }
    }

    pub fn store(&self) -> &DriverStore {
        &self.store
    }

    /// Register a node with its declared driver defaults.
    pub fn register(&mut self, address: &NodeAddress, defs: &[DriverDef]) {
        self.store.register(address, defs);
    }

    /// Subscribe to driver reports.
    pub fn subscribe(&self) -> broadcast::Receiver<DriverReport> {
        self.report_tx.subscribe()
    }

    /// Child tags in registration order.
    pub fn tags(&self) -> impl Iterator<Item = &TagNode> {
        self.tags.values()
    }

    /// Child tags belonging to one tag manager.
    pub fn tags_of<'a>(
        &'a self,
        primary: &NodeAddress,
    ) -> impl Iterator<Item = &'a TagNode> + use<'a> {
        let primary = primary.clone();
        self.tags.values().filter(move |t| t.primary == primary)
    }

    fn report(&self, address: &NodeAddress, driver: Driver, value: i64) {
        debug!(%address, %driver, value, "report driver");
        // No subscribers is fine: nothing is listening yet.
        let _ = self
            .report_tx
            .send(DriverReport::now(address.clone(), driver, value));
    }
}

impl NodeHost for NodeRegistry {
    fn set_driver(&mut self, address: &NodeAddress, driver: Driver, value: i64) {
        self.store.set(address, driver, value);
        self.report(address, driver, value);
    }

    fn get_driver(&self, address: &NodeAddress, driver: Driver) -> Option<i64> {
        self.store.get(address, driver)
    }

    fn report_drivers(&mut self, address: &NodeAddress) {
        for (driver, value) in self.store.values(address) {
            self.report(address, driver, value);
        }
    }

    fn add_node(&mut self, node: TagNode) -> bool {
        if self.tags.contains_key(&node.address) {
            debug!(address = %node.address, "tag node already registered");
            return false;
        }

        info!(
            address = %node.address,
            node_def = TAG_NODE_ID,
            name = %node.name,
            index = node.index,
            "adding tag node"
        );
        self.store.register(&node.address, TAG_DRIVERS);
        for (driver, value) in node.drivers() {
            self.set_driver(&node.address, driver, value);
        }
        self.tags.insert(node.address.clone(), node);
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::TAG_MANAGER_DRIVERS;
    use crate::model::TagRecord;

    fn tag(primary: &NodeAddress, index: usize, alive: bool) -> TagNode {
        TagNode::new(
            primary,
            index,
            TagRecord {
                uuid: None,
                slave_id: i32::try_from(index).unwrap(),
                name: format!("Tag {index}"),
                tag_type: 13,
                alive,
                out_of_range: false,
                temperature_c: None,
                humidity: None,
                lux: None,
                battery_volts: None,
                battery_remaining: None,
                signal_dbm: None,
                last_comm: None,
            },
        )
    }

    #[test]
    fn set_driver_broadcasts_one_report() {
        let mut registry = NodeRegistry::new(DriverStore::in_memory());
        let mut rx = registry.subscribe();
        let addr = NodeAddress::legalize("001122");

        registry.set_driver(&addr, Driver::St, 1);

        let report = rx.try_recv().unwrap();
        assert_eq!(report.address, addr);
        assert_eq!(report.driver, Driver::St);
        assert_eq!(report.value, 1);
        assert!(rx.try_recv().is_err());
        assert_eq!(registry.get_driver(&addr, Driver::St), Some(1));
    }

    #[test]
    fn report_drivers_sends_full_snapshot() {
        let mut registry = NodeRegistry::new(DriverStore::in_memory());
        let addr = NodeAddress::legalize("001122");
        registry.register(&addr, TAG_MANAGER_DRIVERS);
        let mut rx = registry.subscribe();

        registry.report_drivers(&addr);

        let first = rx.try_recv().unwrap();
        let second = rx.try_recv().unwrap();
        assert_eq!((first.driver, first.value), (Driver::St, 0));
        assert_eq!((second.driver, second.value), (Driver::Gv1, 1));
    }

    #[test]
    fn duplicate_tags_are_suppressed() {
        let mut registry = NodeRegistry::new(DriverStore::in_memory());
        let primary = NodeAddress::legalize("001122");

        assert!(registry.add_node(tag(&primary, 0, true)));
        assert!(registry.add_node(tag(&primary, 1, false)));
        assert!(!registry.add_node(tag(&primary, 0, true)));

        let indexes: Vec<usize> = registry.tags_of(&primary).map(|t| t.index).collect();
        assert_eq!(indexes, vec![0, 1]);

        let second = registry.tags().nth(1).unwrap();
        assert_eq!(registry.get_driver(&second.address, Driver::St), Some(0));
    }

    #[test]
    fn tags_of_does_not_borrow_the_key() {
        let mut registry = NodeRegistry::new(DriverStore::in_memory());
        let primary = NodeAddress::legalize("001122");
        registry.add_node(tag(&primary, 0, true));

        let tags: Vec<&TagNode> = registry.tags_of(&NodeAddress::legalize("001122")).collect();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].primary, primary);
    }
}
