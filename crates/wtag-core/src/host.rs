// ── Host collaborator seam ──
//
// What a node needs from the framework that hosts it: driver storage and
// reporting, plus registration of child nodes. The node server's own
// `NodeRegistry` implements this; tests substitute a recorder.

use crate::address::NodeAddress;
use crate::driver::Driver;
use crate::tag::TagNode;

pub trait NodeHost {
    /// Store `value` for `driver` on `address` and report it to the hub.
    fn set_driver(&mut self, address: &NodeAddress, driver: Driver, value: i64);

    /// Last value stored for `driver` on `address`.
    fn get_driver(&self, address: &NodeAddress, driver: Driver) -> Option<i64>;

    /// Report every stored driver value of `address`.
    fn report_drivers(&mut self, address: &NodeAddress);

    /// Register a child tag node. Returns `false` if one with the same
    /// address already exists.
    fn add_node(&mut self, node: TagNode) -> bool;
}
