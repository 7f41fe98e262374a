// ── Child tag node ──
//
// Created by a tag manager during discovery and owned by the registry.

use serde::Serialize;

use crate::address::NodeAddress;
use crate::driver::Driver;
use crate::model::TagRecord;

/// Node type id of child tags.
pub const TAG_NODE_ID: &str = "wTag";

/// A wireless sensor tag mirrored as a child node of its tag manager.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagNode {
    /// Address of the owning tag manager.
    pub primary: NodeAddress,
    pub address: NodeAddress,
    pub name: String,
    /// Position in the manager's tag list at discovery time.
    pub index: usize,
    pub record: TagRecord,
}

impl TagNode {
    /// Build the child node for the `index`-th tag of `primary`.
    ///
    /// The address comes from the tag UUID so it survives reordering on the
    /// service side; UUID-less tags fall back to manager address plus index.
    pub fn new(primary: &NodeAddress, index: usize, record: TagRecord) -> Self {
        let address = match record.uuid {
            Some(uuid) => NodeAddress::legalize(&uuid.simple().to_string()),
            None => NodeAddress::legalize(&format!("{primary}t{index}")),
        };
        let name = if record.name.trim().is_empty() {
            format!("Tag {index}")
        } else {
            record.name.clone()
        };

        Self {
            primary: primary.clone(),
            address,
            name,
            index,
            record,
        }
    }

    /// Current driver values of this node.
    pub fn drivers(&self) -> Vec<(Driver, i64)> {
        vec![(Driver::St, i64::from(self.record.alive))]
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::address::MAX_ADDRESS_LEN;

    fn record(name: &str, uuid: Option<Uuid>) -> TagRecord {
        TagRecord {
            uuid,
            slave_id: 0,
            name: name.into(),
            tag_type: 13,
            alive: true,
            out_of_range: false,
            temperature_c: Some(21.0),
            humidity: None,
            lux: None,
            battery_volts: None,
            battery_remaining: None,
            signal_dbm: None,
            last_comm: None,
        }
    }

    #[test]
    fn address_derives_from_uuid() {
        let primary = NodeAddress::legalize("0A1B2C3D4E5F");
        let uuid = Uuid::new_v4();
        let a = TagNode::new(&primary, 0, record("Freezer", Some(uuid)));
        let b = TagNode::new(&primary, 5, record("Freezer", Some(uuid)));

        assert_eq!(a.address, b.address);
        assert!(a.address.as_str().len() <= MAX_ADDRESS_LEN);
    }

    #[test]
    fn uuidless_tags_use_index() {
        let primary = NodeAddress::legalize("0A1B2C3D4E5F");
        let node = TagNode::new(&primary, 2, record("", None));

        assert_eq!(node.address.as_str(), "0a1b2c3d4e5ft2");
        assert_eq!(node.name, "Tag 2");
        assert_eq!(node.drivers(), vec![(Driver::St, 1)]);
    }
}
