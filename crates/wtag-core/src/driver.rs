// ── Driver model ──
//
// A driver is a named integer value a node exposes to the hub. Only the
// codes this node server reports are modelled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::address::NodeAddress;

/// Driver codes understood by the hub.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString,
)]
pub enum Driver {
    /// Node status (online / alive).
    #[strum(serialize = "ST")]
    #[serde(rename = "ST")]
    St,
    /// Tag manager: enumerate child tags.
    #[strum(serialize = "GV1")]
    #[serde(rename = "GV1")]
    Gv1,
}

/// Static declaration of one driver on a node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverDef {
    pub driver: Driver,
    /// Value assigned when a node is first registered.
    pub default: i64,
}

/// Drivers of the tag manager node type (`wTagManager`).
pub const TAG_MANAGER_DRIVERS: &[DriverDef] = &[
    DriverDef {
        driver: Driver::St,
        default: 0,
    },
    DriverDef {
        driver: Driver::Gv1,
        default: 1,
    },
];

/// Drivers of the child tag node type.
pub const TAG_DRIVERS: &[DriverDef] = &[DriverDef {
    driver: Driver::St,
    default: 0,
}];

/// Default registration value of `driver` in `defs`, if declared.
pub fn default_value(defs: &[DriverDef], driver: Driver) -> Option<i64> {
    defs.iter().find(|d| d.driver == driver).map(|d| d.default)
}

/// One driver value pushed to the hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverReport {
    pub address: NodeAddress,
    pub driver: Driver,
    pub value: i64,
    pub at: DateTime<Utc>,
}

impl DriverReport {
    pub fn now(address: NodeAddress, driver: Driver, value: i64) -> Self {
        Self {
            address,
            driver,
            value,
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn driver_codes_round_trip_through_strings() {
        assert_eq!(Driver::St.to_string(), "ST");
        assert_eq!(Driver::Gv1.to_string(), "GV1");
        assert_eq!("GV1".parse::<Driver>().unwrap(), Driver::Gv1);
        assert!("GV9".parse::<Driver>().is_err());
    }

    #[test]
    fn manager_defaults_match_node_definition() {
        assert_eq!(default_value(TAG_MANAGER_DRIVERS, Driver::St), Some(0));
        assert_eq!(default_value(TAG_MANAGER_DRIVERS, Driver::Gv1), Some(1));
        assert_eq!(default_value(TAG_DRIVERS, Driver::Gv1), None);
    }
}
