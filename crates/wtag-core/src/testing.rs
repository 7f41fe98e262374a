// ── Test doubles ──
//
// A recording `NodeHost` and a scripted `TagSession` shared by the adapter
// and controller tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::address::NodeAddress;
use crate::driver::Driver;
use crate::error::CoreError;
use crate::host::NodeHost;
use crate::model::{MacAddress, TagManager, TagRecord};
use crate::session::TagSession;
use crate::tag::TagNode;

pub fn tag_record(name: &str) -> TagRecord {
    TagRecord {
        uuid: None,
        slave_id: 0,
        name: name.into(),
        tag_type: 13,
        alive: true,
        out_of_range: false,
        temperature_c: Some(20.5),
        humidity: Some(41.0),
        lux: None,
        battery_volts: Some(3.01),
        battery_remaining: Some(0.92),
        signal_dbm: Some(-72),
        last_comm: None,
    }
}

pub fn manager_entry(mac: &str, name: &str, online: bool) -> TagManager {
    TagManager {
        mac: MacAddress::new(mac),
        name: name.into(),
        online,
        selected: false,
    }
}

// ── RecordingHost ────────────────────────────────────────────────────

/// `NodeHost` that records every call. `add_node` accepts everything so
/// tests can observe repeated offers.
#[derive(Debug, Default)]
pub struct RecordingHost {
    values: HashMap<(NodeAddress, Driver), i64>,
    pub sets: Vec<(NodeAddress, Driver, i64)>,
    pub full_reports: Vec<NodeAddress>,
    pub added: Vec<TagNode>,
}

impl RecordingHost {
    /// Seed a stored value without recording a report.
    pub fn preset(&mut self, address: &NodeAddress, driver: Driver, value: i64) {
        self.values.insert((address.clone(), driver), value);
    }

    /// Values reported for one driver, oldest first.
    pub fn reports_for(&self, address: &NodeAddress, driver: Driver) -> Vec<i64> {
        self.sets
            .iter()
            .filter(|(a, d, _)| a == address && *d == driver)
            .map(|(_, _, v)| *v)
            .collect()
    }
}

impl NodeHost for RecordingHost {
    fn set_driver(&mut self, address: &NodeAddress, driver: Driver, value: i64) {
        self.values.insert((address.clone(), driver), value);
        self.sets.push((address.clone(), driver, value));
    }

    fn get_driver(&self, address: &NodeAddress, driver: Driver) -> Option<i64> {
        self.values.get(&(address.clone(), driver)).copied()
    }

    fn report_drivers(&mut self, address: &NodeAddress) {
        self.full_reports.push(address.clone());
    }

    fn add_node(&mut self, node: TagNode) -> bool {
        self.added.push(node);
        true
    }
}

// ── ScriptedSession ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    Managers,
    Select,
    List,
}

/// `TagSession` returning canned data, optionally failing one step.
#[derive(Debug, Default)]
pub struct ScriptedSession {
    managers: Mutex<Vec<TagManager>>,
    tags: Vec<TagRecord>,
    failure: Option<Failure>,
    fetch_calls: AtomicUsize,
    selected: Mutex<Vec<MacAddress>>,
}

impl ScriptedSession {
    pub fn with_tags(tags: Vec<TagRecord>) -> Self {
        Self {
            tags,
            ..Self::default()
        }
    }

    pub fn with_managers(managers: Vec<TagManager>, tags: Vec<TagRecord>) -> Self {
        Self {
            managers: Mutex::new(managers),
            tags,
            ..Self::default()
        }
    }

    pub fn failing_managers() -> Self {
        Self {
            failure: Some(Failure::Managers),
            ..Self::default()
        }
    }

    pub fn failing_selection() -> Self {
        Self {
            failure: Some(Failure::Select),
            ..Self::default()
        }
    }

    pub fn failing_list() -> Self {
        Self {
            failure: Some(Failure::List),
            ..Self::default()
        }
    }

    /// Replace the manager listing returned from now on.
    pub fn set_managers(&self, managers: Vec<TagManager>) {
        *self.managers.lock().unwrap() = managers;
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Managers successfully selected, in call order.
    pub fn selected(&self) -> Vec<MacAddress> {
        self.selected.lock().unwrap().clone()
    }
}

impl TagSession for ScriptedSession {
    async fn list_managers(&self) -> Result<Vec<TagManager>, CoreError> {
        if self.failure == Some(Failure::Managers) {
            return Err(CoreError::ConnectionFailed {
                url: "https://tags.invalid".into(),
                reason: "connection refused".into(),
            });
        }
        Ok(self.managers.lock().unwrap().clone())
    }

    async fn fetch_tag_list(&self, mac: &MacAddress) -> Result<Vec<TagRecord>, CoreError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);

        if self.failure == Some(Failure::Select) {
            return Err(CoreError::SelectionFailed {
                mac: mac.to_string(),
                reason: "tag manager not found".into(),
            });
        }
        self.selected.lock().unwrap().push(mac.clone());

        if self.failure == Some(Failure::List) {
            return Err(CoreError::TagListFailed {
                mac: mac.to_string(),
                reason: "HTTP 500".into(),
            });
        }
        Ok(self.tags.clone())
    }
}
