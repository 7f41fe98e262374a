// ── Domain model ──
//
// Types the node server works with, decoupled from the cloud API's wire
// shapes (see `convert` for the mapping).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::address::NodeAddress;
use crate::error::CoreError;

// ── MacAddress ───────────────────────────────────────────────────────

/// Hardware address of a tag manager, exactly as the cloud reports it.
///
/// Opaque on purpose: the service expects the same spelling back in
/// `SelectTagManager`, so no normalization happens here. Use
/// [`MacAddress::address`] for the legalized node address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacAddress(String);

impl MacAddress {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The node address derived from this MAC.
    pub fn address(&self) -> NodeAddress {
        NodeAddress::legalize(&self.0)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

// ── UseTags ──────────────────────────────────────────────────────────

/// Whether a tag manager enumerates its child tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UseTags {
    #[default]
    Off,
    On,
}

impl UseTags {
    /// Driver value (`GV1`) for this setting.
    pub fn as_driver_value(self) -> i64 {
        match self {
            Self::Off => 0,
            Self::On => 1,
        }
    }

    pub fn is_on(self) -> bool {
        self == Self::On
    }
}

impl TryFrom<i64> for UseTags {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Off),
            1 => Ok(Self::On),
            other => Err(CoreError::ValidationFailed {
                message: format!("use_tags must be 0 or 1, got {other}"),
            }),
        }
    }
}

// ── TemperatureUnit ──────────────────────────────────────────────────

/// Display unit preference of a tag manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum TemperatureUnit {
    #[default]
    #[strum(serialize = "C")]
    Celsius,
    #[strum(serialize = "F")]
    Fahrenheit,
}

// ── Cloud entities ───────────────────────────────────────────────────

/// A tag manager as listed by the account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagManager {
    pub mac: MacAddress,
    pub name: String,
    pub online: bool,
    pub selected: bool,
}

/// One wireless sensor tag reported by a tag manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRecord {
    pub uuid: Option<Uuid>,
    pub slave_id: i32,
    pub name: String,
    pub tag_type: i32,
    pub alive: bool,
    pub out_of_range: bool,
    pub temperature_c: Option<f64>,
    pub humidity: Option<f64>,
    pub lux: Option<f64>,
    pub battery_volts: Option<f64>,
    pub battery_remaining: Option<f64>,
    pub signal_dbm: Option<i32>,
    pub last_comm: Option<DateTime<Utc>>,
}
