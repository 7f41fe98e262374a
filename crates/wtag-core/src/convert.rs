// ── API → domain conversions ──
//
// Maps wtag-api wire types into the domain model. Lossy where the wire
// format is sloppy: unparseable UUIDs and pre-epoch timestamps become
// `None` rather than errors.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use wtag_api::{TagEntry, TagManagerEntry};

use crate::model::{MacAddress, TagManager, TagRecord};

/// FILETIME ticks (100 ns since 1601-01-01) at the Unix epoch.
const FILETIME_UNIX_EPOCH: i64 = 116_444_736_000_000_000;
const FILETIME_TICKS_PER_SEC: i64 = 10_000_000;

impl From<TagManagerEntry> for TagManager {
    fn from(entry: TagManagerEntry) -> Self {
        Self {
            mac: MacAddress::new(entry.mac),
            name: entry.name,
            online: entry.online,
            selected: entry.selected,
        }
    }
}

impl From<TagEntry> for TagRecord {
    fn from(entry: TagEntry) -> Self {
        Self {
            uuid: entry.uuid.as_deref().and_then(|u| Uuid::parse_str(u).ok()),
            slave_id: entry.slave_id,
            name: entry.name,
            tag_type: entry.tag_type,
            alive: entry.alive,
            out_of_range: entry.out_of_range,
            temperature_c: entry.temperature,
            humidity: entry.cap,
            lux: entry.lux,
            battery_volts: entry.battery_volt,
            battery_remaining: entry.battery_remaining,
            signal_dbm: entry.signal_dbm,
            last_comm: entry.last_comm.and_then(filetime_to_utc),
        }
    }
}

/// Convert a Windows FILETIME into UTC. Pre-epoch values yield `None`.
pub fn filetime_to_utc(ticks: i64) -> Option<DateTime<Utc>> {
    let since_epoch = ticks.checked_sub(FILETIME_UNIX_EPOCH)?;
    if since_epoch < 0 {
        return None;
    }
    let secs = since_epoch / FILETIME_TICKS_PER_SEC;
    let nanos = u32::try_from((since_epoch % FILETIME_TICKS_PER_SEC) * 100).ok()?;
    DateTime::from_timestamp(secs, nanos)
}
