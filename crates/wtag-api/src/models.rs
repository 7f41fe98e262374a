// Cloud API response types
//
// The service returns ASP.NET JSON: results wrapped in `{ "d": ... }`,
// objects tagged with `__type`, and fields that come and go between
// firmware generations. Fields use `#[serde(default)]` liberally and
// anything not modelled lands in `extra`.

use serde::{Deserialize, Serialize};

// ── Envelope ─────────────────────────────────────────────────────────

/// Standard ASP.NET web-method envelope: `{ "d": <result> }`.
#[derive(Debug, Deserialize)]
pub struct AspNetResponse<T> {
    pub d: T,
}

/// Fault body returned alongside HTTP 500.
#[derive(Debug, Deserialize)]
pub struct AspNetFault {
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(default, rename = "ExceptionType")]
    pub exception_type: Option<String>,
}

impl AspNetFault {
    /// The service signals an expired or missing session with an
    /// `UnauthorizedAccessException`.
    pub fn is_unauthorized(&self) -> bool {
        self.exception_type
            .as_deref()
            .is_some_and(|t| t.contains("UnauthorizedAccess"))
    }
}

// ── Tag manager ──────────────────────────────────────────────────────

/// One entry from `GetTagManagers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagManagerEntry {
    pub mac: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub selected: bool,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Tag ──────────────────────────────────────────────────────────────

/// One tag from `GetTagList`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagEntry {
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub slave_id: i32,
    #[serde(default)]
    pub name: String,
    /// Hardware family (12 = MotionSensor, 13 = 13-bit temp, 21 = PIR, ...).
    #[serde(default)]
    pub tag_type: i32,
    #[serde(default)]
    pub alive: bool,
    #[serde(default, rename = "OutOfRange")]
    pub out_of_range: bool,
    /// Degrees Celsius, whatever the account's display unit.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Relative humidity (or moisture for water tags).
    #[serde(default)]
    pub cap: Option<f64>,
    #[serde(default)]
    pub lux: Option<f64>,
    #[serde(default)]
    pub battery_volt: Option<f64>,
    #[serde(default)]
    pub battery_remaining: Option<f64>,
    #[serde(default, rename = "signaldBm")]
    pub signal_dbm: Option<i32>,
    /// Windows FILETIME of the last update.
    #[serde(default)]
    pub last_comm: Option<i64>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
