//! `wtag tags <MAC>`: select a tag manager and list its tags.

use tabled::Tabled;

use wtag_core::{MacAddress, ServerConfig, TagRecord, TagSession};

use crate::cli::{GlobalOpts, TagsArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct TagRow {
    #[tabled(rename = "#")]
    slave_id: i32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Alive")]
    alive: String,
    #[tabled(rename = "Temp °C")]
    temperature: String,
    #[tabled(rename = "Humidity")]
    humidity: String,
    #[tabled(rename = "Battery")]
    battery: String,
    #[tabled(rename = "Signal")]
    signal: String,
    #[tabled(rename = "Last Seen")]
    last_comm: String,
}

fn opt<T: std::fmt::Display>(value: Option<T>, suffix: &str) -> String {
    value.map(|v| format!("{v}{suffix}")).unwrap_or_default()
}

impl From<&TagRecord> for TagRow {
    fn from(t: &TagRecord) -> Self {
        Self {
            slave_id: t.slave_id,
            name: t.name.clone(),
            alive: if t.out_of_range {
                "out of range".into()
            } else if t.alive {
                "yes".into()
            } else {
                "no".into()
            },
            temperature: opt(t.temperature_c.map(|c| format!("{c:.1}")), ""),
            humidity: opt(t.humidity.map(|h| format!("{h:.0}")), "%"),
            battery: opt(t.battery_volts.map(|v| format!("{v:.2}")), " V"),
            signal: opt(t.signal_dbm, " dBm"),
            last_comm: opt(
                t.last_comm.map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string()),
                " UTC",
            ),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    config: &ServerConfig,
    args: TagsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mac = MacAddress::new(args.mac);
    let session = util::connect(config).await?;
    let tags = session.fetch_tag_list(&mac).await?;

    let out = output::render_list(&global.output, &tags, |t| TagRow::from(t), |t| {
        t.uuid.map_or_else(|| t.name.clone(), |u| u.to_string())
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
