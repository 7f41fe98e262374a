//! Rendering of command results for `--output`.
//!
//! `table` goes through `tabled` for lists and a hand-built detail view for
//! single items. `json`, `json-compact` and `yaml` serialize the domain
//! value itself. `plain` prints identifiers only, one per line, for piping.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Resolve `--color` against the terminal and `NO_COLOR`.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Auto => std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal(),
        ColorMode::Always => true,
        ColorMode::Never => false,
    }
}

/// "online" / "offline", colored when enabled.
pub fn status_label(online: bool, color: bool) -> String {
    let label = if online { "online" } else { "offline" };
    match (online, color) {
        (_, false) => label.to_owned(),
        (true, true) => label.green().to_string(),
        (false, true) => label.red().to_string(),
    }
}

/// Node address, highlighted when color is enabled.
pub fn address_label(address: &str, color: bool) -> String {
    if color {
        address.cyan().to_string()
    } else {
        address.to_owned()
    }
}

// ── Rendering ────────────────────────────────────────────────────────

/// Render a collection. `to_row` feeds the table, `id_of` feeds `plain`.
pub fn render_list<T, R>(
    format: &OutputFormat,
    items: &[T],
    to_row: impl Fn(&T) -> R,
    id_of: impl Fn(&T) -> String,
) -> String
where
    T: Serialize,
    R: Tabled,
{
    if let Some(text) = render_structured(format, items) {
        return text;
    }
    if matches!(format, OutputFormat::Plain) {
        return items.iter().map(id_of).collect::<Vec<_>>().join("\n");
    }

    let rows: Vec<R> = items.iter().map(to_row).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Render one item. `detail` produces the table-format view.
pub fn render_single<T: Serialize>(
    format: &OutputFormat,
    item: &T,
    detail: impl Fn(&T) -> String,
    id_of: impl Fn(&T) -> String,
) -> String {
    if let Some(text) = render_structured(format, item) {
        return text;
    }
    match format {
        OutputFormat::Plain => id_of(item),
        _ => detail(item),
    }
}

/// Compact single-line JSON, used for streamed records.
pub fn render_json_line<T: Serialize + ?Sized>(item: &T) -> String {
    to_json(item, true)
}

/// Write to stdout unless `--quiet` or there's nothing to say.
pub fn print_output(text: &str, quiet: bool) {
    if quiet || text.is_empty() {
        return;
    }
    let _ = writeln!(io::stdout().lock(), "{text}");
}

fn render_structured<T: Serialize + ?Sized>(format: &OutputFormat, value: &T) -> Option<String> {
    match format {
        OutputFormat::Json => Some(to_json(value, false)),
        OutputFormat::JsonCompact => Some(to_json(value, true)),
        OutputFormat::Yaml => Some(
            serde_yaml::to_string(value)
                .unwrap_or_else(|e| format!("error: cannot encode as YAML: {e}")),
        ),
        OutputFormat::Table | OutputFormat::Plain => None,
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, compact: bool) -> String {
    let encoded = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    encoded.unwrap_or_else(|e| format!("{{\"error\":\"cannot encode as JSON: {e}\"}}"))
}
