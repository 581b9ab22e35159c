//! Shared formatting helpers.

use crate::error::ReplicaError;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;

/// Bold, underlined section title.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

pub(super) fn table_with_header(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(header);
    table
}

pub(super) fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ReplicaError> {
    Ok(serde_json::to_string_pretty(value)?)
}
