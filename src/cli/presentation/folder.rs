//! Folder, tree and shared drive formatting.

use super::shared::{format_section_heading, table_with_header, to_pretty_json};
use crate::drive::SharedDrive;
use crate::error::ReplicaError;
use crate::replicate::{ReadOutcome, ValidatedFolder};
use serde_json::json;

pub fn format_validated_text(folder: &ValidatedFolder) -> String {
    let drive = folder.drive_id.as_deref().unwrap_or("My Drive");
    format!(
        "Valid folder: {} (ID: {})\n  Drive: {}\n",
        folder.name, folder.id, drive
    )
}

pub fn format_validated_json(folder: &ValidatedFolder) -> Result<String, ReplicaError> {
    to_pretty_json(folder)
}

pub fn format_inspect_text(folder: &ValidatedFolder, outcome: &ReadOutcome) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n\n",
        format_section_heading(&format!("{} ({})", folder.name, folder.id))
    ));
    out.push_str(&outcome.structure.render_tree());
    out.push_str(&format!(
        "\n{} folder(s), {} unread subtree(s)\n",
        outcome.structure.folder_count(),
        outcome.failures.len()
    ));
    for failure in &outcome.failures {
        out.push_str(&format!(
            "  skipped {} under '{}': {}\n",
            failure.id, failure.parent, failure.error
        ));
    }
    out
}

pub fn format_inspect_json(
    folder: &ValidatedFolder,
    outcome: &ReadOutcome,
) -> Result<String, ReplicaError> {
    to_pretty_json(&json!({
        "folder": folder,
        "root_name": outcome.root_name,
        "generation": outcome.generation,
        "folders": outcome.structure.folder_count(),
        "structure": outcome.structure,
        "failures": outcome.failures,
    }))
}

pub fn format_drives_text(drives: &[SharedDrive]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Shared drives")));
    if drives.is_empty() {
        out.push_str("No shared drives visible.\n");
        return out;
    }
    let mut table = table_with_header(vec!["Name", "Drive ID"]);
    for drive in drives {
        table.add_row(vec![drive.name.clone(), drive.id.clone()]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

pub fn format_drives_json(drives: &[SharedDrive]) -> Result<String, ReplicaError> {
    to_pretty_json(drives)
}
