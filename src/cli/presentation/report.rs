//! Replication report formatting.

use super::shared::{format_section_heading, table_with_header, to_pretty_json};
use crate::error::ReplicaError;
use crate::replicate::{ReplicationReport, WriteFailure};

/// Human-readable run summary, with failure tables when anything was left behind.
pub fn format_report_text(report: &ReplicationReport, dry_run: bool) -> String {
    let mut out = String::new();
    let title = if dry_run {
        "Replication plan (dry run)"
    } else {
        "Replication summary"
    };
    out.push_str(&format!("{}\n\n", format_section_heading(title)));
    out.push_str(&format!("  Run: {}\n", report.run_id));
    out.push_str(&format!(
        "  Source: {} ({})\n",
        report.source.name, report.source.id
    ));
    out.push_str(&format!(
        "  Destination: {} ({})\n",
        report.destination.name, report.destination.id
    ));
    out.push_str(&format!("  API generation: {:?}\n", report.generation));
    out.push_str(&format!(
        "  Folders read: {}\n",
        report.structure.folder_count()
    ));
    let created_label = if dry_run { "Would create" } else { "Created" };
    out.push_str(&format!("  {}: {}\n", created_label, report.created.len()));
    out.push_str(&format!("  Skipped: {}\n", report.skipped.len()));
    out.push_str(&format!("  Failures: {}\n", report.failure_count()));

    if !report.read_failures.is_empty() {
        out.push_str(&format!("\n{}\n\n", format_section_heading("Unread folders")));
        let mut table = table_with_header(vec!["Folder ID", "Under", "Stage", "Error"]);
        for failure in &report.read_failures {
            table.add_row(vec![
                failure.id.to_string(),
                failure.parent.to_string(),
                failure.stage.label().to_string(),
                failure.error.to_string(),
            ]);
        }
        out.push_str(&format!("{}\n", table));
    }

    if !report.write_failures.is_empty() {
        out.push_str(&format!("\n{}\n\n", format_section_heading("Uncreated folders")));
        let mut table = table_with_header(vec!["Path", "Reason"]);
        for failure in &report.write_failures {
            let reason = match failure {
                WriteFailure::MissingParent { parent, .. } => {
                    format!("parent '{}' was not created", parent)
                }
                WriteFailure::CreateFailed { error, .. } => error.to_string(),
            };
            table.add_row(vec![failure.path().to_string(), reason]);
        }
        out.push_str(&format!("{}\n", table));
    }

    if dry_run {
        out.push_str("\nNo folders were created.\n");
    }
    out
}

pub fn format_report_json(report: &ReplicationReport) -> Result<String, ReplicaError> {
    to_pretty_json(report)
}
