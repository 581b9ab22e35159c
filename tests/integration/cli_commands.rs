//! Commands routed through the run context against the in-memory drive

use super::support::scenario;
use clap::Parser;
use tempfile::TempDir;
use treeclone::cli::{Cli, RunContext};
use treeclone::config::TreecloneConfig;
use treeclone::drive::MemoryDrive;
use treeclone::error::ReplicaError;

fn context() -> RunContext {
    RunContext::from_config(TreecloneConfig::default(), true).unwrap()
}

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn test_inspect_draws_tree() {
    let fx = scenario();
    let cli = parse(&["treeclone", "inspect", fx.source.as_str()]);
    let output = context().execute_with(&cli.command, &fx.drive).unwrap();
    assert!(output.text.contains("A\n├── B\n│   └── D\n└── C\n"));
    assert!(output.text.contains("4 folder(s), 0 unread subtree(s)"));
    assert!(fx.drive.created().is_empty());
}

#[test]
fn test_inspect_json() {
    let fx = scenario();
    let cli = parse(&["treeclone", "inspect", fx.source.as_str(), "--format", "json"]);
    let output = context().execute_with(&cli.command, &fx.drive).unwrap();
    let json: serde_json::Value = serde_json::from_str(&output.text).unwrap();
    assert_eq!(json["folders"], 4);
    assert_eq!(json["structure"]["A"], serde_json::json!(["B", "C"]));
}

#[test]
fn test_replicate_json_report_and_id_map() {
    let fx = scenario();
    let temp = TempDir::new().unwrap();
    let map_path = temp.path().join("map.json");
    let cli = parse(&[
        "treeclone",
        "replicate",
        fx.source.as_str(),
        fx.destination.as_str(),
        "--format",
        "json",
        "--id-map-out",
        map_path.to_str().unwrap(),
    ]);

    let output = context().execute_with(&cli.command, &fx.drive).unwrap();
    assert_eq!(output.exit_code, 0);
    let json: serde_json::Value = serde_json::from_str(&output.text).unwrap();
    assert_eq!(json["created"], serde_json::json!(["A/B", "A/C", "A/B/D"]));

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&map_path).unwrap()).unwrap();
    assert_eq!(saved["A"], fx.destination.as_str());
}

#[test]
fn test_replicate_show_tree_prefixes_summary() {
    let fx = scenario();
    let cli = parse(&[
        "treeclone",
        "replicate",
        fx.source.as_str(),
        fx.destination.as_str(),
        "--show-tree",
    ]);
    let output = context().execute_with(&cli.command, &fx.drive).unwrap();
    assert!(output.text.starts_with("A\n├── B"));
    assert!(output.text.contains("Created: 3"));
}

#[test]
fn test_replicate_dry_run_leaves_destination_untouched() {
    let fx = scenario();
    let temp = TempDir::new().unwrap();
    let map_path = temp.path().join("map.json");
    let cli = parse(&[
        "treeclone",
        "replicate",
        fx.source.as_str(),
        fx.destination.as_str(),
        "--dry-run",
        "--id-map-out",
        map_path.to_str().unwrap(),
    ]);
    let output = context().execute_with(&cli.command, &fx.drive).unwrap();
    assert_eq!(output.exit_code, 0);
    assert!(output.text.contains("Would create: 3"));
    assert!(fx.drive.created().is_empty());
    assert!(!map_path.exists());
}

#[test]
fn test_drives_json() {
    let drive = MemoryDrive::new();
    let (drive_id, _) = drive.add_shared_drive("Engineering");
    let cli = parse(&["treeclone", "drives", "--format", "json"]);
    let output = context().execute_with(&cli.command, &drive).unwrap();
    let json: serde_json::Value = serde_json::from_str(&output.text).unwrap();
    assert_eq!(json[0]["id"], drive_id.as_str());
    assert_eq!(json[0]["name"], "Engineering");
}

#[test]
fn test_validate_reports_trashed_folder() {
    let drive = MemoryDrive::new();
    let id = drive.add_folder(None, "Old");
    drive.trash(&id);
    let cli = parse(&["treeclone", "validate", id.as_str()]);
    let err = context().execute_with(&cli.command, &drive).unwrap_err();
    assert!(matches!(err, ReplicaError::Validation(_)));
}

#[test]
fn test_unknown_format_is_rejected_by_parser() {
    assert!(Cli::try_parse_from(["treeclone", "drives", "--format", "xml"]).is_err());
}

#[test]
fn test_run_context_from_explicit_config_file() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("treeclone.toml");
    std::fs::write(&config_path, "[drive]\npage_size = 100\nshared_drive = true\n").unwrap();

    let context = RunContext::new(temp.path().to_path_buf(), Some(config_path), true).unwrap();
    assert_eq!(context.config().drive.page_size, 100);
    assert!(context.config().drive.shared_drive);
}

#[test]
fn test_missing_config_file_is_an_error() {
    let temp = TempDir::new().unwrap();
    let result = RunContext::new(
        temp.path().to_path_buf(),
        Some(temp.path().join("absent.toml")),
        true,
    );
    assert!(matches!(result, Err(ReplicaError::Config(_))));
}
