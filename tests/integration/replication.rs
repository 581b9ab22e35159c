//! End-to-end replication against the in-memory drive

use super::support::scenario;
use treeclone::drive::{DriveCall, MemoryDrive};
use treeclone::progress::{CollectingSink, ProgressEvent};
use treeclone::replicate::{replicate, ReplicationRequest};
use treeclone::tree::RelativePath;

#[tokio::test]
async fn test_hierarchy_recreated_under_destination() {
    let fx = scenario();
    let sink = CollectingSink::new();

    let report = replicate(
        &fx.drive,
        &sink,
        ReplicationRequest {
            source: fx.source.clone(),
            destination: fx.destination.clone(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert!(report.is_complete());
    assert_eq!(fx.drive.child_names(&fx.destination), vec!["B", "C"]);
    let b = fx.drive.find_path(&fx.destination, &["B"]).unwrap();
    assert_eq!(fx.drive.child_names(&b), vec!["D"]);

    // The source root aliases the destination root.
    assert_eq!(
        report.id_map.get(&RelativePath::parse("A")),
        Some(&fx.destination)
    );
    assert_eq!(report.id_map.get(&RelativePath::parse("A/B")), Some(&b));
    assert_eq!(report.skipped, vec![RelativePath::parse("A")]);
}

#[tokio::test]
async fn test_parents_created_before_children() {
    let fx = scenario();
    let sink = CollectingSink::new();
    replicate(
        &fx.drive,
        &sink,
        ReplicationRequest {
            source: fx.source.clone(),
            destination: fx.destination.clone(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let names: Vec<String> = fx
        .drive
        .created()
        .into_iter()
        .map(|(_, name)| name)
        .collect();
    assert_eq!(names, vec!["B", "C", "D"]);
}

#[tokio::test]
async fn test_files_are_not_copied() {
    let fx = scenario();
    fx.drive.add_file(Some(&fx.source), "notes.txt", "text/plain");
    let before = fx.drive.item_count();
    let sink = CollectingSink::new();

    let report = replicate(
        &fx.drive,
        &sink,
        ReplicationRequest {
            source: fx.source.clone(),
            destination: fx.destination.clone(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(report.created.len(), 3);
    assert_eq!(fx.drive.item_count(), before + 3);
}

#[tokio::test]
async fn test_empty_source_creates_nothing() {
    let drive = MemoryDrive::new();
    let source = drive.add_folder(None, "Empty");
    let destination = drive.add_folder(None, "Dest");
    let sink = CollectingSink::new();

    let report = replicate(
        &drive,
        &sink,
        ReplicationRequest {
            source,
            destination,
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert!(report.created.is_empty());
    assert!(report.is_complete());
    assert!(!drive
        .calls()
        .iter()
        .any(|call| matches!(call, DriveCall::CreateFolder { .. })));
}

#[tokio::test]
async fn test_progress_lines_in_order() {
    let fx = scenario();
    let sink = CollectingSink::new();
    replicate(
        &fx.drive,
        &sink,
        ReplicationRequest {
            source: fx.source.clone(),
            destination: fx.destination.clone(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let events = sink.events();
    assert!(matches!(events.first(), Some(ProgressEvent::RunStarted { .. })));
    assert!(matches!(
        events.last(),
        Some(ProgressEvent::WriteFinished {
            created: 3,
            failed: 0,
            ..
        })
    ));
    assert!(sink
        .messages()
        .iter()
        .any(|line| line.starts_with("Created: A/B/D (ID: ")));
}

#[tokio::test]
async fn test_same_named_siblings_collapse() {
    let drive = MemoryDrive::new();
    let source = drive.add_folder(None, "A");
    drive.add_folder(Some(&source), "Twin");
    drive.add_folder(Some(&source), "Twin");
    let destination = drive.add_folder(None, "Dest");
    let sink = CollectingSink::new();

    let report = replicate(
        &drive,
        &sink,
        ReplicationRequest {
            source,
            destination: destination.clone(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(drive.child_names(&destination), vec!["Twin"]);
    assert!(report.skipped.contains(&RelativePath::parse("A/Twin")));
}
