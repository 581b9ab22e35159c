//! Best-effort behaviour when individual folders fail

use super::support::scenario;
use treeclone::error::{ReplicaError, ValidationError};
use treeclone::progress::CollectingSink;
use treeclone::replicate::{replicate, ReplicationRequest, WriteFailure};
use treeclone::tree::RelativePath;
use treeclone::types::FolderId;

#[tokio::test]
async fn test_failed_create_skips_descendants_only() {
    let fx = scenario();
    fx.drive.fail_create_named("B");
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

    assert_eq!(report.created, vec![RelativePath::parse("A/C")]);
    assert_eq!(report.write_failures.len(), 2);
    assert!(matches!(
        &report.write_failures[0],
        WriteFailure::CreateFailed { path, .. } if path == &RelativePath::parse("A/B")
    ));
    assert!(matches!(
        &report.write_failures[1],
        WriteFailure::MissingParent { parent, .. } if parent == &RelativePath::parse("A/B")
    ));
    assert!(sink
        .messages()
        .iter()
        .any(|line| line.starts_with("Warning: Parent path 'A/B' of 'A/B/D' not found")));
}

#[tokio::test]
async fn test_unreadable_subtree_is_reported_and_rest_replicated() {
    let fx = scenario();
    let b = fx.drive.find_path(&fx.source, &["B"]).unwrap();
    fx.drive.fail_listing(&b);
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

    assert_eq!(report.read_failures.len(), 1);
    assert_eq!(report.read_failures[0].id, b);
    // B itself is still created; D was never seen.
    assert_eq!(fx.drive.child_names(&fx.destination), vec!["B", "C"]);
    assert!(!report.is_complete());
}

#[tokio::test]
async fn test_missing_source_is_fatal_before_writing() {
    let fx = scenario();
    let sink = CollectingSink::new();

    let err = replicate(
        &fx.drive,
        &sink,
        ReplicationRequest {
            source: FolderId::new("does-not-exist"),
            destination: fx.destination.clone(),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        ReplicaError::Validation(ValidationError::Inaccessible { .. })
    ));
    assert!(fx.drive.created().is_empty());
}

#[tokio::test]
async fn test_destination_file_is_rejected() {
    let fx = scenario();
    let file = fx.drive.add_file(None, "doc", "application/pdf");
    let sink = CollectingSink::new();

    let err = replicate(
        &fx.drive,
        &sink,
        ReplicationRequest {
            source: fx.source.clone(),
            destination: file,
            ..Default::default()
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        ReplicaError::Validation(ValidationError::NotAFolder { .. })
    ));
}
