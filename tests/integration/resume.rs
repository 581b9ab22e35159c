//! Resuming a run from a saved id map

use super::support::scenario;
use tempfile::TempDir;
use treeclone::error::{ReplicaError, ValidationError};
use treeclone::progress::CollectingSink;
use treeclone::replicate::{replicate, ReplicationRequest};
use treeclone::tree::{FolderIdMap, RelativePath};

#[tokio::test]
async fn test_resume_creates_only_new_folders() {
    let fx = scenario();
    let sink = CollectingSink::new();
    let temp = TempDir::new().unwrap();
    let map_path = temp.path().join("runs").join("map.json");

    let first = replicate(
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
    first.id_map.save(&map_path).unwrap();

    let c = fx.drive.find_path(&fx.source, &["C"]).unwrap();
    fx.drive.add_folder(Some(&c), "E");

    let prior = FolderIdMap::load(&map_path).unwrap();
    assert_eq!(prior, first.id_map);
    let second = replicate(
        &fx.drive,
        &sink,
        ReplicationRequest {
            source: fx.source.clone(),
            destination: fx.destination.clone(),
            prior: Some(prior),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(second.created, vec![RelativePath::parse("A/C/E")]);
    assert_eq!(second.skipped.len(), 4);
    let dest_c = fx.drive.find_path(&fx.destination, &["C"]).unwrap();
    assert_eq!(fx.drive.child_names(&dest_c), vec!["E"]);
    // No duplicate B next to the first one.
    assert_eq!(fx.drive.child_names(&fx.destination), vec!["B", "C"]);
}

#[tokio::test]
async fn test_resume_map_for_other_destination_is_rejected() {
    let fx = scenario();
    let sink = CollectingSink::new();
    let elsewhere = fx.drive.add_folder(None, "Old Dest");
    let prior = FolderIdMap::seeded(elsewhere.clone());

    let err = replicate(
        &fx.drive,
        &sink,
        ReplicationRequest {
            source: fx.source.clone(),
            destination: fx.destination.clone(),
            prior: Some(prior),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        ReplicaError::Validation(ValidationError::ResumeMismatch { ref found, .. }) if found == &elsewhere
    ));
    assert!(fx.drive.created().is_empty());
}
