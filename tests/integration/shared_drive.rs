//! Shared drive scoping and legacy parameter fallback

use treeclone::drive::{ApiGeneration, DriveCall, MemoryDrive};
use treeclone::error::{ReplicaError, ValidationError};
use treeclone::progress::{CollectingSink, ProgressEvent};
use treeclone::replicate::{replicate, ReplicationRequest};

fn shared_fixture() -> (MemoryDrive, treeclone::types::FolderId, treeclone::types::FolderId) {
    let drive = MemoryDrive::new();
    let (_, source) = drive.add_shared_drive("Engineering");
    let docs = drive.add_folder(Some(&source), "Docs");
    drive.add_folder(Some(&docs), "Specs");
    let (_, destination) = drive.add_shared_drive("Archive");
    (drive, source, destination)
}

#[tokio::test]
async fn test_shared_drive_folders_replicate() {
    let (drive, source, destination) = shared_fixture();
    let sink = CollectingSink::new();

    let report = replicate(
        &drive,
        &sink,
        ReplicationRequest {
            source,
            destination: destination.clone(),
            shared_drive: true,
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert!(report.is_complete());
    assert!(report.source.drive_id.is_some());
    assert_eq!(report.generation, ApiGeneration::Current);
    assert!(drive.find_path(&destination, &["Docs", "Specs"]).is_some());
}

#[tokio::test]
async fn test_shared_folder_without_flag_is_inaccessible() {
    let (drive, source, destination) = shared_fixture();
    let sink = CollectingSink::new();

    let err = replicate(
        &drive,
        &sink,
        ReplicationRequest {
            source,
            destination,
            ..Default::default()
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        ReplicaError::Validation(ValidationError::Inaccessible { .. })
    ));
}

#[tokio::test]
async fn test_legacy_generation_carries_into_writes() {
    let (drive, source, destination) = shared_fixture();
    drive.legacy_only();
    let sink = CollectingSink::new();

    let report = replicate(
        &drive,
        &sink,
        ReplicationRequest {
            source,
            destination: destination.clone(),
            shared_drive: true,
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(report.generation, ApiGeneration::Legacy);
    assert_eq!(report.created.len(), 2);
    let creates: Vec<ApiGeneration> = drive
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            DriveCall::CreateFolder { generation, .. } => Some(generation),
            _ => None,
        })
        .collect();
    assert_eq!(creates, vec![ApiGeneration::Legacy, ApiGeneration::Legacy]);
    assert!(sink
        .events()
        .iter()
        .any(|event| matches!(event, ProgressEvent::GenerationFallback { .. })));
}
