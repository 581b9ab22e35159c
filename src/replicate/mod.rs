//! Folder Tree Replication
//!
//! Reads a source folder tree into a [`Structure`], then recreates it under a
//! destination folder. The reader runs to completion before the writer
//! starts. Both are best-effort: per-folder failures are itemized in the
//! report and never abort the run. Only missing inputs, inaccessible
//! endpoints, a resume map for another destination and authentication
//! failures are fatal, and those are all detected before any folder is
//! created.

pub mod reader;
pub mod session;
pub mod validate;
pub mod writer;

pub use reader::{ReadFailure, ReadOutcome, ReadStage, TreeReader};
pub use session::ReplicationSession;
pub use validate::{validate_folder, ValidatedFolder};
pub use writer::{creation_order, TreeWriter, WriteFailure, WriteOutcome};

use crate::drive::{ApiGeneration, DriveClient, DriveScope};
use crate::error::{ReplicaError, ValidationError};
use crate::progress::{new_run_id, ProgressEvent, ProgressSink};
use crate::tree::{FolderIdMap, RelativePath, Structure};
use crate::types::FolderId;
use serde::{Serialize, Serializer};
use std::fmt::Display;
use tracing::info;

pub(crate) fn serialize_display<T: Display, S: Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Inputs for one replication run
#[derive(Debug, Clone, Default)]
pub struct ReplicationRequest {
    pub source: FolderId,
    pub destination: FolderId,
    /// Request shared-drive visibility for every call
    pub shared_drive: bool,
    /// Overrides the drive detected for the source folder
    pub source_drive_id: Option<String>,
    /// Overrides the drive detected for the destination folder
    pub destination_drive_id: Option<String>,
    /// Id map from an earlier run to resume from
    pub prior: Option<FolderIdMap>,
    pub debug: bool,
}

/// Everything a run produced, including partial failures
#[derive(Debug, Clone, Serialize)]
pub struct ReplicationReport {
    pub run_id: String,
    pub source: ValidatedFolder,
    pub destination: ValidatedFolder,
    pub root_name: String,
    pub generation: ApiGeneration,
    pub structure: Structure,
    pub id_map: FolderIdMap,
    pub created: Vec<RelativePath>,
    pub skipped: Vec<RelativePath>,
    pub read_failures: Vec<ReadFailure>,
    pub write_failures: Vec<WriteFailure>,
}

impl ReplicationReport {
    pub fn failure_count(&self) -> usize {
        self.read_failures.len() + self.write_failures.len()
    }

    /// Whether every folder was read and written
    pub fn is_complete(&self) -> bool {
        self.failure_count() == 0
    }
}

/// Scope for calls against a validated folder. A folder that lives in a
/// shared drive always gets shared visibility; an explicit drive id wins
/// over the detected one.
pub fn scope_for(shared_drive: bool, override_id: Option<&str>, folder: &ValidatedFolder) -> DriveScope {
    let drive_id = override_id
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .or_else(|| folder.drive_id.clone());
    if shared_drive || drive_id.is_some() {
        DriveScope::shared(drive_id)
    } else {
        DriveScope::my_drive()
    }
}

fn base_scope(shared_drive: bool) -> DriveScope {
    if shared_drive {
        DriveScope::shared(None)
    } else {
        DriveScope::my_drive()
    }
}

/// Validate both endpoints, read the source tree, and recreate it.
pub async fn replicate(
    client: &dyn DriveClient,
    progress: &dyn ProgressSink,
    request: ReplicationRequest,
) -> Result<ReplicationReport, ReplicaError> {
    if request.source.is_empty() {
        return Err(ValidationError::MissingInput("source folder id").into());
    }
    if request.destination.is_empty() {
        return Err(ValidationError::MissingInput("destination folder id").into());
    }
    if let Some(found) = request.prior.as_ref().and_then(FolderIdMap::root_id) {
        if found != &request.destination {
            return Err(ValidationError::ResumeMismatch {
                expected: request.destination.clone(),
                found: found.clone(),
            }
            .into());
        }
    }

    let run_id = new_run_id();
    let base = base_scope(request.shared_drive);
    let source = validate_folder(client, &base, &request.source).await?;
    let destination = validate_folder(client, &base, &request.destination).await?;

    let source_scope = scope_for(
        request.shared_drive,
        request.source_drive_id.as_deref(),
        &source,
    );
    let destination_scope = scope_for(
        request.shared_drive,
        request.destination_drive_id.as_deref(),
        &destination,
    );

    info!(
        run_id = %run_id,
        source = %source.id,
        destination = %destination.id,
        source_scope = ?source_scope,
        destination_scope = ?destination_scope,
        "Starting replication"
    );
    progress.report(&ProgressEvent::RunStarted {
        run_id: run_id.clone(),
        source: source.id.clone(),
        destination: destination.id.clone(),
    });

    let read_session =
        ReplicationSession::new(client, source_scope, progress).with_debug(request.debug);
    let read = TreeReader::new(&read_session).read(&source.id).await?;

    // Reuse whichever parameter generation the reader had to settle on.
    let write_session =
        read_session.rescoped(destination_scope.with_generation(read.generation));
    let written = TreeWriter::new(&write_session)
        .write(&read.structure, &read.root_name, &destination.id, request.prior)
        .await;

    info!(
        run_id = %run_id,
        created = written.created.len(),
        read_failures = read.failures.len(),
        write_failures = written.failures.len(),
        "Replication finished"
    );

    Ok(ReplicationReport {
        run_id,
        source,
        destination,
        root_name: read.root_name,
        generation: written.generation,
        structure: read.structure,
        id_map: written.id_map,
        created: written.created,
        skipped: written.skipped,
        read_failures: read.failures,
        write_failures: written.failures,
    })
}

/// Read a folder tree without writing anything.
pub async fn inspect(
    client: &dyn DriveClient,
    progress: &dyn ProgressSink,
    folder: &FolderId,
    shared_drive: bool,
    drive_id: Option<&str>,
) -> Result<(ValidatedFolder, ReadOutcome), ReplicaError> {
    let validated = validate_folder(client, &base_scope(shared_drive), folder).await?;
    let scope = scope_for(shared_drive, drive_id, &validated);
    let session = ReplicationSession::new(client, scope, progress);
    let outcome = TreeReader::new(&session).read(&validated.id).await?;
    Ok((validated, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::MemoryDrive;
    use crate::error::AuthError;
    use crate::progress::CollectingSink;

    #[test]
    fn test_scope_for_prefers_override() {
        let folder = ValidatedFolder {
            id: FolderId::new("f"),
            name: "F".to_string(),
            drive_id: Some("detected".to_string()),
        };
        let scope = scope_for(true, Some("override"), &folder);
        assert_eq!(scope.drive_id.as_deref(), Some("override"));
        let scope = scope_for(false, None, &folder);
        assert!(scope.shared);
        assert_eq!(scope.drive_id.as_deref(), Some("detected"));
    }

    #[test]
    fn test_scope_for_my_drive() {
        let folder = ValidatedFolder {
            id: FolderId::new("f"),
            name: "F".to_string(),
            drive_id: None,
        };
        assert_eq!(scope_for(false, Some(""), &folder), DriveScope::my_drive());
    }

    #[tokio::test]
    async fn test_missing_destination_is_rejected_before_any_call() {
        let drive = MemoryDrive::new();
        let source = drive.add_folder(None, "A");
        let sink = CollectingSink::new();
        let request = ReplicationRequest {
            source,
            ..Default::default()
        };
        let err = replicate(&drive, &sink, request).await.unwrap_err();
        assert!(matches!(
            err,
            ReplicaError::Validation(ValidationError::MissingInput(_))
        ));
        assert!(drive.calls().is_empty());
    }

    #[tokio::test]
    async fn test_report_counts() {
        let drive = MemoryDrive::new();
        let source = drive.add_folder(None, "A");
        drive.add_folder(Some(&source), "B");
        let dest = drive.add_folder(None, "Dest");
        let sink = CollectingSink::new();

        let report = replicate(
            &drive,
            &sink,
            ReplicationRequest {
                source,
                destination: dest.clone(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(report.is_complete());
        assert_eq!(report.root_name, "A");
        assert_eq!(report.destination.name, "Dest");
        assert_eq!(report.created.len(), 1);
        assert_eq!(drive.child_names(&dest), vec!["B"]);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["id_map"][""], dest.as_str());
        assert_eq!(json["created"][0], "A/B");
    }

    #[test]
    fn test_auth_error_is_distinct() {
        let err: ReplicaError = AuthError::Rejected("expired".to_string()).into();
        assert!(err.to_string().starts_with("Authentication failed"));
    }
}
