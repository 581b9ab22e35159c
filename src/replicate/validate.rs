//! Folder identifier validation ahead of a run

use crate::drive::{with_generation_fallback, DriveClient, DriveScope};
use crate::error::{AuthError, DriveError, ReplicaError, ValidationError};
use crate::types::FolderId;
use serde::Serialize;
use tracing::debug;

/// A folder confirmed to exist and be usable
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedFolder {
    pub id: FolderId,
    pub name: String,
    /// Shared drive the folder lives in, if any
    pub drive_id: Option<String>,
}

/// Check that `id` names an accessible, non-trashed folder.
pub async fn validate_folder(
    client: &dyn DriveClient,
    scope: &DriveScope,
    id: &FolderId,
) -> Result<ValidatedFolder, ReplicaError> {
    if id.is_empty() {
        return Err(ValidationError::MissingInput("folder id").into());
    }

    let metadata = match with_generation_fallback(scope, move |scope| async move {
        client.get_metadata(id, &scope).await
    })
    .await
    {
        Ok((metadata, _)) => metadata,
        Err(DriveError::Unauthorized(message)) => {
            return Err(AuthError::Rejected(message).into());
        }
        Err(source) => {
            return Err(ValidationError::Inaccessible {
                id: id.clone(),
                source,
            }
            .into());
        }
    };

    if !metadata.is_folder() {
        return Err(ValidationError::NotAFolder {
            id: id.clone(),
            mime_type: metadata.mime_type,
        }
        .into());
    }
    if metadata.trashed {
        return Err(ValidationError::Trashed(id.clone()).into());
    }

    debug!(folder_id = %id, name = %metadata.name, drive_id = ?metadata.drive_id, "Validated folder");
    Ok(ValidatedFolder {
        id: metadata.id,
        name: metadata.name,
        drive_id: metadata.drive_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::MemoryDrive;

    #[tokio::test]
    async fn test_valid_folder() {
        let drive = MemoryDrive::new();
        let id = drive.add_folder(None, "Projects");
        let folder = validate_folder(&drive, &DriveScope::my_drive(), &id)
            .await
            .unwrap();
        assert_eq!(folder.name, "Projects");
        assert_eq!(folder.drive_id, None);
    }

    #[tokio::test]
    async fn test_file_is_not_a_folder() {
        let drive = MemoryDrive::new();
        let id = drive.add_file(None, "report.pdf", "application/pdf");
        let err = validate_folder(&drive, &DriveScope::my_drive(), &id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ReplicaError::Validation(ValidationError::NotAFolder { ref mime_type, .. })
                if mime_type == "application/pdf"
        ));
    }

    #[tokio::test]
    async fn test_trashed_folder_rejected() {
        let drive = MemoryDrive::new();
        let id = drive.add_folder(None, "Old");
        drive.trash(&id);
        let err = validate_folder(&drive, &DriveScope::my_drive(), &id)
            .await
            .unwrap_err();
        assert!(matches!(err, ReplicaError::Validation(ValidationError::Trashed(_))));
    }

    #[tokio::test]
    async fn test_unknown_id_is_inaccessible() {
        let drive = MemoryDrive::new();
        let err = validate_folder(&drive, &DriveScope::my_drive(), &FolderId::new("nope"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ReplicaError::Validation(ValidationError::Inaccessible {
                source: DriveError::NotFound(_),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_empty_id_is_missing_input() {
        let drive = MemoryDrive::new();
        let err = validate_folder(&drive, &DriveScope::my_drive(), &FolderId::new(""))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ReplicaError::Validation(ValidationError::MissingInput(_))
        ));
    }

    #[tokio::test]
    async fn test_shared_drive_id_reported() {
        let drive = MemoryDrive::new();
        let (drive_id, root) = drive.add_shared_drive("Team");
        let folder = validate_folder(&drive, &DriveScope::shared(None), &root)
            .await
            .unwrap();
        assert_eq!(folder.drive_id, Some(drive_id));
    }
}
