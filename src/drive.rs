//! Drive Backend Abstraction
//!
//! The replication core talks to remote storage through two capabilities:
//! folder metadata/listing and folder creation. [`DriveClient`] bundles both
//! (plus shared-drive discovery) so the reader and writer stay agnostic of
//! whether they run against the Google Drive HTTP API, an in-memory tree, or
//! a dry-run wrapper.

use crate::error::DriveError;
use crate::types::{FolderId, FOLDER_MIME_TYPE};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::debug;

pub mod dry_run;
pub mod http;
pub mod memory;
pub mod scope;

pub use dry_run::DryRunDrive;
pub use http::GoogleDriveClient;
pub use memory::{DriveCall, MemoryDrive};
pub use scope::{ApiGeneration, DriveScope};

/// Metadata for a single remote item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderMetadata {
    pub id: FolderId,
    pub name: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(rename = "driveId", alias = "teamDriveId", default)]
    pub drive_id: Option<String>,
    #[serde(default)]
    pub trashed: bool,
}

impl FolderMetadata {
    pub fn is_folder(&self) -> bool {
        self.mime_type == FOLDER_MIME_TYPE
    }
}

/// An immediate child folder returned by a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildFolder {
    pub id: FolderId,
    pub name: String,
}

/// A shared drive visible to the authenticated account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedDrive {
    pub id: String,
    pub name: String,
}

/// Remote folder metadata, listing and creation
#[async_trait]
pub trait DriveClient: Send + Sync {
    /// Fetch name, type and drive membership for one item
    async fn get_metadata(
        &self,
        id: &FolderId,
        scope: &DriveScope,
    ) -> Result<FolderMetadata, DriveError>;

    /// List immediate child folders of `parent`, excluding trashed items
    async fn list_child_folders(
        &self,
        parent: &FolderId,
        scope: &DriveScope,
    ) -> Result<Vec<ChildFolder>, DriveError>;

    /// Create a folder named `name` under `parent` and return its id
    async fn create_folder(
        &self,
        name: &str,
        parent: &FolderId,
        scope: &DriveScope,
    ) -> Result<FolderId, DriveError>;

    /// List shared drives the account can see
    async fn list_shared_drives(&self) -> Result<Vec<SharedDrive>, DriveError>;

    /// Short backend name for logs
    fn backend_name(&self) -> &str;
}

/// Run `call` with `scope`, retrying once with the legacy API generation if
/// the current generation's parameters are rejected.
///
/// Returns the value together with the generation that produced it. Errors
/// other than [`DriveError::UnsupportedParameter`] are never retried.
pub async fn with_generation_fallback<T, F, Fut>(
    scope: &DriveScope,
    call: F,
) -> Result<(T, ApiGeneration), DriveError>
where
    F: Fn(DriveScope) -> Fut,
    Fut: Future<Output = Result<T, DriveError>>,
{
    match call(scope.clone()).await {
        Ok(value) => Ok((value, scope.generation)),
        Err(DriveError::UnsupportedParameter(param)) => match scope.generation.fallback() {
            Some(legacy) => {
                debug!(
                    param = %param,
                    from = ?scope.generation,
                    to = ?legacy,
                    "Parameter rejected, retrying with legacy API generation"
                );
                let value = call(scope.with_generation(legacy)).await?;
                Ok((value, legacy))
            }
            None => Err(DriveError::UnsupportedParameter(param)),
        },
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_fallback_retries_once_on_unsupported_parameter() {
        let attempts = AtomicUsize::new(0);
        let scope = DriveScope::shared(None);
        let (value, generation) = with_generation_fallback(&scope, |scope| {
            attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                match scope.generation {
                    ApiGeneration::Current => Err(DriveError::UnsupportedParameter(
                        "supportsAllDrives".to_string(),
                    )),
                    ApiGeneration::Legacy => Ok(7),
                }
            }
        })
        .await
        .unwrap();
        assert_eq!(value, 7);
        assert_eq!(generation, ApiGeneration::Legacy);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fallback_does_not_retry_other_errors() {
        let attempts = AtomicUsize::new(0);
        let scope = DriveScope::shared(None);
        let result: Result<(u8, ApiGeneration), DriveError> =
            with_generation_fallback(&scope, |_| {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(DriveError::NotFound("x".to_string())) }
            })
            .await;
        assert!(matches!(result, Err(DriveError::NotFound(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_legacy_rejection_propagates() {
        let scope = DriveScope::shared(None).with_generation(ApiGeneration::Legacy);
        let result: Result<(u8, ApiGeneration), DriveError> =
            with_generation_fallback(&scope, |_| async {
                Err(DriveError::UnsupportedParameter("supportsTeamDrives".to_string()))
            })
            .await;
        assert!(matches!(result, Err(DriveError::UnsupportedParameter(_))));
    }

    #[test]
    fn test_metadata_accepts_legacy_drive_field() {
        let raw = r#"{"id":"f1","name":"Docs","mimeType":"application/vnd.google-apps.folder","teamDriveId":"td1"}"#;
        let meta: FolderMetadata = serde_json::from_str(raw).unwrap();
        assert_eq!(meta.drive_id.as_deref(), Some("td1"));
        assert!(meta.is_folder());
        assert!(!meta.trashed);
    }
}
