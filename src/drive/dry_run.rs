//! Dry-run wrapper: real reads, simulated creates

use crate::drive::{ChildFolder, DriveClient, DriveScope, FolderMetadata, SharedDrive};
use crate::error::DriveError;
use crate::types::FolderId;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Wraps a backend so nothing is written remotely.
///
/// Reads pass through; `create_folder` returns a synthetic `dry-run-<n>` id.
pub struct DryRunDrive<'a> {
    inner: &'a dyn DriveClient,
    counter: AtomicU64,
}

impl<'a> DryRunDrive<'a> {
    pub fn new(inner: &'a dyn DriveClient) -> Self {
        Self {
            inner,
            counter: AtomicU64::new(0),
        }
    }

    /// Number of folders that would have been created
    pub fn planned(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<'a> DriveClient for DryRunDrive<'a> {
    async fn get_metadata(
        &self,
        id: &FolderId,
        scope: &DriveScope,
    ) -> Result<FolderMetadata, DriveError> {
        self.inner.get_metadata(id, scope).await
    }

    async fn list_child_folders(
        &self,
        parent: &FolderId,
        scope: &DriveScope,
    ) -> Result<Vec<ChildFolder>, DriveError> {
        self.inner.list_child_folders(parent, scope).await
    }

    async fn create_folder(
        &self,
        name: &str,
        parent: &FolderId,
        _scope: &DriveScope,
    ) -> Result<FolderId, DriveError> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(name, parent = %parent, "Dry run: skipping folder creation");
        Ok(FolderId::new(format!("dry-run-{}", n)))
    }

    async fn list_shared_drives(&self) -> Result<Vec<SharedDrive>, DriveError> {
        self.inner.list_shared_drives().await
    }

    fn backend_name(&self) -> &str {
        "dry-run"
    }
}
