//! Tree reader: flattens a remote folder tree into a path-keyed structure

use crate::drive::{with_generation_fallback, ApiGeneration, ChildFolder, FolderMetadata};
use crate::error::{AuthError, DriveError, ReplicaError, ValidationError};
use crate::progress::ProgressEvent;
use crate::replicate::session::ReplicationSession;
use crate::replicate::serialize_display;
use crate::tree::{RelativePath, Structure};
use crate::types::FolderId;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Which of the two per-node calls failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadStage {
    Metadata,
    Listing,
}

impl ReadStage {
    pub fn label(self) -> &'static str {
        match self {
            ReadStage::Metadata => "metadata",
            ReadStage::Listing => "children",
        }
    }
}

/// A node whose subtree was skipped
#[derive(Debug, Clone, Serialize)]
pub struct ReadFailure {
    pub id: FolderId,
    /// Path the node would have been recorded under
    pub parent: RelativePath,
    pub stage: ReadStage,
    #[serde(serialize_with = "serialize_display")]
    pub error: DriveError,
}

/// Result of reading a source tree
#[derive(Debug, Clone)]
pub struct ReadOutcome {
    pub structure: Structure,
    pub root_name: String,
    /// API generation the reader settled on
    pub generation: ApiGeneration,
    pub failures: Vec<ReadFailure>,
}

/// Depth-first reader over an explicit work stack
pub struct TreeReader<'s> {
    session: &'s ReplicationSession<'s>,
    generation: ApiGeneration,
}

impl<'s> TreeReader<'s> {
    pub fn new(session: &'s ReplicationSession<'s>) -> Self {
        Self {
            session,
            generation: session.scope.generation,
        }
    }

    /// Read every folder below `root`.
    ///
    /// Per-node failures skip that node's subtree and are returned in
    /// [`ReadOutcome::failures`]. Only a failure on the root itself aborts.
    pub async fn read(mut self, root: &FolderId) -> Result<ReadOutcome, ReplicaError> {
        let mut structure = Structure::new();
        let mut failures = Vec::new();
        let mut root_name: Option<String> = None;
        let mut stack: Vec<(FolderId, RelativePath)> = vec![(root.clone(), RelativePath::root())];

        info!(root = %root, backend = self.session.client.backend_name(), "Reading source tree");

        while let Some((id, parent)) = stack.pop() {
            let metadata = match self.metadata(&id).await {
                Ok(metadata) => metadata,
                Err(error) if root_name.is_none() => {
                    return Err(match error {
                        DriveError::Unauthorized(message) => AuthError::Rejected(message).into(),
                        error => ValidationError::Inaccessible { id, source: error }.into(),
                    });
                }
                Err(error) => {
                    self.fail(&mut failures, id, parent, ReadStage::Metadata, error);
                    continue;
                }
            };

            if root_name.is_none() {
                root_name = Some(metadata.name.clone());
            }
            let current = parent.join(&metadata.name);
            structure.record(&parent, metadata.name);
            self.session.report(ProgressEvent::Reading {
                path: current.clone(),
                id: id.clone(),
            });

            let children = match self.children(&id).await {
                Ok(children) => children,
                Err(error) => {
                    self.fail(&mut failures, id, parent, ReadStage::Listing, error);
                    continue;
                }
            };
            debug!(path = %current, children = children.len(), "Listed folder");

            // Reverse so the first listed child is visited first.
            for child in children.into_iter().rev() {
                stack.push((child.id, current.clone()));
            }
        }

        let root_name = root_name.unwrap_or_default();
        self.session.report(ProgressEvent::ReadFinished {
            folders: structure.folder_count(),
            failures: failures.len(),
        });
        info!(
            folders = structure.folder_count(),
            failures = failures.len(),
            generation = ?self.generation,
            "Source tree read"
        );

        Ok(ReadOutcome {
            structure,
            root_name,
            generation: self.generation,
            failures,
        })
    }

    fn fail(
        &self,
        failures: &mut Vec<ReadFailure>,
        id: FolderId,
        parent: RelativePath,
        stage: ReadStage,
        error: DriveError,
    ) {
        warn!(folder_id = %id, parent = %parent, stage = stage.label(), error = %error, "Skipping subtree");
        self.session.report(ProgressEvent::ReadFailed {
            id: id.clone(),
            parent: parent.clone(),
            stage: stage.label().to_string(),
            error: error.to_string(),
        });
        failures.push(ReadFailure {
            id,
            parent,
            stage,
            error,
        });
    }

    async fn metadata(&mut self, id: &FolderId) -> Result<FolderMetadata, DriveError> {
        let client = self.session.client;
        let scope = self.session.scope.with_generation(self.generation);
        let (metadata, generation) = with_generation_fallback(&scope, move |scope| async move {
            client.get_metadata(id, &scope).await
        })
        .await?;
        self.settle(generation, "get_metadata");
        Ok(metadata)
    }

    async fn children(&mut self, id: &FolderId) -> Result<Vec<ChildFolder>, DriveError> {
        let client = self.session.client;
        let scope = self.session.scope.with_generation(self.generation);
        let (children, generation) = with_generation_fallback(&scope, move |scope| async move {
            client.list_child_folders(id, &scope).await
        })
        .await?;
        self.settle(generation, "list_child_folders");
        Ok(children)
    }

    /// Stick with whichever generation last succeeded.
    fn settle(&mut self, generation: ApiGeneration, operation: &str) {
        if generation != self.generation {
            self.generation = generation;
            self.session.report(ProgressEvent::GenerationFallback {
                operation: operation.to_string(),
                generation,
            });
        }
    }
}
