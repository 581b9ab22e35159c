//! Event schema for replication progress.

use crate::drive::ApiGeneration;
use crate::tree::RelativePath;
use crate::types::FolderId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How loudly an event should be surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

/// A human-readable step of a replication run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    RunStarted {
        run_id: String,
        source: FolderId,
        destination: FolderId,
    },
    Reading {
        path: RelativePath,
        id: FolderId,
    },
    ReadFailed {
        id: FolderId,
        parent: RelativePath,
        stage: String,
        error: String,
    },
    GenerationFallback {
        operation: String,
        generation: ApiGeneration,
    },
    ReadFinished {
        folders: usize,
        failures: usize,
    },
    WritePlanned {
        paths: usize,
    },
    ParentResolved {
        path: RelativePath,
        parent: RelativePath,
        parent_id: FolderId,
    },
    AlreadyPresent {
        path: RelativePath,
    },
    Created {
        path: RelativePath,
        id: FolderId,
    },
    MissingParent {
        path: RelativePath,
        parent: RelativePath,
        known_paths: usize,
    },
    CreateFailed {
        path: RelativePath,
        error: String,
    },
    WriteFinished {
        created: usize,
        skipped: usize,
        failed: usize,
    },
}

impl ProgressEvent {
    pub fn severity(&self) -> Severity {
        match self {
            ProgressEvent::ParentResolved { .. } | ProgressEvent::AlreadyPresent { .. } => {
                Severity::Debug
            }
            ProgressEvent::GenerationFallback { .. } | ProgressEvent::MissingParent { .. } => {
                Severity::Warning
            }
            ProgressEvent::ReadFailed { .. } | ProgressEvent::CreateFailed { .. } => {
                Severity::Error
            }
            _ => Severity::Info,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            ProgressEvent::RunStarted { .. } => "run_started",
            ProgressEvent::Reading { .. } => "reading",
            ProgressEvent::ReadFailed { .. } => "read_failed",
            ProgressEvent::GenerationFallback { .. } => "generation_fallback",
            ProgressEvent::ReadFinished { .. } => "read_finished",
            ProgressEvent::WritePlanned { .. } => "write_planned",
            ProgressEvent::ParentResolved { .. } => "parent_resolved",
            ProgressEvent::AlreadyPresent { .. } => "already_present",
            ProgressEvent::Created { .. } => "created",
            ProgressEvent::MissingParent { .. } => "missing_parent",
            ProgressEvent::CreateFailed { .. } => "create_failed",
            ProgressEvent::WriteFinished { .. } => "write_finished",
        }
    }
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::RunStarted {
                source,
                destination,
                ..
            } => write!(f, "Replicating folders from {} into {}", source, destination),
            ProgressEvent::Reading { path, id } => write!(f, "Reading: {} (ID: {})", path, id),
            ProgressEvent::ReadFailed {
                id,
                parent,
                stage,
                error,
            } => write!(
                f,
                "Error reading {} of folder {} under '{}': {}",
                stage, id, parent, error
            ),
            ProgressEvent::GenerationFallback {
                operation,
                generation,
            } => write!(
                f,
                "{} rejected current shared-drive parameters; using {:?} parameters",
                operation, generation
            ),
            ProgressEvent::ReadFinished { folders, failures } => write!(
                f,
                "Read {} folder(s) with {} read error(s)",
                folders, failures
            ),
            ProgressEvent::WritePlanned { paths } => {
                write!(f, "Processing {} paths in order", paths)
            }
            ProgressEvent::ParentResolved {
                path,
                parent,
                parent_id,
            } => write!(
                f,
                "For path '{}', parent path is '{}' (ID: {})",
                path, parent, parent_id
            ),
            ProgressEvent::AlreadyPresent { path } => {
                write!(f, "Skipping '{}': already mapped", path)
            }
            ProgressEvent::Created { path, id } => write!(f, "Created: {} (ID: {})", path, id),
            ProgressEvent::MissingParent {
                path,
                parent,
                known_paths,
            } => write!(
                f,
                "Warning: Parent path '{}' of '{}' not found in folder map ({} known path(s))",
                parent, path, known_paths
            ),
            ProgressEvent::CreateFailed { path, error } => {
                write!(f, "Error creating folder '{}': {}", path, error)
            }
            ProgressEvent::WriteFinished {
                created,
                skipped,
                failed,
            } => write!(
                f,
                "Created {} folder(s), skipped {}, failed {}",
                created, skipped, failed
            ),
        }
    }
}
