//! Tree writer: recreates a structure under a destination folder

use crate::drive::{with_generation_fallback, ApiGeneration};
use crate::error::DriveError;
use crate::progress::ProgressEvent;
use crate::replicate::serialize_display;
use crate::replicate::session::ReplicationSession;
use crate::tree::{FolderIdMap, PathEntry, RelativePath, Structure};
use crate::types::FolderId;
use serde::Serialize;
use tracing::{debug, info, warn};

/// A path the writer could not create
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WriteFailure {
    /// The parent had no destination id when the path came up
    MissingParent {
        path: RelativePath,
        parent: RelativePath,
    },
    CreateFailed {
        path: RelativePath,
        parent_id: FolderId,
        #[serde(serialize_with = "serialize_display")]
        error: DriveError,
    },
}

impl WriteFailure {
    pub fn path(&self) -> &RelativePath {
        match self {
            WriteFailure::MissingParent { path, .. } | WriteFailure::CreateFailed { path, .. } => {
                path
            }
        }
    }
}

/// Result of a writer pass
#[derive(Debug, Clone)]
pub struct WriteOutcome {
    pub id_map: FolderIdMap,
    /// Paths created, in creation order
    pub created: Vec<RelativePath>,
    /// Paths that were already mapped (root alias, resumed, duplicate names)
    pub skipped: Vec<RelativePath>,
    pub failures: Vec<WriteFailure>,
    /// API generation creation settled on
    pub generation: ApiGeneration,
}

/// Every recorded path, stable-sorted by depth so parents precede children.
///
/// A path of depth `d` is only ever recorded as a child of a path of depth
/// `d - 1`, so a single global sort is a valid creation order.
pub fn creation_order(structure: &Structure) -> Vec<PathEntry> {
    let mut entries = structure.full_paths();
    entries.sort_by_key(|entry| entry.full.depth());
    entries
}

pub struct TreeWriter<'s> {
    session: &'s ReplicationSession<'s>,
    generation: ApiGeneration,
}

impl<'s> TreeWriter<'s> {
    pub fn new(session: &'s ReplicationSession<'s>) -> Self {
        Self {
            session,
            generation: session.scope.generation,
        }
    }

    /// Create every folder in `structure` below `destination_root`.
    ///
    /// `prior` resumes from an earlier run's id map: paths it already holds
    /// are skipped. Failures never stop the pass.
    pub async fn write(
        mut self,
        structure: &Structure,
        root_name: &str,
        destination_root: &FolderId,
        prior: Option<FolderIdMap>,
    ) -> WriteOutcome {
        let mut id_map = match prior {
            Some(mut map) => {
                map.insert_if_absent(RelativePath::root(), destination_root.clone());
                map
            }
            None => FolderIdMap::seeded(destination_root.clone()),
        };

        let root = RelativePath::root();
        if structure.children(&root).iter().any(|name| name == root_name) {
            id_map.insert_if_absent(root.join(root_name), destination_root.clone());
        }

        let order = creation_order(structure);
        self.session.report(ProgressEvent::WritePlanned {
            paths: order.len(),
        });
        info!(
            paths = order.len(),
            destination = %destination_root,
            "Writing folder structure"
        );

        let mut created = Vec::new();
        let mut skipped = Vec::new();
        let mut failures = Vec::new();

        for PathEntry { parent, name, full } in order {
            if id_map.contains(&full) {
                self.session
                    .report_debug(|| ProgressEvent::AlreadyPresent { path: full.clone() });
                skipped.push(full);
                continue;
            }

            let parent_id = match id_map.get(&parent) {
                Some(id) => id.clone(),
                None => {
                    warn!(path = %full, parent = %parent, "Parent not created; skipping");
                    self.session.report(ProgressEvent::MissingParent {
                        path: full.clone(),
                        parent: parent.clone(),
                        known_paths: id_map.len(),
                    });
                    failures.push(WriteFailure::MissingParent { path: full, parent });
                    continue;
                }
            };
            self.session.report_debug(|| ProgressEvent::ParentResolved {
                path: full.clone(),
                parent: parent.clone(),
                parent_id: parent_id.clone(),
            });

            match self.create(&name, &parent_id).await {
                Ok(id) => {
                    debug!(path = %full, folder_id = %id, "Created folder");
                    self.session.report(ProgressEvent::Created {
                        path: full.clone(),
                        id: id.clone(),
                    });
                    id_map.insert_if_absent(full.clone(), id);
                    created.push(full);
                }
                Err(error) => {
                    warn!(path = %full, error = %error, "Failed to create folder");
                    self.session.report(ProgressEvent::CreateFailed {
                        path: full.clone(),
                        error: error.to_string(),
                    });
                    failures.push(WriteFailure::CreateFailed {
                        path: full,
                        parent_id,
                        error,
                    });
                }
            }
        }

        self.session.report(ProgressEvent::WriteFinished {
            created: created.len(),
            skipped: skipped.len(),
            failed: failures.len(),
        });

        WriteOutcome {
            id_map,
            created,
            skipped,
            failures,
            generation: self.generation,
        }
    }

    async fn create(&mut self, name: &str, parent: &FolderId) -> Result<FolderId, DriveError> {
        let client = self.session.client;
        let scope = self.session.scope.with_generation(self.generation);
        let (id, generation) = with_generation_fallback(&scope, move |scope| async move {
            client.create_folder(name, parent, &scope).await
        })
        .await?;
        if generation != self.generation {
            self.generation = generation;
            self.session.report(ProgressEvent::GenerationFallback {
                operation: "create_folder".to_string(),
                generation,
            });
        }
        Ok(id)
    }
}
