//! In-memory drive backend
//!
//! Holds a folder tree in process memory and records every call made
//! against it. Failures can be injected per folder or per name so partial
//! replication paths can be exercised without a network.

use crate::drive::{
    ApiGeneration, ChildFolder, DriveClient, DriveScope, FolderMetadata, SharedDrive,
};
use crate::error::DriveError;
use crate::types::{FolderId, FOLDER_MIME_TYPE};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

/// A call observed by [`MemoryDrive`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriveCall {
    GetMetadata {
        id: FolderId,
        generation: ApiGeneration,
    },
    ListChildren {
        parent: FolderId,
        generation: ApiGeneration,
    },
    CreateFolder {
        parent: FolderId,
        name: String,
        generation: ApiGeneration,
    },
    ListDrives,
}

#[derive(Debug, Clone)]
struct Item {
    name: String,
    mime_type: String,
    parent: Option<FolderId>,
    drive_id: Option<String>,
    trashed: bool,
}

#[derive(Default)]
struct State {
    items: HashMap<FolderId, Item>,
    // Insertion order, so listings are stable.
    order: Vec<FolderId>,
    drives: Vec<SharedDrive>,
    next_id: u64,
    calls: Vec<DriveCall>,
    fail_create_names: HashSet<String>,
    fail_metadata: HashSet<FolderId>,
    fail_listing: HashSet<FolderId>,
    legacy_only: bool,
}

impl State {
    fn allocate(&mut self, prefix: &str) -> FolderId {
        self.next_id += 1;
        FolderId::new(format!("{}-{}", prefix, self.next_id))
    }

    fn insert(&mut self, id: FolderId, item: Item) {
        self.order.push(id.clone());
        self.items.insert(id, item);
    }

    /// Look up an item the scope is allowed to see.
    fn visible(&self, id: &FolderId, scope: &DriveScope) -> Result<&Item, DriveError> {
        let item = self
            .items
            .get(id)
            .ok_or_else(|| DriveError::NotFound(format!("File not found: {}", id)))?;
        if item.drive_id.is_some() && !scope.shared {
            return Err(DriveError::NotFound(format!("File not found: {}", id)));
        }
        Ok(item)
    }

    fn check_generation(&self, scope: &DriveScope) -> Result<(), DriveError> {
        if self.legacy_only && scope.shared && scope.generation == ApiGeneration::Current {
            return Err(DriveError::UnsupportedParameter(
                ApiGeneration::Current.supports_param().to_string(),
            ));
        }
        Ok(())
    }
}

/// Drive backend backed by a map in memory
#[derive(Default)]
pub struct MemoryDrive {
    state: Mutex<State>,
}

impl MemoryDrive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a folder. `parent` of `None` makes a top-level folder.
    pub fn add_folder(&self, parent: Option<&FolderId>, name: &str) -> FolderId {
        self.add_item(parent, name, FOLDER_MIME_TYPE)
    }

    /// Add a non-folder item such as a document.
    pub fn add_file(&self, parent: Option<&FolderId>, name: &str, mime_type: &str) -> FolderId {
        self.add_item(parent, name, mime_type)
    }

    fn add_item(&self, parent: Option<&FolderId>, name: &str, mime_type: &str) -> FolderId {
        let mut state = self.state.lock();
        let drive_id = parent
            .and_then(|p| state.items.get(p))
            .and_then(|p| p.drive_id.clone());
        let id = state.allocate("mem");
        state.insert(
            id.clone(),
            Item {
                name: name.to_string(),
                mime_type: mime_type.to_string(),
                parent: parent.cloned(),
                drive_id,
                trashed: false,
            },
        );
        id
    }

    /// Create a shared drive and return its drive id and root folder id.
    pub fn add_shared_drive(&self, name: &str) -> (String, FolderId) {
        let mut state = self.state.lock();
        let drive_id = state.allocate("drive").to_string();
        state.drives.push(SharedDrive {
            id: drive_id.clone(),
            name: name.to_string(),
        });
        let root = state.allocate("mem");
        state.insert(
            root.clone(),
            Item {
                name: name.to_string(),
                mime_type: FOLDER_MIME_TYPE.to_string(),
                parent: None,
                drive_id: Some(drive_id.clone()),
                trashed: false,
            },
        );
        (drive_id, root)
    }

    pub fn trash(&self, id: &FolderId) {
        if let Some(item) = self.state.lock().items.get_mut(id) {
            item.trashed = true;
        }
    }

    /// Make every `create_folder` call for `name` fail.
    pub fn fail_create_named(&self, name: &str) {
        self.state.lock().fail_create_names.insert(name.to_string());
    }

    pub fn fail_metadata(&self, id: &FolderId) {
        self.state.lock().fail_metadata.insert(id.clone());
    }

    pub fn fail_listing(&self, id: &FolderId) {
        self.state.lock().fail_listing.insert(id.clone());
    }

    /// Reject current-generation shared-drive parameters, as older API deployments do.
    pub fn legacy_only(&self) {
        self.state.lock().legacy_only = true;
    }

    pub fn calls(&self) -> Vec<DriveCall> {
        self.state.lock().calls.clone()
    }

    /// `(parent, name)` of every successful creation, in order
    pub fn created(&self) -> Vec<(FolderId, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DriveCall::CreateFolder { parent, name, .. } => Some((parent, name)),
                _ => None,
            })
            .collect()
    }

    /// Names of non-trashed child folders, in insertion order
    pub fn child_names(&self, parent: &FolderId) -> Vec<String> {
        let state = self.state.lock();
        state
            .order
            .iter()
            .filter_map(|id| state.items.get(id))
            .filter(|item| {
                item.parent.as_ref() == Some(parent)
                    && !item.trashed
                    && item.mime_type == FOLDER_MIME_TYPE
            })
            .map(|item| item.name.clone())
            .collect()
    }

    /// Resolve a chain of folder names below `root`.
    pub fn find_path(&self, root: &FolderId, names: &[&str]) -> Option<FolderId> {
        let state = self.state.lock();
        let mut current = root.clone();
        for name in names {
            current = state
                .order
                .iter()
                .find(|id| {
                    state.items.get(*id).is_some_and(|item| {
                        item.parent.as_ref() == Some(&current) && item.name == *name
                    })
                })?
                .clone();
        }
        Some(current)
    }

    pub fn item_count(&self) -> usize {
        self.state.lock().items.len()
    }
}

#[async_trait]
impl DriveClient for MemoryDrive {
    async fn get_metadata(
        &self,
        id: &FolderId,
        scope: &DriveScope,
    ) -> Result<FolderMetadata, DriveError> {
        let mut state = self.state.lock();
        state.calls.push(DriveCall::GetMetadata {
            id: id.clone(),
            generation: scope.generation,
        });
        state.check_generation(scope)?;
        if state.fail_metadata.contains(id) {
            return Err(DriveError::Request {
                status: 500,
                message: format!("Injected metadata failure for {}", id),
            });
        }
        let item = state.visible(id, scope)?;
        Ok(FolderMetadata {
            id: id.clone(),
            name: item.name.clone(),
            mime_type: item.mime_type.clone(),
            drive_id: item.drive_id.clone(),
            trashed: item.trashed,
        })
    }

    async fn list_child_folders(
        &self,
        parent: &FolderId,
        scope: &DriveScope,
    ) -> Result<Vec<ChildFolder>, DriveError> {
        let mut state = self.state.lock();
        state.calls.push(DriveCall::ListChildren {
            parent: parent.clone(),
            generation: scope.generation,
        });
        state.check_generation(scope)?;
        if state.fail_listing.contains(parent) {
            return Err(DriveError::Request {
                status: 500,
                message: format!("Injected listing failure for {}", parent),
            });
        }
        state.visible(parent, scope)?;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.items.get(id).map(|item| (id, item)))
            .filter(|(_, item)| {
                item.parent.as_ref() == Some(parent)
                    && !item.trashed
                    && item.mime_type == FOLDER_MIME_TYPE
            })
            .filter(|(_, item)| match scope.drive_id.as_deref() {
                Some(drive_id) => item.drive_id.as_deref() == Some(drive_id),
                None => true,
            })
            .map(|(id, item)| ChildFolder {
                id: id.clone(),
                name: item.name.clone(),
            })
            .collect())
    }

    async fn create_folder(
        &self,
        name: &str,
        parent: &FolderId,
        scope: &DriveScope,
    ) -> Result<FolderId, DriveError> {
        let mut state = self.state.lock();
        state.check_generation(scope)?;
        if state.fail_create_names.contains(name) {
            return Err(DriveError::Request {
                status: 500,
                message: format!("Injected create failure for {}", name),
            });
        }
        let drive_id = {
            let parent_item = state.visible(parent, scope)?;
            if parent_item.mime_type != FOLDER_MIME_TYPE {
                return Err(DriveError::Request {
                    status: 400,
                    message: format!("Parent {} is not a folder", parent),
                });
            }
            parent_item.drive_id.clone()
        };
        state.calls.push(DriveCall::CreateFolder {
            parent: parent.clone(),
            name: name.to_string(),
            generation: scope.generation,
        });
        let id = state.allocate("mem");
        state.insert(
            id.clone(),
            Item {
                name: name.to_string(),
                mime_type: FOLDER_MIME_TYPE.to_string(),
                parent: Some(parent.clone()),
                drive_id,
                trashed: false,
            },
        );
        Ok(id)
    }

    async fn list_shared_drives(&self) -> Result<Vec<SharedDrive>, DriveError> {
        let mut state = self.state.lock();
        state.calls.push(DriveCall::ListDrives);
        Ok(state.drives.clone())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
