//! Destination folder ids keyed by relative path

use crate::error::ReplicaError;
use crate::tree::path::RelativePath;
use crate::types::FolderId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Mapping from a relative path to the destination folder created for it.
///
/// Grows monotonically: once a path is mapped it is never remapped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderIdMap {
    entries: BTreeMap<RelativePath, FolderId>,
}

impl FolderIdMap {
    /// Map with the empty path already pointing at `destination_root`.
    pub fn seeded(destination_root: FolderId) -> Self {
        let mut map = Self::default();
        map.entries.insert(RelativePath::root(), destination_root);
        map
    }

    /// Insert unless the path is already mapped. Returns whether the map changed.
    pub fn insert_if_absent(&mut self, path: RelativePath, id: FolderId) -> bool {
        if self.entries.contains_key(&path) {
            return false;
        }
        self.entries.insert(path, id);
        true
    }

    pub fn get(&self, path: &RelativePath) -> Option<&FolderId> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &RelativePath) -> bool {
        self.entries.contains_key(path)
    }

    pub fn root_id(&self) -> Option<&FolderId> {
        self.entries.get(&RelativePath::root())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RelativePath, &FolderId)> {
        self.entries.iter()
    }

    pub fn load(path: &Path) -> Result<Self, ReplicaError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ReplicaError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
