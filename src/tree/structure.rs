//! Path-keyed folder structure produced by the tree reader

use crate::tree::path::RelativePath;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One folder to recreate: its parent path, its own name, and its full path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    pub parent: RelativePath,
    pub name: String,
    pub full: RelativePath,
}

/// Mapping from a relative path to the folder names found directly under it.
///
/// A folder without subfolders appears only as a child name, never as a key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Structure {
    entries: BTreeMap<RelativePath, Vec<String>>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `name` to the children recorded under `parent`.
    pub fn record(&mut self, parent: &RelativePath, name: impl Into<String>) {
        self.entries
            .entry(parent.clone())
            .or_default()
            .push(name.into());
    }

    /// Children recorded directly under `path` (empty if none)
    pub fn children(&self, path: &RelativePath) -> &[String] {
        self.entries.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_key(&self, path: &RelativePath) -> bool {
        self.entries.contains_key(path)
    }

    pub fn keys(&self) -> impl Iterator<Item = &RelativePath> {
        self.entries.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of recorded folders, the root included.
    pub fn folder_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Every recorded folder with its full path, in key order then child order.
    pub fn full_paths(&self) -> Vec<PathEntry> {
        self.entries
            .iter()
            .flat_map(|(parent, names)| {
                names.iter().map(move |name| PathEntry {
                    parent: parent.clone(),
                    name: name.clone(),
                    full: parent.join(name),
                })
            })
            .collect()
    }

    /// Non-root keys that were never recorded as a child of their parent.
    ///
    /// Empty for any structure built by the reader.
    pub fn orphaned_keys(&self) -> Vec<RelativePath> {
        self.entries
            .keys()
            .filter(|key| match (key.parent(), key.name()) {
                (Some(parent), Some(name)) => {
                    !self.children(&parent).iter().any(|child| child == name)
                }
                _ => false,
            })
            .cloned()
            .collect()
    }

    /// Draw the structure as an indented tree, children in recorded order.
    pub fn render_tree(&self) -> String {
        // (path, prefix for this line, is last sibling, is top level)
        let mut stack: Vec<(RelativePath, String, bool, bool)> = Vec::new();
        let root = RelativePath::root();
        for name in self.children(&root).iter().rev() {
            stack.push((root.join(name), String::new(), true, true));
        }

        let mut out = String::new();
        while let Some((path, prefix, is_last, top)) = stack.pop() {
            let name = path.name().unwrap_or_default();
            let child_prefix = if top {
                out.push_str(name);
                String::new()
            } else {
                out.push_str(&prefix);
                out.push_str(if is_last { "└── " } else { "├── " });
                out.push_str(name);
                format!("{}{}", prefix, if is_last { "    " } else { "│   " })
            };
            out.push('\n');

            let kids = self.children(&path);
            for (i, kid) in kids.iter().enumerate().rev() {
                stack.push((
                    path.join(kid),
                    child_prefix.clone(),
                    i + 1 == kids.len(),
                    false,
                ));
            }
        }
        out
    }
}
