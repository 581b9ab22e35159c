//! Folder trees as path-keyed maps
//!
//! The reader flattens a remote folder tree into a [`Structure`]; the writer
//! turns it back into folders and records where each one landed in a
//! [`FolderIdMap`].

pub mod id_map;
pub mod path;
pub mod structure;

pub use id_map::FolderIdMap;
pub use path::RelativePath;
pub use structure::{PathEntry, Structure};
