//! treeclone: Folder Hierarchy Replication
//!
//! Reads the folder tree under a source folder of a cloud drive and recreates
//! the same hierarchy, without files, under a destination folder. Works with
//! personal and shared drives, falling back to the legacy parameter set when
//! the current one is rejected.

pub mod auth;
pub mod cli;
pub mod config;
pub mod drive;
pub mod error;
pub mod logging;
pub mod progress;
pub mod replicate;
pub mod tree;
pub mod types;
