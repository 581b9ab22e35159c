//! Integration tests for folder hierarchy replication

mod cli_commands;
mod partial_failure;
mod replication;
mod resume;
mod shared_drive;
mod support;
