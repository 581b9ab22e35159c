//! Property-based tests for ordering and replication guarantees

mod ordering;
mod replication;
