//! Per-request replication context

use crate::drive::{DriveClient, DriveScope};
use crate::progress::{ProgressEvent, ProgressSink};

/// Everything one reader or writer pass needs: the backend, the scope its
/// calls run under, and where progress goes. Built per request and passed
/// by reference; nothing in it outlives the run.
pub struct ReplicationSession<'a> {
    pub client: &'a dyn DriveClient,
    pub scope: DriveScope,
    pub progress: &'a dyn ProgressSink,
    /// Emit per-path diagnostic events
    pub debug: bool,
}

impl<'a> ReplicationSession<'a> {
    pub fn new(
        client: &'a dyn DriveClient,
        scope: DriveScope,
        progress: &'a dyn ProgressSink,
    ) -> Self {
        Self {
            client,
            scope,
            progress,
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Same backend and sink under a different scope
    pub fn rescoped(&self, scope: DriveScope) -> Self {
        Self {
            client: self.client,
            scope,
            progress: self.progress,
            debug: self.debug,
        }
    }

    pub fn report(&self, event: ProgressEvent) {
        self.progress.report(&event);
    }

    /// Report a diagnostic event only when debugging is on.
    pub fn report_debug(&self, event: impl FnOnce() -> ProgressEvent) {
        if self.debug {
            self.progress.report(&event());
        }
    }
}
