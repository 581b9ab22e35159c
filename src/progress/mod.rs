//! Progress reporting for replication runs.

pub mod event;
pub mod session;
pub mod sink;

pub use event::{ProgressEvent, Severity};
pub use session::{new_run_id, now_millis};
pub use sink::{CollectingSink, ConsoleSink, FanoutSink, ProgressSink, TracingSink};
