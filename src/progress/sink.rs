//! Progress sinks: where replication status lines go.

use crate::progress::event::{ProgressEvent, Severity};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

/// Receives every progress event of a run
pub trait ProgressSink: Send + Sync {
    fn report(&self, event: &ProgressEvent);
}

/// Mirrors events into the structured log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn report(&self, event: &ProgressEvent) {
        let event_type = event.event_type();
        match event.severity() {
            Severity::Debug => debug!(event_type, "{}", event),
            Severity::Info => info!(event_type, "{}", event),
            Severity::Warning => warn!(event_type, "{}", event),
            Severity::Error => error!(event_type, "{}", event),
        }
    }
}

/// Prints status lines to stderr
#[derive(Debug, Clone, Copy)]
pub struct ConsoleSink {
    pub show_debug: bool,
    pub color: bool,
}

impl ConsoleSink {
    pub fn new(show_debug: bool, color: bool) -> Self {
        Self { show_debug, color }
    }

    fn render(&self, event: &ProgressEvent) -> String {
        let line = event.to_string();
        if !self.color {
            return line;
        }
        match event.severity() {
            Severity::Debug => line.dimmed().to_string(),
            Severity::Info => match event {
                ProgressEvent::Created { .. } => line.green().to_string(),
                _ => line,
            },
            Severity::Warning => line.yellow().to_string(),
            Severity::Error => line.red().to_string(),
        }
    }
}

impl ProgressSink for ConsoleSink {
    fn report(&self, event: &ProgressEvent) {
        if event.severity() == Severity::Debug && !self.show_debug {
            return;
        }
        eprintln!("{}", self.render(event));
    }
}

/// Keeps events in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().clone()
    }

    /// Rendered status lines, in order
    pub fn messages(&self) -> Vec<String> {
        self.events.lock().iter().map(ToString::to_string).collect()
    }
}

impl ProgressSink for CollectingSink {
    fn report(&self, event: &ProgressEvent) {
        self.events.lock().push(event.clone());
    }
}

/// Forwards each event to several sinks
#[derive(Default)]
pub struct FanoutSink<'a> {
    sinks: Vec<&'a dyn ProgressSink>,
}

impl<'a> FanoutSink<'a> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with(mut self, sink: &'a dyn ProgressSink) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl ProgressSink for FanoutSink<'_> {
    fn report(&self, event: &ProgressEvent) {
        for sink in &self.sinks {
            sink.report(event);
        }
    }
}
