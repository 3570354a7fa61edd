//! Logging collaborator passed into the engine and the format resolver.
//!
//! Library code never writes to the global logger directly; it reports
//! through a [`ScanLog`] handed in by the caller. [`LogForwarder`] sends
//! events to the `log` facade, [`MemoryLog`] keeps them for inspection.

use std::sync::Mutex;

/// Receiver for events raised during a scan or report run.
pub trait ScanLog: Send + Sync {
    /// Progress information.
    fn info(&self, message: &str);

    /// Something was off but the run continues.
    fn warn(&self, message: &str);

    /// A scanner failed; its contribution is dropped.
    fn scanner_failed(&self, scanner: &str, error: &dyn std::error::Error);
}

/// Forwards events to the `log` macros.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogForwarder;

impl ScanLog for LogForwarder {
    fn info(&self, message: &str) {
        log::info!("{}", message);
    }

    fn warn(&self, message: &str) {
        log::warn!("{}", message);
    }

    fn scanner_failed(&self, scanner: &str, error: &dyn std::error::Error) {
        log::error!("Scanner '{}' failed: {}", scanner, error);
    }
}

/// A recorded log event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    Info(String),
    Warn(String),
    ScannerFailed { scanner: String, error: String },
}

/// Keeps events in memory.
#[derive(Debug, Default)]
pub struct MemoryLog {
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: LogEvent) {
        // A poisoned lock still holds valid events
        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        events.push(event);
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Recorded warnings.
    pub fn warnings(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                LogEvent::Warn(msg) => Some(msg),
                _ => None,
            })
            .collect()
    }

    /// Names of the scanners that failed, in failure order.
    pub fn failed_scanners(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                LogEvent::ScannerFailed { scanner, .. } => Some(scanner),
                _ => None,
            })
            .collect()
    }
}

impl ScanLog for MemoryLog {
    fn info(&self, message: &str) {
        self.push(LogEvent::Info(message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.push(LogEvent::Warn(message.to_string()));
    }

    fn scanner_failed(&self, scanner: &str, error: &dyn std::error::Error) {
        self.push(LogEvent::ScannerFailed {
            scanner: scanner.to_string(),
            error: error.to_string(),
        });
    }
}
