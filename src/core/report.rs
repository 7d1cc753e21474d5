//! Verbose reporting
//!
//! Diagnostics meant for a human watching the run (which destination was
//! picked, the most recent local index, how long it took) go through a
//! [`Reporter`] handed to each component. Nothing here ever writes to the
//! listing output.

use log::info;
use std::sync::Mutex;

/// Log target used for verbose reports
pub const REPORT_TARGET: &str = "report";

/// Sink for verbose diagnostics
pub trait Reporter: Send + Sync {
    fn report(&self, message: &str);
}

/// Discards every report (the non-verbose default)
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn report(&self, _message: &str) {}
}

/// Forwards reports to the `log` facade at info level under [`REPORT_TARGET`]
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, message: &str) {
        info!(target: REPORT_TARGET, "{}", message);
    }
}

/// Keeps reports in memory, for tests and embedding callers
#[derive(Debug, Default)]
pub struct RecordingReporter {
    messages: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// True if any report contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.messages().iter().any(|m| m.contains(needle))
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
