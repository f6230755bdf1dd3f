//! Reporter that keeps everything in memory
//!
//! Used by tests to assert on the lines and call events a deployment produced.

use std::sync::{Mutex, PoisonError};

use super::{CallEvent, Reporter};

/// Level a recorded line was reported at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLevel {
    Verbose,
    Info,
    Success,
    Warn,
}

#[derive(Debug, Default)]
pub struct RecordingReporter {
    lines: Mutex<Vec<(ReportLevel, String)>>,
    calls: Mutex<Vec<CallEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(ReportLevel, String)> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn calls(&self) -> Vec<CallEvent> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// True if any line at `level` contains `needle`
    pub fn contains(&self, level: ReportLevel, needle: &str) -> bool {
        self.lines()
            .iter()
            .any(|(l, line)| *l == level && line.contains(needle))
    }

    fn push(&self, level: ReportLevel, message: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, message.to_string()));
    }
}

impl Reporter for RecordingReporter {
    fn verbose(&self, message: &str) {
        self.push(ReportLevel::Verbose, message);
    }

    fn info(&self, message: &str) {
        self.push(ReportLevel::Info, message);
    }

    fn success(&self, message: &str) {
        self.push(ReportLevel::Success, message);
    }

    fn warn(&self, message: &str) {
        self.push(ReportLevel::Warn, message);
    }

    fn call(&self, event: &CallEvent) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
