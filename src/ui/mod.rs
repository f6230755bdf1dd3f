//! UI/Reporting presentation layer
//!
//! This module handles:
//! - Operator-facing progress lines (verbose traces, stage summaries, success banner)
//! - Structured events for every API call
//! - A spinner while a resource kind is being reconciled
//! - The interactive activation prompt
//!
//! All reporting goes through the [`Reporter`] trait so the deployment core never
//! writes to the terminal directly. Implementations are chosen from command-line
//! flags (`--verbose`, `--disable-logs`) or swapped for a recorder in tests.

pub mod console;
pub mod logging;
pub mod prompt;
pub mod recording;

use std::fmt;

use crate::api::Method;

pub use console::ConsoleReporter;
pub use recording::{RecordingReporter, ReportLevel};

/// How an API call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    /// Response in the success or redirect range
    Succeeded { status: u16 },
    /// Rate limited; `retrying` is true when another API key was available
    RateLimited { retrying: bool },
    /// Rejected by the service, undecodable, or no response at all
    Failed { status: Option<u16> },
}

impl fmt::Display for CallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded { .. } => f.write_str("succeeded"),
            Self::RateLimited { retrying: true } => f.write_str("hit rate limit, retrying"),
            Self::RateLimited { retrying: false } => f.write_str("hit rate limit"),
            Self::Failed { .. } => f.write_str("failed"),
        }
    }
}

/// Structured record of one API call attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallEvent {
    pub method: Method,
    pub path: String,
    pub outcome: CallOutcome,
}

/// Reporter trait for deployment progress
///
/// This trait allows different reporting strategies:
/// - Styled console output (default)
/// - Silent/no-op output for `--disable-logs` and library use
/// - Recording for tests
pub trait Reporter: Send + Sync {
    /// Detailed trace line, only shown with `--verbose`
    fn verbose(&self, message: &str);

    /// Stage summary line
    fn info(&self, message: &str);

    /// Final success banner
    fn success(&self, message: &str);

    /// Something went wrong but the caller decides whether it is fatal
    fn warn(&self, message: &str);

    /// One API call attempt finished
    fn call(&self, event: &CallEvent);

    /// A long-running phase (one resource kind) started
    fn begin_phase(&self, _label: &str) {}

    /// The current phase settled
    fn end_phase(&self) {}
}

/// Silent reporter
///
/// No-op implementation that does not display anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn verbose(&self, _message: &str) {}

    fn info(&self, _message: &str) {}

    fn success(&self, _message: &str) {}

    fn warn(&self, _message: &str) {}

    fn call(&self, _event: &CallEvent) {}
}
