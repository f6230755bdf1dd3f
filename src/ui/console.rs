//! Styled console reporter

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use console::{Style, Term};
use indicatif::{ProgressBar, ProgressStyle};

use super::{CallEvent, CallOutcome, Reporter};

/// Interactive reporter writing styled lines to stdout
///
/// Verbose lines are dimmed and only shown with `--verbose`. When `disabled`
/// is set nothing is printed, but call events are still forwarded to `tracing`.
pub struct ConsoleReporter {
    verbose: bool,
    disabled: bool,
    spinner: Mutex<Option<ProgressBar>>,
}

impl ConsoleReporter {
    pub fn new(verbose: bool, disabled: bool) -> Self {
        Self {
            verbose,
            disabled,
            spinner: Mutex::new(None),
        }
    }

    fn print(&self, line: String) {
        if self.disabled {
            return;
        }
        let spinner = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        match spinner.as_ref() {
            Some(pb) => pb.suspend(|| println!("{line}")),
            None => println!("{line}"),
        }
    }

    fn spinner_enabled(&self) -> bool {
        !self.disabled && Term::stdout().is_term()
    }
}

impl Reporter for ConsoleReporter {
    fn verbose(&self, message: &str) {
        if self.verbose {
            self.print(Style::new().dim().apply_to(message).to_string());
        }
    }

    fn info(&self, message: &str) {
        self.print(format!("{} {}", Style::new().cyan().apply_to("›"), message));
    }

    fn success(&self, message: &str) {
        self.print(format!(
            "{} {}",
            Style::new().green().bold().apply_to("✓"),
            Style::new().bold().apply_to(message)
        ));
    }

    fn warn(&self, message: &str) {
        if self.disabled {
            return;
        }
        eprintln!("{} {}", Style::new().yellow().bold().apply_to("!"), message);
    }

    fn call(&self, event: &CallEvent) {
        match event.outcome {
            CallOutcome::Succeeded { status } => tracing::debug!(
                method = %event.method,
                path = %event.path,
                status,
                "api call succeeded"
            ),
            CallOutcome::RateLimited { retrying } => tracing::warn!(
                method = %event.method,
                path = %event.path,
                retrying,
                "api call hit rate limit"
            ),
            CallOutcome::Failed { status } => tracing::warn!(
                method = %event.method,
                path = %event.path,
                status = ?status,
                "api call failed"
            ),
        }
        self.verbose(&format!("{} to {} {}", event.method, event.path, event.outcome));
    }

    fn begin_phase(&self, label: &str) {
        if !self.spinner_enabled() {
            return;
        }
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let pb = ProgressBar::new_spinner();
        pb.set_style(style);
        pb.set_message(label.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        let mut spinner = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = spinner.replace(pb) {
            previous.finish_and_clear();
        }
    }

    fn end_phase(&self) {
        let mut spinner = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(pb) = spinner.take() {
            pb.finish_and_clear();
        }
    }
}
