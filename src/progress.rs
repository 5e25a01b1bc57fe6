// src/progress.rs

//! Defines a trait for reporting progress of the clone steps.
#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};
#[cfg(feature = "progress")]
use std::time::Duration;

/// A trait for reporting progress, abstracting over specific implementations like `indicatif`.
///
/// The clone orchestrator reports one message per git command; the final
/// message summarises the clone.
///
/// # Examples
///
/// ```
/// use repodigest::progress::ProgressReporter;
/// use std::sync::Mutex;
///
/// // A mock reporter that records every message.
/// struct MockProgress {
///     messages: Mutex<Vec<String>>,
/// }
/// impl ProgressReporter for MockProgress {
///     fn set_message(&self, msg: String) {
///         self.messages.lock().unwrap().push(msg);
///     }
///     fn finish(&self) {}
///     fn finish_with_message(&self, msg: String) {
///         self.messages.lock().unwrap().push(msg);
///     }
/// }
///
/// let reporter = MockProgress { messages: Mutex::new(Vec::new()) };
/// reporter.set_message("Cloning...".to_string());
/// reporter.finish_with_message("Cloned.".to_string());
/// assert_eq!(*reporter.messages.lock().unwrap(), vec!["Cloning...", "Cloned."]);
/// ```
pub trait ProgressReporter: Send + Sync {
    /// Sets a descriptive message for the current operation (e.g., "Cloning...").
    fn set_message(&self, msg: String);
    /// Finishes the progress reporting, hiding the spinner.
    fn finish(&self);
    /// Finishes the progress reporting with a final message.
    fn finish_with_message(&self, msg: String);
}

/// A `ProgressReporter` that does nothing.
///
/// This is used as a default or in non-interactive environments where a
/// spinner is not desired.
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    fn set_message(&self, _msg: String) {}
    fn finish(&self) {}
    fn finish_with_message(&self, _msg: String) {}
}

/// An implementation of `ProgressReporter` using an `indicatif` spinner.
#[cfg(feature = "progress")]
#[derive(Clone)]
pub struct IndicatifProgress {
    bar: ProgressBar,
}

#[cfg(feature = "progress")]
impl IndicatifProgress {
    /// Creates a steadily ticking spinner on stderr.
    pub fn new() -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { bar: pb }
    }
}

#[cfg(feature = "progress")]
impl Default for IndicatifProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "progress")]
impl ProgressReporter for IndicatifProgress {
    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }

    fn finish_with_message(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }
}
