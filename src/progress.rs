// src/progress.rs

//! Reports extraction progress, one stage per file category.
#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

use crate::scoring::FileCategory;

/// Receives stage changes and per-file positions from the orchestrator.
///
/// A run is a sequence of stages, one per non-empty category, each with its
/// own file count. Positions are relative to the current stage.
///
/// # Examples
///
/// ```
/// use sential::progress::{stage_message, ProgressReporter};
/// use sential::scoring::FileCategory;
/// use std::sync::Mutex;
///
/// #[derive(Default)]
/// struct StageLog(Mutex<Vec<(String, u64)>>);
///
/// impl ProgressReporter for StageLog {
///     fn begin_stage(&self, message: &str, total: u64) {
///         self.0.lock().unwrap().push((message.to_string(), total));
///     }
///     fn advance_to(&self, _done: u64) {}
///     fn finish_run(&self, _summary: String) {}
/// }
///
/// let log = StageLog::default();
/// log.begin_stage(stage_message(FileCategory::Context), 3);
/// log.begin_stage(stage_message(FileCategory::Source), 120);
///
/// let stages = log.0.lock().unwrap();
/// assert_eq!(stages[0], ("Establishing project context...".to_string(), 3));
/// assert_eq!(stages[1].1, 120);
/// ```
pub trait ProgressReporter: Send + Sync {
    /// Starts a stage covering `total` files.
    fn begin_stage(&self, message: &str, total: u64);
    /// Marks `done` files of the current stage as handled.
    fn advance_to(&self, done: u64);
    /// Ends the run with a one-line summary.
    fn finish_run(&self, summary: String);
}

/// Message shown while `category` is being extracted.
pub fn stage_message(category: FileCategory) -> &'static str {
    match category {
        FileCategory::Context => "Establishing project context...",
        FileCategory::Manifest => "Analyzing manifest & dependency files...",
        FileCategory::Signal => "Identifying high-signal entry points...",
        FileCategory::Source => "Generating code symbols...",
        FileCategory::Unknown => "Skipping unrelated files...",
    }
}

/// A `ProgressReporter` that does nothing.
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    fn begin_stage(&self, _message: &str, _total: u64) {}
    fn advance_to(&self, _done: u64) {}
    fn finish_run(&self, _summary: String) {}
}

/// A single `indicatif` bar that is reset at every stage.
#[cfg(feature = "progress")]
#[derive(Clone)]
pub struct IndicatifProgress {
    bar: ProgressBar,
}

#[cfg(feature = "progress")]
impl IndicatifProgress {
    /// Creates a hidden-until-first-stage bar on stderr.
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} {msg:<42} [{bar:30.cyan/blue}] {pos}/{len} files")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        Self { bar }
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
    fn begin_stage(&self, message: &str, total: u64) {
        self.bar.reset();
        self.bar.set_length(total);
        self.bar.set_message(message.to_string());
    }

    fn advance_to(&self, done: u64) {
        self.bar.set_position(done);
    }

    fn finish_run(&self, summary: String) {
        self.bar.finish_with_message(summary);
    }
}
