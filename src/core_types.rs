//! Defines core data structures produced by the extraction pipeline.
//!
//! `ProcessedRecord` is the unit of output. `PipelineReport` wraps the records
//! of a run together with per-category accounting, so callers can tell a run
//! cut short by the budget from one cut short by a failing tagger.

use crate::errors::Error;
use crate::scoring::FileCategory;
use serde::Serialize;
use std::fmt;

/// Payload type of a [`ProcessedRecord`].
///
/// Serializes to the snake_case labels used in the JSONL payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecordKind {
    /// Full text of a context file.
    #[serde(rename = "context_file")]
    Context,
    /// Full text of a manifest.
    #[serde(rename = "manifest_file")]
    Manifest,
    /// Full text of an entry point.
    #[serde(rename = "signal_file")]
    Signal,
    /// Symbol listing of a source file.
    #[serde(rename = "source_file")]
    Source,
    /// Full text of a file requested for a documentation chapter.
    #[serde(rename = "chapter_file")]
    Chapter,
}

impl RecordKind {
    /// Label used in the JSONL payload.
    pub fn label(self) -> &'static str {
        match self {
            RecordKind::Context => "context_file",
            RecordKind::Manifest => "manifest_file",
            RecordKind::Signal => "signal_file",
            RecordKind::Source => "source_file",
            RecordKind::Chapter => "chapter_file",
        }
    }
}

impl From<FileCategory> for RecordKind {
    /// Maps a processed category to its payload type.
    ///
    /// # Panics
    /// Panics for [`FileCategory::Unknown`], which never produces records.
    fn from(category: FileCategory) -> Self {
        match category {
            FileCategory::Context => RecordKind::Context,
            FileCategory::Manifest => RecordKind::Manifest,
            FileCategory::Signal => RecordKind::Signal,
            FileCategory::Source => RecordKind::Source,
            FileCategory::Unknown => panic!("Unknown files never produce records"),
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One admitted file: its path, payload type and content.
///
/// For source files `content` is the newline-joined `"<kind> <name>"` symbol list;
/// for every other kind it is the full file text.
///
/// # Examples
///
/// ```
/// use sential::core_types::{ProcessedRecord, RecordKind};
///
/// let record = ProcessedRecord {
///     path: "src/app.py".to_string(),
///     kind: RecordKind::Source,
///     content: "class App\nfunction main".to_string(),
/// };
/// let json = serde_json::to_string(&record).unwrap();
/// assert_eq!(
///     json,
///     r#"{"path":"src/app.py","type":"source_file","content":"class App\nfunction main"}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedRecord {
    /// Repository-relative path with `/` separators.
    pub path: String,
    /// Payload type.
    #[serde(rename = "type")]
    pub kind: RecordKind,
    /// Full text or symbol listing.
    pub content: String,
}

/// Why an extractor stopped admitting files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every candidate was considered.
    Completed,
    /// The next candidate cost more than the pool held.
    BudgetExhausted,
    /// The run was cancelled or timed out.
    Cancelled,
    /// The tagging process could not be started or crashed without output.
    TaggerFailed,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopReason::Completed => "completed",
            StopReason::BudgetExhausted => "budget exhausted",
            StopReason::Cancelled => "cancelled",
            StopReason::TaggerFailed => "tagger failed",
        };
        f.write_str(text)
    }
}

/// Accounting for one extractor call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryReport {
    /// Category (or `Context` for chapter runs) the report covers.
    pub category: FileCategory,
    /// Files offered to the extractor.
    pub candidates: usize,
    /// Records produced.
    pub admitted: usize,
    /// Files skipped because they could not be read, were binary, or had no symbols.
    pub skipped: usize,
    /// Tokens charged to the budget.
    pub tokens_spent: usize,
    /// Why extraction ended.
    pub stop_reason: StopReason,
}

impl CategoryReport {
    /// An empty report for `category` with `candidates` files pending.
    pub fn new(category: FileCategory, candidates: usize) -> Self {
        Self {
            category,
            candidates,
            admitted: 0,
            skipped: 0,
            tokens_spent: 0,
            stop_reason: StopReason::Completed,
        }
    }

    /// Candidates that were never reached because extraction stopped early.
    pub fn dropped(&self) -> usize {
        self.candidates
            .saturating_sub(self.admitted)
            .saturating_sub(self.skipped)
    }
}

/// Records and accounting for one run.
#[derive(Debug, Default)]
pub struct PipelineReport {
    /// Admitted records, in emission order.
    pub records: Vec<ProcessedRecord>,
    /// One entry per processed category, in processing order.
    pub categories: Vec<CategoryReport>,
    /// Tokens left in the pool when the run ended.
    pub remaining_budget: usize,
    /// The tagger failure, if source extraction hit one.
    pub tagger_error: Option<Error>,
}

impl PipelineReport {
    /// True if any category stopped because the budget ran out.
    pub fn budget_exhausted(&self) -> bool {
        self.stopped_by(StopReason::BudgetExhausted)
    }

    /// True if the run was cancelled before every category completed.
    pub fn was_cancelled(&self) -> bool {
        self.stopped_by(StopReason::Cancelled)
    }

    /// True if source extraction failed because of the tagger.
    pub fn tagger_failed(&self) -> bool {
        self.tagger_error.is_some()
    }

    /// Total tokens spent across all categories.
    pub fn tokens_spent(&self) -> usize {
        self.categories.iter().map(|c| c.tokens_spent).sum()
    }

    fn stopped_by(&self, reason: StopReason) -> bool {
        self.categories.iter().any(|c| c.stop_reason == reason)
    }
}
