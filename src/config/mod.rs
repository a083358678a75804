//! Defines the core `Config` struct and related types for application configuration.
//!
//! A `Config` is immutable once built. It is produced by [`ConfigBuilder`],
//! either programmatically or from parsed command-line arguments, and carries
//! every already-resolved value the pipeline needs.

use crate::budget::TokenLimits;
use crate::discovery::ListingMode;
use crate::scoring::Language;
use std::path::PathBuf;
use std::time::Duration;

pub use builder::ConfigBuilder;
mod builder;
mod parsing;
mod path_resolve;
mod validation;

pub use parsing::parse_language;
pub use path_resolve::resolve_root;

/// Settings for a flat-budget chapter run.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterConfig {
    /// Repository-relative paths, read in this order.
    pub paths: Vec<String>,
    /// Share of the total cap available to the chapter.
    pub ratio: f64,
}

/// Configuration for one `sential` run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Canonicalized repository root.
    pub root: PathBuf,
    /// Language whose profile drives scoring.
    pub language: Language,
    /// Total token cap and per-category shares.
    pub limits: TokenLimits,
    /// Source files per tagger invocation.
    pub batch_size: usize,
    /// Model whose tokenizer prices text.
    pub tokenizer_model: String,
    /// Explicit tagger executable; located automatically when `None`.
    pub ctags_program: Option<PathBuf>,
    /// How repository files are enumerated.
    pub listing: ListingMode,
    /// Where the JSONL payload (or dry-run listing) goes.
    pub output_destination: OutputDestination,
    /// Print a run summary to stderr.
    pub summary: bool,
    /// List scored files without reading or tagging anything.
    pub dry_run: bool,
    /// Run-level time limit; partial results are kept when it expires.
    pub timeout: Option<Duration>,
    /// Treat a tagger failure as a failed run.
    pub strict_tagger: bool,
    /// Set for chapter runs; categorized extraction is skipped.
    pub chapter: Option<ChapterConfig>,
}

impl Config {
    /// Creates a default `Config` rooted at `.` for tests.
    ///
    /// This function is hidden from public documentation and is intended for
    /// use in tests and doc tests only.
    #[doc(hidden)]
    pub fn new_for_test() -> Self {
        Self {
            root: PathBuf::from("."),
            language: Language::Python,
            limits: TokenLimits::default(),
            batch_size: crate::constants::DEFAULT_BATCH_SIZE,
            tokenizer_model: crate::constants::DEFAULT_TOKENIZER_MODEL.to_string(),
            ctags_program: None,
            listing: ListingMode::Auto,
            output_destination: OutputDestination::Stdout,
            summary: false,
            dry_run: false,
            timeout: None,
            strict_tagger: false,
            chapter: None,
        }
    }
}

/// Represents the destination for the generated output.
#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum OutputDestination {
    /// Write to standard output.
    Stdout,
    /// Write to the specified file path.
    File(PathBuf),
}
