//! Handles the extraction stage of the `sential` pipeline.
//!
//! Categories are processed one after another in a fixed priority order:
//! context, manifests, entry points, then source files. The first three are
//! read in full; source files are reduced to symbol listings by the external
//! tagger. All of them draw from one pooled [`TokenBudget`], so tokens left
//! over by an early category are available to the later ones.

use crate::budget::TokenBudget;
use crate::cancellation::CancellationToken;
use crate::core_types::{CategoryReport, PipelineReport, StopReason};
use crate::progress::{stage_message, ProgressReporter};
use crate::scoring::{sort_by_significance, CategorizedFiles, FileCategory};
use log::info;
use std::path::Path;

mod category;
mod chapter;
mod content_reader;
mod counter;
pub mod symbols;
mod text_detection;

pub use category::{extract_category, CategoryOutcome};
pub use chapter::extract_chapter;
pub use content_reader::{FileReader, FsFileReader};
pub use counter::{TiktokenCounter, TokenCounter};
pub use symbols::{extract_symbols, CtagsEngine, SymbolOutcome, TagEngine};
pub use text_detection::is_likely_text;

/// Capabilities shared by every extractor during one run.
#[derive(Clone, Copy)]
pub struct ExtractionContext<'a> {
    /// Repository root that record paths are relative to.
    pub root: &'a Path,
    /// Reads full file text.
    pub reader: &'a dyn FileReader,
    /// Prices text in tokens.
    pub counter: &'a dyn TokenCounter,
    /// Checked between files and while waiting on the tagger.
    pub token: &'a CancellationToken,
    /// Receives per-category messages and per-file positions.
    pub progress: &'a dyn ProgressReporter,
}

/// Runs every category of `categorized` through its extractor.
///
/// `Unknown` files are never processed and empty categories are skipped.
/// A tagger failure is recorded in the report rather than returned, so the
/// records committed before it survive.
pub fn process_files(
    ctx: &ExtractionContext<'_>,
    tagger: &dyn TagEngine,
    batch_size: usize,
    mut categorized: CategorizedFiles,
    budget: &mut TokenBudget,
) -> PipelineReport {
    let mut report = PipelineReport::default();

    for category in FileCategory::PROCESSING_ORDER {
        let mut files = categorized.take(category);
        if files.is_empty() {
            continue;
        }

        let span = tracing::info_span!("category", name = %category, files = files.len());
        let _enter = span.enter();

        if ctx.token.is_cancelled() {
            let mut skipped = CategoryReport::new(category, files.len());
            skipped.stop_reason = StopReason::Cancelled;
            report.categories.push(skipped);
            break;
        }

        ctx.progress
            .begin_stage(stage_message(category), files.len() as u64);

        let category_report = if category == FileCategory::Source {
            sort_by_significance(&mut files);
            let outcome = extract_symbols(ctx, tagger, batch_size, &files, budget);
            report.records.extend(outcome.records);
            if outcome.error.is_some() {
                report.tagger_error = outcome.error;
            }
            outcome.report
        } else {
            let outcome = extract_category(ctx, category, files, budget);
            report.records.extend(outcome.records);
            outcome.report
        };

        info!(
            "{}: admitted {} of {} files, {} tokens ({}).",
            category,
            category_report.admitted,
            category_report.candidates,
            category_report.tokens_spent,
            category_report.stop_reason
        );
        let cancelled = category_report.stop_reason == StopReason::Cancelled;
        report.categories.push(category_report);
        if cancelled {
            break;
        }
    }

    report.remaining_budget = budget.remaining();
    ctx.progress.finish_run(format!(
        "Extracted {} files ({} tokens).",
        report.records.len(),
        report.tokens_spent()
    ));
    report
}
