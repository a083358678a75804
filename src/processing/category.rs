// src/processing/category.rs

use super::ExtractionContext;
use crate::budget::TokenBudget;
use crate::core_types::{CategoryReport, ProcessedRecord, RecordKind, StopReason};
use crate::scoring::{sort_by_significance, FileCategory, FileRecord};
use log::{debug, warn};

/// Records and accounting produced by a full-text extractor.
#[derive(Debug)]
pub struct CategoryOutcome {
    /// Admitted records, in processing order.
    pub records: Vec<ProcessedRecord>,
    /// Accounting for the call.
    pub report: CategoryReport,
}

/// Reads the full text of context, manifest or signal files under the budget.
///
/// Files are sorted by significance, the category is funded once, and files
/// are admitted in order until one cannot be afforded. Unreadable and binary
/// files are skipped without stopping the category.
///
/// # Panics
/// Panics if `category` is `Source` or `Unknown`.
pub fn extract_category(
    ctx: &ExtractionContext<'_>,
    category: FileCategory,
    mut files: Vec<FileRecord>,
    budget: &mut TokenBudget,
) -> CategoryOutcome {
    assert!(
        matches!(
            category,
            FileCategory::Context | FileCategory::Manifest | FileCategory::Signal
        ),
        "full-text extraction is only defined for context, manifest and signal files, not {}",
        category
    );

    sort_by_significance(&mut files);
    budget.fund(category);

    let mut report = CategoryReport::new(category, files.len());
    let records = read_in_order(
        ctx,
        files.iter().map(|f| f.path.as_str()),
        RecordKind::from(category),
        budget,
        &mut report,
    );
    CategoryOutcome { records, report }
}

/// Admits files in the given order until the budget or the token stops it.
pub(super) fn read_in_order<'p>(
    ctx: &ExtractionContext<'_>,
    paths: impl Iterator<Item = &'p str>,
    kind: RecordKind,
    budget: &mut TokenBudget,
    report: &mut CategoryReport,
) -> Vec<ProcessedRecord> {
    let mut records = Vec::new();
    for (position, path) in paths.enumerate() {
        if ctx.token.is_cancelled() {
            report.stop_reason = StopReason::Cancelled;
            break;
        }
        ctx.progress.advance_to(position as u64);

        let content = match ctx.reader.read_text(&ctx.root.join(path)) {
            Ok(content) => content,
            Err(e) => {
                warn!("Skipping {}: {}", path, e);
                report.skipped += 1;
                continue;
            }
        };

        let cost = ctx.counter.count(&content);
        if !budget.try_spend(cost) {
            debug!(
                "Budget exhausted at {} (needs {}, {} left).",
                path,
                cost,
                budget.remaining()
            );
            report.stop_reason = StopReason::BudgetExhausted;
            break;
        }

        debug!("Admitted {} ({} tokens).", path, cost);
        report.admitted += 1;
        report.tokens_spent += cost;
        records.push(ProcessedRecord {
            path: path.to_string(),
            kind,
            content,
        });
    }
    records
}
