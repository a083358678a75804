// src/output/summary.rs

use crate::core_types::PipelineReport;
use crate::errors::{io_error_with_path, Result};
use std::io::Write;

/// Writes a human-readable run summary.
///
/// One line per processed category, then totals, then a line for each reason
/// the payload is partial. Budget exhaustion and tagger failure are reported
/// separately since only the latter indicates a broken environment.
pub fn write_summary(writer: &mut dyn Write, report: &PipelineReport) -> Result<()> {
    write_lines(writer, report).map_err(|e| io_error_with_path(e, "<summary>"))
}

fn write_lines(writer: &mut dyn Write, report: &PipelineReport) -> std::io::Result<()> {
    writeln!(writer, "--- sential summary ---")?;
    for category in &report.categories {
        writeln!(
            writer,
            "{:<8} {}/{} admitted, {} skipped, {} tokens ({})",
            category.category.label(),
            category.admitted,
            category.candidates,
            category.skipped,
            category.tokens_spent,
            category.stop_reason
        )?;
    }
    writeln!(
        writer,
        "Records: {} | Tokens spent: {} | Remaining budget: {}",
        report.records.len(),
        report.tokens_spent(),
        report.remaining_budget
    )?;

    if report.budget_exhausted() {
        writeln!(
            writer,
            "Partial: token budget exhausted before every candidate was admitted."
        )?;
    }
    if let Some(error) = &report.tagger_error {
        writeln!(writer, "Partial: source symbols incomplete, {}", error)?;
    }
    if report.was_cancelled() {
        writeln!(writer, "Partial: run cancelled or timed out.")?;
    }
    Ok(())
}
