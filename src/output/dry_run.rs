// src/output/dry_run.rs

use crate::errors::{io_error_with_path, Result};
use crate::scoring::{sort_by_significance, CategorizedFiles, FileCategory};
use log::debug;
use std::io::Write;

/// Writes the output for a dry run (`--dry-run`).
///
/// Lists every relevant file with its score, grouped by category in
/// processing order and sorted the way the extractors would visit them.
/// Nothing is read or tagged, so this says which files compete for each
/// pool, not which ones would fit.
pub fn write_dry_run_output(writer: &mut dyn Write, categorized: &CategorizedFiles) -> Result<()> {
    debug!("Executing dry run output...");
    write_listing(writer, categorized).map_err(|e| io_error_with_path(e, "<output>"))
}

fn write_listing(writer: &mut dyn Write, categorized: &CategorizedFiles) -> std::io::Result<()> {
    writeln!(writer, "--- Dry Run: Files ranked by significance ---")?;
    for category in FileCategory::PROCESSING_ORDER {
        let mut files = categorized.get(category).to_vec();
        if files.is_empty() {
            continue;
        }
        sort_by_significance(&mut files);
        writeln!(writer, "[{}] ({})", category.label(), files.len())?;
        for file in &files {
            writeln!(writer, "{:>6}  {}", file.score, file.path)?;
        }
    }
    let ignored = categorized.get(FileCategory::Unknown).len();
    writeln!(writer, "--- End Dry Run ({} unrelated files ignored) ---", ignored)?;
    writer.flush()
}
