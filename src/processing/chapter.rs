// src/processing/chapter.rs

use super::category::{read_in_order, CategoryOutcome};
use super::{ExtractionContext, FileReader, TokenCounter};
use crate::budget::TokenBudget;
use crate::cancellation::CancellationToken;
use crate::core_types::{CategoryReport, RecordKind};
use crate::progress::NoOpProgress;
use crate::scoring::FileCategory;
use std::path::Path;

/// Reads the files of one documentation chapter, in the given order, under a flat budget.
///
/// Unlike categorized extraction nothing is sorted or funded: `budget` should
/// come from [`TokenBudget::flat`] or [`TokenBudget::chapter`]. Unreadable files
/// are skipped; the first file that does not fit ends the chapter. Records are
/// tagged [`RecordKind::Chapter`] and the report is filed under `Context`.
///
/// ```
/// use sential::budget::TokenBudget;
/// use sential::processing::{extract_chapter, FsFileReader};
/// use sential::CancellationToken;
/// # use std::fs;
/// # let dir = tempfile::tempdir().unwrap();
/// # fs::write(dir.path().join("intro.md"), "# Intro").unwrap();
///
/// let words = |text: &str| text.split_whitespace().count();
/// let mut budget = TokenBudget::chapter(100);
/// let outcome = extract_chapter(
///     dir.path(),
///     &["intro.md".to_string(), "missing.md".to_string()],
///     &FsFileReader,
///     &words,
///     &mut budget,
///     &CancellationToken::new(),
/// );
/// assert_eq!(outcome.records.len(), 1);
/// assert_eq!(outcome.report.skipped, 1);
/// ```
pub fn extract_chapter(
    root: &Path,
    paths: &[String],
    reader: &dyn FileReader,
    counter: &dyn TokenCounter,
    budget: &mut TokenBudget,
    token: &CancellationToken,
) -> CategoryOutcome {
    let ctx = ExtractionContext {
        root,
        reader,
        counter,
        token,
        progress: &NoOpProgress,
    };
    let mut report = CategoryReport::new(FileCategory::Context, paths.len());
    let records = read_in_order(
        &ctx,
        paths.iter().map(String::as_str),
        RecordKind::Chapter,
        budget,
        &mut report,
    );
    CategoryOutcome { records, report }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::StopReason;
    use crate::errors::FileReadError;

    fn reader(path: &Path) -> Result<String, FileReadError> {
        match path.to_str() {
            Some("docs/b.md") => Ok("bbbb".to_string()),
            Some("docs/a.md") => Ok("aa".to_string()),
            Some("src/huge.py") => Ok("x".repeat(100)),
            _ => Err(FileReadError::NotAFile {
                path: path.display().to_string(),
            }),
        }
    }

    #[test]
    fn test_chapter_keeps_given_order() {
        let counter = |text: &str| text.len();
        let mut budget = TokenBudget::flat(10, 1.0);
        let paths = vec!["docs/b.md".to_string(), "docs/a.md".to_string()];

        let outcome = extract_chapter(
            Path::new(""),
            &paths,
            &reader,
            &counter,
            &mut budget,
            &CancellationToken::new(),
        );

        let order: Vec<_> = outcome.records.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(order, vec!["docs/b.md", "docs/a.md"]);
        assert!(outcome.records.iter().all(|r| r.kind == RecordKind::Chapter));
        assert_eq!(budget.remaining(), 4);
    }

    #[test]
    fn test_chapter_stops_when_budget_runs_out() {
        let counter = |text: &str| text.len();
        let mut budget = TokenBudget::chapter(20);
        let paths = vec![
            "docs/a.md".to_string(),
            "src/huge.py".to_string(),
            "docs/b.md".to_string(),
        ];

        let outcome = extract_chapter(
            Path::new(""),
            &paths,
            &reader,
            &counter,
            &mut budget,
            &CancellationToken::new(),
        );

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.report.stop_reason, StopReason::BudgetExhausted);
        assert_eq!(budget.remaining(), 10);
    }
}
