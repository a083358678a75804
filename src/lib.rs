//! `sential` is a library and command-line tool that condenses a source
//! repository into a token-bounded JSONL payload for large language models.
//!
//! Every file is scored by how much it says about the project. A fixed token
//! budget is then spent in priority order: context files (READMEs, design
//! notes), dependency manifests, entry points, and finally symbol listings of
//! the remaining source files, produced by universal-ctags.
//!
//! As a library, it provides a modular pipeline:
//! 1.  **Discover**: List repository files through git or a `.gitignore`-aware walk.
//! 2.  **Categorize**: Score and group every path for a language profile.
//! 3.  **Process**: Read or tag files category by category under a shared budget.
//! 4.  **Output**: Write the admitted records as JSON lines.
//!
//! # Example: Library Usage
//!
//! The stages can be driven directly with in-memory collaborators. Here any
//! closure serves as the token counter and a scripted tag engine stands in for
//! ctags.
//!
//! ```
//! use sential::budget::{TokenBudget, TokenLimits};
//! use sential::processing::symbols::{ScriptedRun, ScriptedTagEngine};
//! use sential::processing::{ExtractionContext, FsFileReader};
//! use sential::progress::NoOpProgress;
//! use sential::scoring::Language;
//! use sential::{categorize, process, CancellationToken};
//! use std::fs;
//!
//! // 1. Set up a small repository.
//! let dir = tempfile::tempdir().unwrap();
//! fs::write(dir.path().join("README.md"), "# Demo service").unwrap();
//! fs::write(dir.path().join("requirements.txt"), "flask").unwrap();
//! fs::create_dir(dir.path().join("lib")).unwrap();
//! fs::write(dir.path().join("lib/store.py"), "class Store: pass").unwrap();
//!
//! // 2. Score and group the paths.
//! let paths = vec![
//!     "README.md".to_string(),
//!     "requirements.txt".to_string(),
//!     "lib/store.py".to_string(),
//! ];
//! let categorized = categorize(&paths, Language::Python.profile());
//!
//! // 3. Extract under the default budget.
//! let tagger = ScriptedTagEngine::new([ScriptedRun::tags(&[
//!     (dir.path().join("lib/store.py"), "class", "Store"),
//! ])]);
//! let words = |text: &str| text.split_whitespace().count();
//! let token = CancellationToken::new();
//! let ctx = ExtractionContext {
//!     root: dir.path(),
//!     reader: &FsFileReader,
//!     counter: &words,
//!     token: &token,
//!     progress: &NoOpProgress,
//! };
//! let mut budget = TokenBudget::pooled(&TokenLimits::default());
//! let report = process(&ctx, &tagger, 100, categorized, &mut budget);
//!
//! // 4. Records come out in priority order.
//! let paths: Vec<_> = report.records.iter().map(|r| r.path.as_str()).collect();
//! assert_eq!(paths, vec!["README.md", "requirements.txt", "lib/store.py"]);
//! assert_eq!(report.records[2].content, "class Store");
//! ```

// Make modules public if they contain public types used in the API
pub mod budget;
pub mod cancellation;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core_types;
pub mod discovery;
pub mod errors;
pub mod output;
pub mod processing;
pub mod progress;
pub mod scoring;
pub mod signal;

// Re-export key public types for easier use as a library
pub use cancellation::CancellationToken;
pub use config::{Config, ConfigBuilder, OutputDestination};
pub use core_types::{PipelineReport, ProcessedRecord};

use crate::budget::TokenBudget;
use crate::core_types::{CategoryReport, StopReason};
use crate::errors::{Error, Result};
use crate::processing::{
    extract_chapter, process_files, CtagsEngine, ExtractionContext, FsFileReader, TagEngine,
    TiktokenCounter,
};
use crate::progress::{NoOpProgress, ProgressReporter};
use crate::scoring::{categorize_files, CategorizedFiles, FileCategory, LanguageProfile};
use std::io::Write;
use std::sync::Arc;

/// Lists the repository files named by the configuration.
///
/// This is the first stage of the pipeline. Paths are relative to
/// `config.root`, use `/` separators, and contain no duplicates.
///
/// # Errors
/// Returns `Error::Listing` if the provider fails and `Error::Interrupted`
/// if `token` fires first.
pub fn discover(config: &Config, token: &CancellationToken) -> Result<Vec<String>> {
    discovery::list_files(&config.root, config.listing, token)
}

/// Scores every path against `profile` and groups the results by category.
pub fn categorize(paths: &[String], profile: &LanguageProfile) -> CategorizedFiles {
    categorize_files(paths, profile)
}

/// Runs the extractors over categorized files.
///
/// Context, manifest and signal files are read in full; source files are
/// reduced to symbol listings by `tagger`. Every category draws from `budget`.
/// A tagger failure ends up in [`PipelineReport::tagger_error`] rather than
/// aborting the call, so records admitted before it are kept.
pub fn process(
    ctx: &ExtractionContext<'_>,
    tagger: &dyn TagEngine,
    batch_size: usize,
    categorized: CategorizedFiles,
    budget: &mut TokenBudget,
) -> PipelineReport {
    process_files(ctx, tagger, batch_size, categorized, budget)
}

/// Executes discovery, categorization and extraction without writing output.
///
/// Production collaborators are built from `config`: a tiktoken counter for
/// the configured model, the filesystem reader, and ctags located via
/// [`processing::symbols::locate_ctags`]. If `config.timeout` is set, the run
/// stops admitting files once it expires and returns what it has.
///
/// A timeout that expires during discovery yields an empty report marked
/// cancelled; only cancellation of `token` itself is an `Error::Interrupted`.
///
/// Chapter runs skip discovery and read the configured paths in order under
/// a flat budget.
///
/// # Errors
/// Returns `Error::Tokenizer` if no tokenizer can be loaded, listing errors
/// from [`discover`], and `Error::NoFilesFound` if no file is relevant to the
/// selected language.
pub fn execute(
    config: &Config,
    token: &CancellationToken,
    progress: Option<Arc<dyn ProgressReporter>>,
) -> Result<PipelineReport> {
    let caller = token;
    let token = match config.timeout {
        Some(timeout) => caller.with_timeout(timeout),
        None => caller.clone(),
    };
    let counter = TiktokenCounter::for_model(&config.tokenizer_model)?;
    let reader = FsFileReader;

    if let Some(chapter) = &config.chapter {
        let mut budget = TokenBudget::flat(config.limits.max_total, chapter.ratio);
        log::info!(
            "Reading chapter of {} files under a {} token budget.",
            chapter.paths.len(),
            budget.remaining()
        );
        let outcome = extract_chapter(
            &config.root,
            &chapter.paths,
            &reader,
            &counter,
            &mut budget,
            &token,
        );
        return Ok(PipelineReport {
            records: outcome.records,
            categories: vec![outcome.report],
            remaining_budget: budget.remaining(),
            tagger_error: None,
        });
    }

    let paths = match discover(config, &token) {
        Ok(paths) => paths,
        // Only the deadline fired: the run is empty, not interrupted.
        Err(Error::Interrupted) if !caller.is_cancelled() => {
            log::warn!("Timed out while listing files; nothing was extracted.");
            let mut listing = CategoryReport::new(FileCategory::Context, 0);
            listing.stop_reason = StopReason::Cancelled;
            return Ok(PipelineReport {
                categories: vec![listing],
                ..Default::default()
            });
        }
        Err(e) => return Err(e),
    };
    let categorized = categorize(&paths, config.language.profile());
    if categorized.relevant_count() == 0 {
        return Err(Error::NoFilesFound);
    }
    log::info!(
        "Found {} relevant files out of {} for {}.",
        categorized.relevant_count(),
        categorized.total_count(),
        config.language
    );

    let tagger = CtagsEngine::locate(config.ctags_program.as_deref());
    let progress = progress.unwrap_or_else(|| Arc::new(NoOpProgress));
    let ctx = ExtractionContext {
        root: &config.root,
        reader: &reader,
        counter: &counter,
        token: &token,
        progress: progress.as_ref(),
    };
    let mut budget = TokenBudget::pooled(&config.limits);
    Ok(process(
        &ctx,
        &tagger,
        config.batch_size,
        categorized,
        &mut budget,
    ))
}

/// Executes the complete pipeline and writes the result.
///
/// This is the primary entry point for running the tool's logic
/// programmatically in a way that mirrors the command-line execution. The
/// JSONL payload (or, for a dry run, the ranked listing) goes to the
/// configured destination. With `config.summary` set, a summary is printed to
/// stderr afterwards.
///
/// For a dry run nothing is read or tagged and the returned report is empty.
///
/// # Errors
/// Returns the errors of [`execute`], plus `Error::Io` if the destination
/// cannot be written.
pub fn run(
    config: &Config,
    token: &CancellationToken,
    progress: Option<Arc<dyn ProgressReporter>>,
) -> Result<PipelineReport> {
    if config.dry_run {
        let paths = discover(config, token)?;
        let categorized = categorize(&paths, config.language.profile());
        if categorized.relevant_count() == 0 {
            return Err(Error::NoFilesFound);
        }
        let mut writer = output::writer::open_writer(&config.output_destination)?;
        output::dry_run::write_dry_run_output(&mut writer, &categorized)?;
        output::writer::finalize_output(writer, &config.output_destination)?;
        return Ok(PipelineReport::default());
    }

    let report = execute(config, token, progress)?;

    let mut writer = output::writer::open_writer(&config.output_destination)?;
    output::generate_output(&report, &mut writer)?;
    output::writer::finalize_output(writer, &config.output_destination)?;

    if config.summary {
        let mut stderr = std::io::stderr().lock();
        output::summary::write_summary(&mut stderr, &report)?;
        stderr
            .flush()
            .map_err(|e| errors::io_error_with_path(e, "<stderr>"))?;
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use std::fs;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_run_dry_run_success() -> anyhow::Result<()> {
        let temp_dir = tempdir()?;
        let output_file_path = temp_dir.path().join("output.txt");
        fs::write(temp_dir.path().join("README.md"), "# Demo")?;
        fs::write(temp_dir.path().join("main.py"), "print('hi')")?;

        let config = ConfigBuilder::new()
            .input_path(temp_dir.path().to_str().unwrap())
            .listing(discovery::ListingMode::Walk)
            .output_file(output_file_path.to_str().unwrap())
            .dry_run(true)
            .build()?;

        let report = run(&config, &CancellationToken::new(), None)?;
        assert!(report.records.is_empty());

        let output_content = fs::read_to_string(&output_file_path)?;
        assert!(output_content.contains("[context] (1)\n"));
        assert!(output_content.contains("  1000  README.md\n"));
        assert!(output_content.contains("[signal] (1)\n"));
        assert!(output_content.contains("main.py"));
        Ok(())
    }

    #[test]
    fn test_run_returns_no_files_found_error() -> anyhow::Result<()> {
        let temp_dir = tempdir()?;
        fs::write(temp_dir.path().join("logo.png"), [0u8, 1, 2])?;
        let config = ConfigBuilder::new()
            .input_path(temp_dir.path().to_str().unwrap())
            .listing(discovery::ListingMode::Walk)
            .dry_run(true)
            .build()?;

        let result = run(&config, &CancellationToken::new(), None);
        assert!(matches!(result, Err(Error::NoFilesFound)));
        Ok(())
    }

    #[test]
    fn test_timeout_during_discovery_is_not_an_interruption() -> anyhow::Result<()> {
        let temp_dir = tempdir()?;
        let output_file_path = temp_dir.path().join("out.jsonl");
        fs::write(temp_dir.path().join("README.md"), "# Demo")?;
        let mut config = ConfigBuilder::new()
            .input_path(temp_dir.path().to_str().unwrap())
            .listing(discovery::ListingMode::Walk)
            .output_file(output_file_path.to_str().unwrap())
            .build()?;
        config.timeout = Some(Duration::ZERO);
        let token = CancellationToken::new();

        let report = execute(&config, &token, None)?;
        assert!(report.records.is_empty());
        assert!(report.was_cancelled());
        assert!(!token.is_cancelled());

        let report = run(&config, &token, None)?;
        assert!(report.was_cancelled());
        assert_eq!(fs::read_to_string(&output_file_path)?, "");
        Ok(())
    }

    #[test]
    fn test_user_cancellation_during_discovery_is_an_error() -> anyhow::Result<()> {
        let temp_dir = tempdir()?;
        fs::write(temp_dir.path().join("README.md"), "# Demo")?;
        let mut config = ConfigBuilder::new()
            .input_path(temp_dir.path().to_str().unwrap())
            .listing(discovery::ListingMode::Walk)
            .build()?;
        config.timeout = Some(Duration::from_secs(60));
        let token = CancellationToken::new();
        token.cancel();

        assert!(matches!(
            execute(&config, &token, None),
            Err(Error::Interrupted)
        ));
        Ok(())
    }

    #[test]
    fn test_discover_respects_cancellation() -> anyhow::Result<()> {
        let temp_dir = tempdir()?;
        fs::write(temp_dir.path().join("a.py"), "x = 1")?;
        let config = ConfigBuilder::new()
            .input_path(temp_dir.path().to_str().unwrap())
            .listing(discovery::ListingMode::Walk)
            .build()?;

        let token = CancellationToken::new();
        token.cancel();
        assert!(matches!(discover(&config, &token), Err(Error::Interrupted)));
        Ok(())
    }
}
