// src/processing/symbols/mod.rs

//! Batched symbol extraction for source files.
//!
//! Source files are handed to the tagger in batches. Each batch's output is
//! consumed line by line; consecutive tags for the same file form one group,
//! and a group is priced and admitted as soon as the path changes. The first
//! group the budget cannot afford ends extraction, and the tagger is stopped
//! right there instead of being drained.

mod parse;
mod tagger;

pub use parse::{format_tag, is_admitted_kind, parse_tag_line, Tag};
pub use tagger::{
    locate_ctags, CtagsEngine, ScriptedRun, ScriptedTagEngine, StreamEvent, TagEngine, TagStream,
};

use super::ExtractionContext;
use crate::budget::TokenBudget;
use crate::core_types::{CategoryReport, ProcessedRecord, RecordKind, StopReason};
use crate::errors::Error;
use crate::scoring::{FileCategory, FileRecord};
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// Result of [`extract_symbols`].
#[derive(Debug)]
pub struct SymbolOutcome {
    /// One record per admitted file, in admission order.
    pub records: Vec<ProcessedRecord>,
    /// Accounting for the source category.
    pub report: CategoryReport,
    /// Index of the first file not yet settled.
    pub cursor: usize,
    /// Set when the tagger could not start or crashed without output.
    pub error: Option<Error>,
}

/// How a batch's output loop ended. Stops carry the first index not passed over.
enum BatchEnd {
    Drained,
    BudgetExhausted(usize),
    Cancelled(usize),
}

struct Group {
    index: usize,
    lines: Vec<String>,
}

/// Extracts `"<kind> <name>"` listings for already sorted source files.
///
/// Funds the source category once, then dispatches `batch_size` files at a
/// time starting at the cursor. Records committed before a budget stop,
/// cancellation or tagger failure are kept.
///
/// Groups are admitted in ranked order only: symbols for a file ranked
/// above the group in progress are dropped. A batch that admits no file
/// ends extraction even if files remain.
///
/// # Panics
/// Panics if `batch_size` is zero.
pub fn extract_symbols(
    ctx: &ExtractionContext<'_>,
    tagger: &dyn TagEngine,
    batch_size: usize,
    files: &[FileRecord],
    budget: &mut TokenBudget,
) -> SymbolOutcome {
    assert!(batch_size > 0, "batch size must be at least 1");

    budget.fund(FileCategory::Source);
    let mut outcome = SymbolOutcome {
        records: Vec::new(),
        report: CategoryReport::new(FileCategory::Source, files.len()),
        cursor: 0,
        error: None,
    };
    let mut settled: HashSet<usize> = HashSet::new();

    while outcome.cursor < files.len() {
        if ctx.token.is_cancelled() {
            outcome.report.stop_reason = StopReason::Cancelled;
            break;
        }

        let start = outcome.cursor;
        let batch_end = (start + batch_size).min(files.len());
        let absolute: Vec<PathBuf> = files[start..batch_end]
            .iter()
            .map(|f| ctx.root.join(&f.path))
            .collect();
        let lookup = path_lookup(&absolute, &files[start..batch_end], start);
        debug!(
            "Tagging files {}..{} of {} with {}.",
            start,
            batch_end,
            files.len(),
            tagger.program()
        );

        let mut stream = match tagger.run(&absolute) {
            Ok(stream) => stream,
            Err(e) => {
                warn!("{}", e);
                outcome.report.stop_reason = StopReason::TaggerFailed;
                outcome.error = Some(e);
                break;
            }
        };

        let admitted_before = outcome.report.admitted;
        let mut current: Option<Group> = None;
        let end = loop {
            let line = match stream.next_event(ctx.token) {
                StreamEvent::Line(line) => line,
                StreamEvent::End => break BatchEnd::Drained,
                StreamEvent::Cancelled => {
                    break BatchEnd::Cancelled(current.as_ref().map_or(start, |g| g.index))
                }
            };
            let Some(tag) = parse_tag_line(&line) else {
                if !line.trim().is_empty() {
                    debug!("Ignoring unparseable tagger line: {}", line);
                }
                continue;
            };
            if !is_admitted_kind(&tag.kind) {
                continue;
            }
            let Some(&index) = lookup.get(tag.path.as_str()) else {
                warn!("Tagger reported a file outside the batch: {}", tag.path);
                continue;
            };

            if let Some(group) = current.as_mut().filter(|g| g.index == index) {
                group.lines.push(format_tag(&tag));
                continue;
            }
            if settled.contains(&index) {
                warn!(
                    "Dropping late symbol '{}' for already finalized file {}.",
                    tag.name, files[index].path
                );
                continue;
            }
            if let Some(group) = current.as_ref().filter(|g| index < g.index) {
                warn!(
                    "Dropping out-of-order symbol '{}' for {}: {} is already being tagged.",
                    tag.name, files[index].path, files[group.index].path
                );
                continue;
            }
            if let Some(group) = current.take() {
                let finished = group.index;
                settled.insert(finished);
                if !admit(ctx, group, files, budget, &mut outcome) {
                    break BatchEnd::BudgetExhausted(finished);
                }
            }
            current = Some(Group {
                index,
                lines: vec![format_tag(&tag)],
            });
        };

        match end {
            BatchEnd::BudgetExhausted(stop) => {
                outcome.report.skipped += passed_over(start, stop, &outcome, admitted_before);
                outcome.report.stop_reason = StopReason::BudgetExhausted;
                break;
            }
            BatchEnd::Cancelled(stop) => {
                outcome.report.skipped += passed_over(start, stop, &outcome, admitted_before);
                outcome.report.stop_reason = StopReason::Cancelled;
                break;
            }
            BatchEnd::Drained => {}
        }

        if let Some(group) = current.take() {
            let finished = group.index;
            settled.insert(finished);
            if !admit(ctx, group, files, budget, &mut outcome) {
                outcome.report.skipped += passed_over(start, finished, &outcome, admitted_before);
                outcome.report.stop_reason = StopReason::BudgetExhausted;
                break;
            }
        }

        let admitted_in_batch = outcome.report.admitted - admitted_before;
        if let Some(status) = stream.finish() {
            if admitted_in_batch == 0 {
                let error = Error::TaggerFailed {
                    program: tagger.program().to_string(),
                    status,
                };
                warn!("{}", error);
                outcome.report.stop_reason = StopReason::TaggerFailed;
                outcome.error = Some(error);
                break;
            }
            warn!(
                "{} exited abnormally ({}) after producing symbols; keeping them.",
                tagger.program(),
                status
            );
        }

        outcome.report.skipped += (batch_end - start) - admitted_in_batch;
        outcome.cursor = batch_end;
        ctx.progress.advance_to(batch_end as u64);

        if admitted_in_batch == 0 {
            debug!("Batch at {} produced no symbols; stopping.", start);
            break;
        }
    }

    debug!(
        "Source extraction admitted {} of {} files ({}).",
        outcome.report.admitted,
        files.len(),
        outcome.report.stop_reason
    );
    outcome
}

/// Files in `start..stop` that were passed over without producing a record.
fn passed_over(
    start: usize,
    stop: usize,
    outcome: &SymbolOutcome,
    admitted_before: usize,
) -> usize {
    (stop - start).saturating_sub(outcome.report.admitted - admitted_before)
}

/// Prices a finished group and records it. Returns `false` if it was unaffordable.
fn admit(
    ctx: &ExtractionContext<'_>,
    group: Group,
    files: &[FileRecord],
    budget: &mut TokenBudget,
    outcome: &mut SymbolOutcome,
) -> bool {
    let file = &files[group.index];
    let content = group.lines.join("\n");
    let cost = ctx.counter.count(&content);
    if !budget.try_spend(cost) {
        debug!(
            "Budget exhausted at {} (needs {}, {} left).",
            file.path,
            cost,
            budget.remaining()
        );
        return false;
    }
    outcome.report.admitted += 1;
    outcome.report.tokens_spent += cost;
    outcome.cursor = group.index + 1;
    outcome.records.push(ProcessedRecord {
        path: file.path.clone(),
        kind: RecordKind::Source,
        content,
    });
    true
}

/// Maps both the absolute and the relative spelling of each batch path to its file index.
fn path_lookup(
    absolute: &[PathBuf],
    batch: &[FileRecord],
    offset: usize,
) -> HashMap<String, usize> {
    let mut lookup = HashMap::with_capacity(batch.len() * 2);
    for (i, (abs, file)) in absolute.iter().zip(batch).enumerate() {
        lookup.insert(abs.to_string_lossy().into_owned(), offset + i);
        lookup.entry(file.path.clone()).or_insert(offset + i);
    }
    lookup
}
