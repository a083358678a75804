//! Classifies repository paths and ranks them by architectural significance.
//!
//! Scoring is a pure function of the path and the language profile: the same
//! inputs always produce the same category and score. Files are bucketed as:
//!
//! 1. **Context**: universal context files, anything starting with `readme`, any `.md`.
//! 2. **Manifest**: filename or extension listed in the profile's manifests.
//! 3. **Signal**: entry-point stem (`main`, `index`, ...) with a source extension.
//! 4. **Source**: any other file with a source extension.
//! 5. **Unknown**: everything else, never processed downstream.
//!
//! The base score per category is lowered by 5 points for every directory the
//! file sits under and by 100 more if any of those directories is in the
//! profile's ignore list. Negative scores are kept; they only sort lower.

mod profile;

pub use profile::{Language, LanguageProfile};

use crate::constants::{DEPTH_PENALTY, IGNORED_DIR_PENALTY, UNIVERSAL_CONTEXT_FILES};
use log::debug;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Classification bucket for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileCategory {
    /// Documentation and project-intent files, read in full.
    Context,
    /// Dependency and build manifests, read in full.
    Manifest,
    /// Entry points, read in full.
    Signal,
    /// Remaining source files, reduced to symbols.
    Source,
    /// Not relevant to the selected language.
    Unknown,
}

impl FileCategory {
    /// Categories in the order the pipeline processes them. `Unknown` is never processed.
    pub const PROCESSING_ORDER: [FileCategory; 4] = [
        FileCategory::Context,
        FileCategory::Manifest,
        FileCategory::Signal,
        FileCategory::Source,
    ];

    /// Score every file in this category starts from.
    pub fn base_score(self) -> i64 {
        match self {
            FileCategory::Context => 1000,
            FileCategory::Manifest => 80,
            FileCategory::Signal => 60,
            FileCategory::Source => 50,
            FileCategory::Unknown => 0,
        }
    }

    /// Lowercase label used in logs and summaries.
    pub fn label(self) -> &'static str {
        match self {
            FileCategory::Context => "context",
            FileCategory::Manifest => "manifest",
            FileCategory::Signal => "signal",
            FileCategory::Source => "source",
            FileCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One repository path with its derived name parts, category and score.
///
/// Built once by [`score_file`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Normalized relative path using `/` separators.
    pub path: String,
    /// Lowercase filename.
    pub name_lower: String,
    /// Lowercase filename without its extension.
    pub stem_lower: String,
    /// Lowercase extension including the dot, or empty.
    pub extension_lower: String,
    /// Number of directories above the file (a root-level file has depth 0).
    pub depth: usize,
    /// Lowercase names of every directory on the path.
    pub ancestor_dirs_lower: BTreeSet<String>,
    /// Assigned category.
    pub category: FileCategory,
    /// Significance score; higher is more important.
    pub score: i64,
}

/// Classifies `path` and computes its significance score.
///
/// ```
/// use sential::scoring::{score, FileCategory, Language};
///
/// let profile = Language::Python.profile();
/// assert_eq!(score("README.md", profile), (FileCategory::Context, 1000));
/// assert_eq!(score("docs/README.md", profile), (FileCategory::Context, 895));
/// assert_eq!(score("src/main.py", profile), (FileCategory::Signal, 55));
/// ```
pub fn score(path: &str, profile: &LanguageProfile) -> (FileCategory, i64) {
    let record = score_file(path, profile);
    (record.category, record.score)
}

/// Builds the full [`FileRecord`] for `path`.
pub fn score_file(path: &str, profile: &LanguageProfile) -> FileRecord {
    let normalized = normalize_path(path);
    let mut segments: Vec<&str> = normalized.split('/').collect();
    let name = segments.pop().unwrap_or_default();

    let name_lower = name.to_lowercase();
    let (stem_lower, extension_lower) = split_extension(&name_lower);
    let ancestor_dirs_lower: BTreeSet<String> =
        segments.iter().map(|s| s.to_lowercase()).collect();
    let depth = segments.len();

    let category = classify(&name_lower, &stem_lower, &extension_lower, profile);

    let mut score = category.base_score();
    score -= DEPTH_PENALTY * depth as i64;
    if ancestor_dirs_lower
        .iter()
        .any(|dir| profile.is_ignored_dir(dir))
    {
        score -= IGNORED_DIR_PENALTY;
    }

    FileRecord {
        path: normalized,
        name_lower,
        stem_lower,
        extension_lower,
        depth,
        ancestor_dirs_lower,
        category,
        score,
    }
}

fn classify(
    name_lower: &str,
    stem_lower: &str,
    extension_lower: &str,
    profile: &LanguageProfile,
) -> FileCategory {
    if UNIVERSAL_CONTEXT_FILES.contains(&name_lower)
        || name_lower.starts_with("readme")
        || extension_lower == ".md"
    {
        FileCategory::Context
    } else if profile.is_manifest(name_lower, extension_lower) {
        FileCategory::Manifest
    } else if profile.is_signal_stem(stem_lower) && profile.is_source_extension(extension_lower) {
        FileCategory::Signal
    } else if profile.is_source_extension(extension_lower) {
        FileCategory::Source
    } else {
        FileCategory::Unknown
    }
}

/// Converts separators to `/` and drops empty and `.` segments.
fn normalize_path(path: &str) -> String {
    path.trim()
        .replace('\\', "/")
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Splits a filename into stem and extension the way most path libraries do:
/// a leading dot is part of the stem, so `.cursorrules` has no extension.
fn split_extension(name: &str) -> (String, String) {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => {
            (name[..idx].to_string(), name[idx..].to_string())
        }
        _ => (name.to_string(), String::new()),
    }
}

/// Orders files by descending score, then ascending depth. The sort is stable.
pub fn sort_by_significance(files: &mut [FileRecord]) {
    files.sort_by(|a, b| b.score.cmp(&a.score).then(a.depth.cmp(&b.depth)));
}

/// Files grouped by category, each group in listing order.
#[derive(Debug, Clone, Default)]
pub struct CategorizedFiles {
    groups: BTreeMap<FileCategory, Vec<FileRecord>>,
}

impl CategorizedFiles {
    /// Files in `category`, or an empty slice.
    pub fn get(&self, category: FileCategory) -> &[FileRecord] {
        self.groups
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Removes and returns the files in `category`.
    pub fn take(&mut self, category: FileCategory) -> Vec<FileRecord> {
        self.groups.remove(&category).unwrap_or_default()
    }

    /// Number of files outside the `Unknown` bucket.
    pub fn relevant_count(&self) -> usize {
        self.groups
            .iter()
            .filter(|(category, _)| **category != FileCategory::Unknown)
            .map(|(_, files)| files.len())
            .sum()
    }

    /// Total number of files, including `Unknown`.
    pub fn total_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    fn push(&mut self, record: FileRecord) {
        self.groups.entry(record.category).or_default().push(record);
    }
}

/// Scores every path and groups the results by category.
///
/// Scoring runs in parallel; grouping preserves the input order within each category.
///
/// ```
/// use sential::scoring::{categorize_files, FileCategory, Language};
///
/// let paths = vec!["main.py".to_string(), "README.md".to_string(), "utils.py".to_string()];
/// let categorized = categorize_files(&paths, Language::Python.profile());
/// assert_eq!(categorized.get(FileCategory::Signal)[0].path, "main.py");
/// assert_eq!(categorized.get(FileCategory::Context)[0].path, "README.md");
/// assert_eq!(categorized.get(FileCategory::Source)[0].path, "utils.py");
/// ```
pub fn categorize_files(paths: &[String], profile: &LanguageProfile) -> CategorizedFiles {
    let records: Vec<FileRecord> = paths
        .par_iter()
        .map(|path| score_file(path, profile))
        .collect();

    let mut categorized = CategorizedFiles::default();
    for record in records {
        categorized.push(record);
    }
    debug!(
        "Categorized {} files, {} relevant.",
        categorized.total_count(),
        categorized.relevant_count()
    );
    categorized
}
