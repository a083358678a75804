//! Enumerates the repository files that feed the scorer.
//!
//! Inside a git work tree the index is authoritative (`git ls-files`), which
//! respects every ignore rule git knows about. Elsewhere the directory is
//! walked with the `ignore` crate, which honours `.gitignore` files on its own.
use crate::cancellation::CancellationToken;
use crate::errors::{Error, Result};
use log::debug;
use std::collections::HashSet;
use std::path::Path;

mod git;
mod walker;

pub use git::{is_git_repo, GitLister};
pub use walker::WalkLister;

/// Produces repository-relative file paths using `/` separators.
pub trait FileLister {
    /// Lists the files under `root`.
    ///
    /// # Errors
    /// Returns [`Error::Listing`] if the provider fails, or
    /// [`Error::Interrupted`] if `token` fires first.
    fn list(&self, root: &Path, token: &CancellationToken) -> Result<Vec<String>>;
}

/// Which provider enumerates the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingMode {
    /// Git when `root` is inside a work tree, otherwise a directory walk.
    #[default]
    Auto,
    /// Always `git ls-files`.
    Git,
    /// Always a `.gitignore`-aware directory walk.
    Walk,
}

/// Lists the files under `root` with the provider `mode` selects.
///
/// Duplicate paths are dropped, keeping the first occurrence.
///
/// # Examples
///
/// ```
/// use sential::discovery::{list_files, ListingMode};
/// use sential::CancellationToken;
/// # use std::fs;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dir = tempfile::tempdir()?;
/// fs::create_dir(dir.path().join("src"))?;
/// fs::write(dir.path().join("src/main.py"), "print('hi')")?;
/// fs::write(dir.path().join("README.md"), "# Demo")?;
///
/// let files = list_files(dir.path(), ListingMode::Walk, &CancellationToken::new())?;
/// assert_eq!(files, vec!["README.md", "src/main.py"]);
/// # Ok(())
/// # }
/// ```
pub fn list_files(root: &Path, mode: ListingMode, token: &CancellationToken) -> Result<Vec<String>> {
    if token.is_cancelled() {
        return Err(Error::Interrupted);
    }
    let use_git = match mode {
        ListingMode::Git => true,
        ListingMode::Walk => false,
        ListingMode::Auto => is_git_repo(root),
    };
    debug!(
        "Listing files under {} with {}.",
        root.display(),
        if use_git { "git" } else { "a directory walk" }
    );

    let paths = if use_git {
        GitLister.list(root, token)?
    } else {
        WalkLister::default().list(root, token)?
    };
    Ok(dedup_paths(paths))
}

/// Drops repeated paths, keeping the first occurrence and the original order.
pub fn dedup_paths(paths: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(paths.len());
    let before = paths.len();
    let unique: Vec<String> = paths
        .into_iter()
        .filter(|p| seen.insert(p.clone()))
        .collect();
    if unique.len() != before {
        debug!("Dropped {} duplicate path(s).", before - unique.len());
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let paths = vec![
            "b.py".to_string(),
            "a.py".to_string(),
            "b.py".to_string(),
        ];
        assert_eq!(dedup_paths(paths), vec!["b.py", "a.py"]);
    }

    #[test]
    fn test_cancelled_listing_is_interrupted() {
        let token = CancellationToken::new();
        token.cancel();
        let result = list_files(Path::new("."), ListingMode::Walk, &token);
        assert!(matches!(result, Err(Error::Interrupted)));
    }
}
