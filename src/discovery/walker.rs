use super::FileLister;
use crate::cancellation::CancellationToken;
use crate::errors::{Error, Result};
use crossbeam_channel::unbounded;
use ignore::{WalkBuilder, WalkState};
use log::{debug, warn};
use std::path::Path;

/// Walks the directory tree in parallel, honouring `.gitignore` rules.
///
/// Hidden files are included (several context files are dotfiles), but the
/// `.git` directory itself is never entered. Results are sorted so repeated
/// runs see the same order.
#[derive(Debug, Clone)]
pub struct WalkLister {
    /// Apply `.gitignore`, `.ignore` and global git excludes.
    pub use_gitignore: bool,
}

impl Default for WalkLister {
    fn default() -> Self {
        Self {
            use_gitignore: true,
        }
    }
}

impl WalkLister {
    fn builder(&self, root: &Path) -> WalkBuilder {
        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(self.use_gitignore)
            .hidden(false)
            // Apply .gitignore files even when the tree is not a repository.
            .require_git(false)
            .filter_entry(|entry| entry.file_name() != ".git");
        debug!(
            "Configured walker for {} (gitignore: {}).",
            root.display(),
            self.use_gitignore
        );
        builder
    }
}

impl FileLister for WalkLister {
    fn list(&self, root: &Path, token: &CancellationToken) -> Result<Vec<String>> {
        if !root.is_dir() {
            return Err(Error::Listing {
                reason: format!("'{}' is not a directory", root.display()),
            });
        }

        let (tx, rx) = unbounded();
        let walker = self.builder(root).build_parallel();
        walker.run(|| {
            let tx = tx.clone();
            let token = token.clone();
            let root = root.to_path_buf();
            Box::new(move |entry_result| {
                if token.is_cancelled() {
                    return WalkState::Quit;
                }
                let entry = match entry_result {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!("Skipping unreadable entry: {}", e);
                        return WalkState::Continue;
                    }
                };
                if !entry.file_type().is_some_and(|t| t.is_file()) {
                    return WalkState::Continue;
                }
                if let Some(relative) = to_relative(&root, entry.path()) {
                    if tx.send(relative).is_err() {
                        return WalkState::Quit;
                    }
                }
                WalkState::Continue
            })
        });
        drop(tx);

        if token.is_cancelled() {
            return Err(Error::Interrupted);
        }

        let mut files: Vec<String> = rx.into_iter().collect();
        files.sort();
        debug!("Walk found {} files.", files.len());
        Ok(files)
    }
}

fn to_relative(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    (!joined.is_empty()).then_some(joined)
}
