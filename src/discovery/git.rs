use super::FileLister;
use crate::cancellation::CancellationToken;
use crate::errors::{Error, Result};
use log::debug;
use std::path::Path;
use std::process::{Command, Stdio};

/// Lists tracked and untracked-but-not-ignored files with `git ls-files`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitLister;

impl FileLister for GitLister {
    fn list(&self, root: &Path, token: &CancellationToken) -> Result<Vec<String>> {
        let output = Command::new("git")
            .args(["ls-files", "-z", "--cached", "--others", "--exclude-standard"])
            .current_dir(root)
            .stdin(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| Error::Listing {
                reason: format!("could not run git: {}", e),
            })?;

        if token.is_cancelled() {
            return Err(Error::Interrupted);
        }
        if !output.status.success() {
            return Err(Error::Listing {
                reason: format!(
                    "git ls-files failed ({}): {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let files: Vec<String> = output
            .stdout
            .split(|b| *b == 0)
            .filter(|entry| !entry.is_empty())
            .map(|entry| String::from_utf8_lossy(entry).into_owned())
            .collect();
        debug!("git ls-files returned {} paths.", files.len());
        Ok(files)
    }
}

/// True if `root` is inside a git work tree.
pub fn is_git_repo(root: &Path) -> bool {
    Command::new("git")
        .args(["rev-parse", "--is-inside-work-tree"])
        .current_dir(root)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map(|out| out.status.success() && out.stdout.starts_with(b"true"))
        .unwrap_or(false)
}
