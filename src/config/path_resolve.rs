// src/config/path_resolve.rs

use crate::errors::{io_error_with_path, Error, Result};
use std::path::PathBuf;

/// Resolves the repository root to an absolute, canonicalized directory.
///
/// # Errors
/// Returns [`Error::Io`] if the path does not exist and [`Error::Listing`] if it
/// is not a directory.
pub fn resolve_root(input_path: &str) -> Result<PathBuf> {
    let resolved = PathBuf::from(input_path)
        .canonicalize()
        .map_err(|e| io_error_with_path(e, input_path))?;
    if !resolved.is_dir() {
        return Err(Error::Listing {
            reason: format!("'{}' is not a directory", input_path),
        });
    }
    Ok(resolved)
}
