//! Defines application-specific error types.
//!
//! `Error` covers failures that abort a call (configuration, listing, the
//! external tagger). `FileReadError` is the per-file class that extractors
//! recover from locally by skipping the file.

use std::path::Path;
use thiserror::Error;

/// Errors that can be returned by the `sential` library.
#[derive(Error, Debug)]
pub enum Error {
    // --- I/O Errors ---
    /// Error occurring during file or directory access (read, write, metadata).
    #[error("I/O error accessing path '{path}': {source}")]
    Io {
        /// The path that caused the I/O error.
        path: String,
        /// The underlying `std::io::Error`.
        #[source]
        source: std::io::Error,
    },

    // --- Configuration Errors ---
    /// Invalid configuration settings or combinations.
    #[error(transparent)]
    Config(#[from] ConfigError),

    // --- External Collaborators ---
    /// The file-listing provider could not enumerate the repository.
    #[error("Failed to list repository files: {reason}")]
    Listing {
        /// Human-readable cause.
        reason: String,
    },

    /// The tagging process could not be started.
    #[error("Failed to start tagging process '{program}': {source}")]
    TaggerSpawn {
        /// The program that was invoked.
        program: String,
        /// The underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The tagging process exited abnormally before producing any usable output.
    #[error("Tagging process '{program}' terminated abnormally ({status}) without producing symbols")]
    TaggerFailed {
        /// The program that was invoked.
        program: String,
        /// Exit status description.
        status: String,
    },

    /// The tokenizer for the configured model could not be loaded.
    #[error("Failed to load tokenizer for model '{model}': {reason}")]
    Tokenizer {
        /// Requested model name.
        model: String,
        /// Cause reported by the tokenizer crate.
        reason: String,
    },

    /// A record could not be serialized to the output payload.
    #[error("Failed to serialize output: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Signal Handling ---
    /// The operation was cancelled by the user (e.g., Ctrl+C).
    #[error("Operation cancelled by user (Ctrl+C)")]
    Interrupted,

    /// No files of the selected language (or universal context files) were found.
    #[error("No relevant files found for the selected language.")]
    NoFilesFound,
}

/// Errors raised while validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An option has a value outside its accepted range.
    #[error("Invalid value for {option}: {reason}")]
    InvalidValue {
        /// The offending option.
        option: String,
        /// Why the value was rejected.
        reason: String,
    },
    /// Two options were given that cannot be combined.
    #[error("Conflicting options: {option1} cannot be used with {option2}")]
    Conflict {
        /// First option.
        option1: String,
        /// Second option.
        option2: String,
    },
}

/// Per-file read failures. These never abort a category; the file is skipped.
#[derive(Error, Debug)]
pub enum FileReadError {
    /// The file could not be opened or read.
    #[error("Failed to read file '{path}': {source}")]
    Io {
        /// Path of the file.
        path: String,
        /// The underlying `std::io::Error`.
        #[source]
        source: std::io::Error,
    },
    /// The file looks binary (null byte in its head).
    #[error("File '{path}' appears to be binary")]
    Binary {
        /// Path of the file.
        path: String,
    },
    /// The path exists but is not a regular file.
    #[error("'{path}' is not a regular file")]
    NotAFile {
        /// Path of the entry.
        path: String,
    },
}

/// A `Result` alias using the crate's `Error` type.
pub type Result<T> = std::result::Result<T, Error>;

/// Helper function to create an `Error::Io` with path context.
pub fn io_error_with_path<P: AsRef<Path>>(source: std::io::Error, path: P) -> Error {
    Error::Io {
        path: path.as_ref().display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{io, path::PathBuf};

    #[test]
    fn test_io_error_with_path_helper() {
        let path = PathBuf::from("some/test/path.txt");
        let source_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = io_error_with_path(source_error, &path);

        match error {
            Error::Io {
                path: error_path,
                source,
            } => {
                assert!(error_path.contains("some/test/path.txt"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            _ => panic!("Expected Error::Io"),
        }
    }

    #[test]
    fn test_tagger_errors_are_distinct_messages() {
        let spawn = Error::TaggerSpawn {
            program: "ctags".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        let failed = Error::TaggerFailed {
            program: "ctags".to_string(),
            status: "exit status: 2".to_string(),
        };
        assert!(spawn.to_string().contains("Failed to start"));
        assert!(failed.to_string().contains("terminated abnormally"));
        assert!(failed.to_string().contains("exit status: 2"));
    }

    #[test]
    fn test_config_error_converts_into_error() {
        let err: Error = ConfigError::InvalidValue {
            option: "--batch-size".to_string(),
            reason: "must be at least 1".to_string(),
        }
        .into();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(
            err.to_string(),
            "Invalid value for --batch-size: must be at least 1"
        );
    }
}
