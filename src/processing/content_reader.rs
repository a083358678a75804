// src/processing/content_reader.rs

use super::text_detection::is_likely_text;
use crate::errors::FileReadError;
use std::{fs, path::Path};

/// Reads a file as text, rejecting anything that is not text.
///
/// Closures of the shape `Fn(&Path) -> Result<String, FileReadError>` implement
/// this trait, so tests can serve content from memory.
pub trait FileReader {
    /// Returns the file's text or the reason it cannot be used.
    fn read_text(&self, path: &Path) -> Result<String, FileReadError>;
}

impl<F> FileReader for F
where
    F: Fn(&Path) -> Result<String, FileReadError>,
{
    fn read_text(&self, path: &Path) -> Result<String, FileReadError> {
        self(path)
    }
}

/// Reads files from the local filesystem.
///
/// Files whose first bytes contain a null byte are reported as
/// [`FileReadError::Binary`]. Invalid UTF-8 further in is replaced lossily.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFileReader;

impl FileReader for FsFileReader {
    fn read_text(&self, path: &Path) -> Result<String, FileReadError> {
        let display = || path.display().to_string();
        let metadata = fs::metadata(path).map_err(|source| FileReadError::Io {
            path: display(),
            source,
        })?;
        if !metadata.is_file() {
            return Err(FileReadError::NotAFile { path: display() });
        }

        let bytes = fs::read(path).map_err(|source| FileReadError::Io {
            path: display(),
            source,
        })?;
        if !is_likely_text(&bytes) {
            return Err(FileReadError::Binary { path: display() });
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_read_valid_file() -> Result<()> {
        let temp = tempdir()?;
        let file_path = temp.path().join("README.md");
        fs::write(&file_path, "# Hello, sential!")?;

        let content = FsFileReader.read_text(&file_path)?;
        assert_eq!(content, "# Hello, sential!");
        Ok(())
    }

    #[test]
    fn test_read_empty_file() -> Result<()> {
        let temp = tempdir()?;
        let file_path = temp.path().join("empty.txt");
        fs::write(&file_path, "")?;

        assert_eq!(FsFileReader.read_text(&file_path)?, "");
        Ok(())
    }

    #[test]
    fn test_binary_file_is_rejected() -> Result<()> {
        let temp = tempdir()?;
        let file_path = temp.path().join("logo.png");
        fs::write(&file_path, b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR")?;

        let err = FsFileReader.read_text(&file_path).unwrap_err();
        assert!(matches!(err, FileReadError::Binary { .. }));
        Ok(())
    }

    #[test]
    fn test_directory_is_not_a_file() -> Result<()> {
        let temp = tempdir()?;
        let err = FsFileReader.read_text(temp.path()).unwrap_err();
        assert!(matches!(err, FileReadError::NotAFile { .. }));
        Ok(())
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = Path::new("non_existent_file_for_sential_test.txt");
        let err = FsFileReader.read_text(path).unwrap_err();
        assert!(matches!(err, FileReadError::Io { .. }));
        assert!(err.to_string().contains("non_existent_file_for_sential_test.txt"));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() -> Result<()> {
        let temp = tempdir()?;
        let file_path = temp.path().join("latin1.txt");
        fs::write(&file_path, [b'c', b'a', b'f', 0xE9])?;

        let content = FsFileReader.read_text(&file_path)?;
        assert!(content.starts_with("caf"));
        Ok(())
    }
}
