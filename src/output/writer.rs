// src/output/writer.rs

//! Manages the output destination (stdout or a file).

use crate::config::OutputDestination;
use crate::errors::{io_error_with_path, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Opens the configured destination for writing.
///
/// Files are created (or truncated) and wrapped in a `BufWriter`; the caller
/// is responsible for flushing once everything is written.
///
/// # Errors
/// Returns `Error::Io` if the output file cannot be created.
pub fn open_writer(destination: &OutputDestination) -> Result<Box<dyn Write + Send>> {
    let writer: Box<dyn Write + Send> = match destination {
        OutputDestination::Stdout => Box::new(BufWriter::new(io::stdout())),
        OutputDestination::File(path) => {
            let file = File::create(path).map_err(|e| io_error_with_path(e, path))?;
            Box::new(BufWriter::new(file))
        }
    };
    Ok(writer)
}

/// Flushes the writer, attributing failures to the destination.
pub fn finalize_output(
    mut writer: Box<dyn Write + Send>,
    destination: &OutputDestination,
) -> Result<()> {
    writer.flush().map_err(|e| match destination {
        OutputDestination::File(path) => io_error_with_path(e, path),
        OutputDestination::Stdout => io_error_with_path(e, "<stdout>"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_file_destination_is_written_on_finalize() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("out.jsonl");
        let destination = OutputDestination::File(path.clone());

        let mut writer = open_writer(&destination)?;
        writer.write_all(b"{}\n")?;
        finalize_output(writer, &destination)?;

        assert_eq!(fs::read_to_string(&path)?, "{}\n");
        Ok(())
    }

    #[test]
    fn test_uncreatable_file_is_io_error() {
        let dir = tempdir().unwrap();
        let destination = OutputDestination::File(dir.path().join("missing").join("out.jsonl"));
        match open_writer(&destination) {
            Err(Error::Io { path, .. }) => assert!(path.ends_with("out.jsonl")),
            Err(other) => panic!("expected Error::Io, got {:?}", other),
            Ok(_) => panic!("expected Error::Io"),
        }
    }
}
