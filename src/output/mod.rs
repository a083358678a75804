// src/output/mod.rs

//! Renders run results: the JSONL payload, the dry-run listing, and the stderr summary.

use crate::core_types::PipelineReport;
use crate::errors::{io_error_with_path, Result};
use log::debug;
use std::io::Write;

pub mod dry_run;
pub mod jsonl;
pub mod summary;
pub mod writer;

/// Writes the payload for a finished run and flushes the writer.
///
/// Records are emitted in the order the extractors admitted them, which is
/// category priority order and, within a category, significance order.
pub fn generate_output(report: &PipelineReport, writer: &mut dyn Write) -> Result<()> {
    debug!("Starting output generation...");
    jsonl::write_records(writer, &report.records)?;
    writer
        .flush()
        .map_err(|e| io_error_with_path(e, "<output>"))?;
    debug!("Output generation complete.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{ProcessedRecord, RecordKind};

    #[test]
    fn test_generate_output_keeps_emission_order() {
        let report = PipelineReport {
            records: vec![
                ProcessedRecord {
                    path: "README.md".to_string(),
                    kind: RecordKind::Context,
                    content: "intro".to_string(),
                },
                ProcessedRecord {
                    path: "pyproject.toml".to_string(),
                    kind: RecordKind::Manifest,
                    content: "[project]".to_string(),
                },
            ],
            ..Default::default()
        };
        let mut out = Vec::new();
        generate_output(&report, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let paths: Vec<String> = text
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                value["path"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(paths, vec!["README.md", "pyproject.toml"]);
    }
}
