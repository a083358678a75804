// src/output/jsonl.rs

use crate::core_types::ProcessedRecord;
use crate::errors::{io_error_with_path, Result};
use std::io::Write;

/// Writes one JSON object per record, one record per line, in the given order.
///
/// ```
/// use sential::core_types::{ProcessedRecord, RecordKind};
/// use sential::output::jsonl::write_records;
///
/// let records = vec![ProcessedRecord {
///     path: "README.md".to_string(),
///     kind: RecordKind::Context,
///     content: "# Demo".to_string(),
/// }];
/// let mut out = Vec::new();
/// write_records(&mut out, &records).unwrap();
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     "{\"path\":\"README.md\",\"type\":\"context_file\",\"content\":\"# Demo\"}\n"
/// );
/// ```
pub fn write_records(writer: &mut dyn Write, records: &[ProcessedRecord]) -> Result<()> {
    for record in records {
        serde_json::to_writer(&mut *writer, record)?;
        writer
            .write_all(b"\n")
            .map_err(|e| io_error_with_path(e, "<output>"))?;
    }
    log::debug!("Wrote {} records.", records.len());
    Ok(())
}
