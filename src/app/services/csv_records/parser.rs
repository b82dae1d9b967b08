//! Core delimited-text parsing orchestration
//!
//! Strips comment lines when asked, reads the header and data rows with a
//! strict field-count contract, infers column types, and assembles ordered
//! records.

use csv::ReaderBuilder;
use tracing::{debug, info};

use super::typing::{coerce_cell, infer_column_types};
use crate::app::models::{Record, RecordSequence};
use crate::constants::COMMENT_PREFIX;
use crate::{Error, Result};

/// Parse delimited text into an ordered sequence of typed records
///
/// The first non-comment line is the header; columns are named exactly as the
/// header spells them. With `strip_comment_lines` set, every line whose first
/// character is `#` is removed before delimiter parsing, regardless of where
/// it appears. Zero data rows yield an empty sequence.
///
/// Fails with a format error when no header row remains after stripping or
/// when a row's field count differs from the header's.
pub fn parse_csv(raw_text: &str, strip_comment_lines: bool) -> Result<RecordSequence> {
    let text = if strip_comment_lines {
        strip_comments(raw_text)
    } else {
        raw_text.to_string()
    };

    if text.trim().is_empty() {
        return Err(Error::format(
            "no header row after comment stripping",
            None,
        ));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| Error::format("failed to read CSV header row", Some(e)))?
        .clone();

    let mut raw_rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| {
            let message = match e.kind() {
                csv::ErrorKind::UnequalLengths {
                    expected_len, len, ..
                } => format!(
                    "row field count {} differs from header field count {}",
                    len, expected_len
                ),
                _ => "malformed delimited text".to_string(),
            };
            Error::format(message, Some(e))
        })?;
        raw_rows.push(record);
    }

    let column_types = infer_column_types(&raw_rows, headers.len());
    debug!("inferred column types: {:?}", column_types);

    let records: RecordSequence = raw_rows
        .iter()
        .map(|row| {
            let mut record = Record::with_capacity(headers.len());
            for (column, name) in headers.iter().enumerate() {
                let raw = row.get(column).unwrap_or("");
                record.insert(name, coerce_cell(raw, column_types[column]));
            }
            record
        })
        .collect();

    info!(
        "parsed {} records across {} columns",
        records.len(),
        headers.len()
    );

    Ok(records)
}

/// Remove every line whose first character is the comment prefix
///
/// Removal is unconditional on line content, not position: a `#` line in the
/// middle of the data section is dropped the same as one above the header.
pub fn strip_comments(raw_text: &str) -> String {
    raw_text
        .split('\n')
        .filter(|line| !line.starts_with(COMMENT_PREFIX))
        .collect::<Vec<_>>()
        .join("\n")
}
