//! Row-oriented conversion of labeled tables into record sequences
//!
//! Used for dividend and insider-transaction payloads: each table row becomes
//! one record, with the row index materialized as a leading field rather than
//! discarded. Timestamp cells are rendered as text on the way out; all other
//! cell types pass through unchanged.

use tracing::debug;

use crate::app::models::{LabeledTable, Record, RecordSequence};

/// Convert a labeled table into one record per row
///
/// The table's index becomes a regular field named after the index label, so
/// a consumer sees the same flat shape whether the upstream indexed by date
/// or by position. Output order equals input row order; an empty table yields
/// an empty sequence.
pub fn convert(table: &LabeledTable) -> RecordSequence {
    let records: RecordSequence = (0..table.row_count())
        .map(|row| {
            let mut record = Record::with_capacity(table.column_count() + 1);
            record.insert(table.index_label(), table.row_label(row).to_value());
            for column in 0..table.column_count() {
                record.insert(
                    table.column_label(column).label_text(),
                    table.cell(row, column).to_value(),
                );
            }
            record
        })
        .collect();

    debug!(
        "converted {} rows under index '{}'",
        records.len(),
        table.index_label()
    );
    records
}
