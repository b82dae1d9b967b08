//! Financial statement transposition
//!
//! Balance sheets, income statements, and cashflow statements arrive with
//! reporting periods as columns and line items as rows. Consumers want the
//! opposite nesting: a mapping from period to the period's line items. This
//! module performs that structural transpose with per-cell coercion and
//! explicit null handling; it does not validate any financial semantics.

use tracing::debug;

use crate::app::models::{LabeledTable, LineItemMap, PeriodStatement};

/// Transpose a statement table into a period-keyed nested mapping
///
/// Each original column becomes a top-level key (timestamp headers rendered
/// as text), each original row a nested key under it. Numeric cells emit as
/// floating-point numbers, text cells pass through unchanged, and a missing
/// or NaN cell emits exactly null, never zero or an error sentinel. An empty
/// table yields an empty mapping.
pub fn transpose(table: &LabeledTable) -> PeriodStatement {
    let mut statement = PeriodStatement::new();
    if table.is_empty() {
        return statement;
    }

    for column in 0..table.column_count() {
        let period = table.column_label(column).label_text();
        let mut items = LineItemMap::with_capacity(table.row_count());
        for row in 0..table.row_count() {
            items.insert(
                table.row_label(row).label_text(),
                table.cell(row, column).to_value(),
            );
        }
        statement.insert(period, items);
    }

    debug!(
        "transposed {} line items across {} periods",
        table.row_count(),
        statement.len()
    );
    statement
}
