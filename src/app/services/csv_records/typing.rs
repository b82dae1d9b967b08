//! Whole-column type inference for delimited data
//!
//! A column's type is the strongest domain that covers every non-empty cell
//! in it: numeric, then boolean, then text. A column that cannot be uniformly
//! typed falls back to text for all its cells; that fallback is documented
//! behavior, not an error.

use crate::app::models::Value;
use csv::StringRecord;

/// Inferred value domain of one column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Number,
    Bool,
    Text,
}

/// Infer a type for each of `width` columns across all data rows
///
/// Empty cells are skipped during inference (they emit null regardless of the
/// column's type), so a single missing value does not demote an otherwise
/// numeric column. A column with no non-empty cells types as text.
pub fn infer_column_types(rows: &[StringRecord], width: usize) -> Vec<ColumnType> {
    (0..width)
        .map(|column| {
            let mut saw_value = false;
            let mut all_numeric = true;
            let mut all_bool = true;

            for row in rows {
                let cell = row.get(column).unwrap_or("").trim();
                if cell.is_empty() {
                    continue;
                }
                saw_value = true;
                if cell.parse::<f64>().is_err() {
                    all_numeric = false;
                }
                if !is_bool_literal(cell) {
                    all_bool = false;
                }
                if !all_numeric && !all_bool {
                    break;
                }
            }

            if !saw_value {
                ColumnType::Text
            } else if all_numeric {
                ColumnType::Number
            } else if all_bool {
                ColumnType::Bool
            } else {
                ColumnType::Text
            }
        })
        .collect()
}

/// Coerce one raw cell to its column's inferred type
///
/// An empty cell is null. A cell that fails coercion despite the column's
/// inferred type keeps its text form.
pub fn coerce_cell(raw: &str, column_type: ColumnType) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }

    match column_type {
        ColumnType::Number => match trimmed.parse::<f64>() {
            Ok(number) => Value::Number(number),
            Err(_) => Value::Text(raw.to_string()),
        },
        ColumnType::Bool => {
            if trimmed.eq_ignore_ascii_case("true") {
                Value::Bool(true)
            } else if trimmed.eq_ignore_ascii_case("false") {
                Value::Bool(false)
            } else {
                Value::Text(raw.to_string())
            }
        }
        ColumnType::Text => Value::Text(raw.to_string()),
    }
}

fn is_bool_literal(cell: &str) -> bool {
    cell.eq_ignore_ascii_case("true") || cell.eq_ignore_ascii_case("false")
}
