//! Data models for market data normalization
//!
//! This module contains the core data structures exchanged with the data-fetch
//! and HTTP-serialization collaborators: the tagged cell variant, ordered
//! record maps, the read-only labeled table, and the normalized output shapes.

use crate::constants::TIMESTAMP_TEXT_FORMAT;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// =============================================================================
// Cell and Value Variants
// =============================================================================

/// A single cell (or label) in a labeled table
///
/// Closed tagged variant replacing runtime type inspection of dynamically
/// typed cells: a cell is text, a number, a timestamp, or null. Labels use the
/// same variant because both row indexes (dividend dates) and column headers
/// (reporting periods) can be timestamps upstream.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Timestamp(DateTime<Utc>),
    Null,
}

impl Cell {
    /// Render this cell as label text for use as a JSON object key
    ///
    /// Timestamps render in the canonical datetime format; numbers render in
    /// their shortest form; null renders as the empty string (a null label
    /// never occurs in practice).
    pub fn label_text(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => format!("{}", n),
            Cell::Timestamp(ts) => ts.format(TIMESTAMP_TEXT_FORMAT).to_string(),
            Cell::Null => String::new(),
        }
    }

    /// Convert this cell into an output value
    ///
    /// Timestamps become their canonical text rendering, NaN collapses to
    /// null (a NaN cell means the value was missing upstream), everything
    /// else passes through unchanged.
    pub fn to_value(&self) -> Value {
        match self {
            Cell::Text(s) => Value::Text(s.clone()),
            Cell::Number(n) if n.is_nan() => Value::Null,
            Cell::Number(n) => Value::Number(*n),
            Cell::Timestamp(ts) => Value::Text(ts.format(TIMESTAMP_TEXT_FORMAT).to_string()),
            Cell::Null => Value::Null,
        }
    }

    /// Check whether this cell represents missing data
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Number(n) => n.is_nan(),
            _ => false,
        }
    }
}

/// An output value in a normalized record
///
/// Serializes untagged to the natural JSON scalar (string, number, boolean,
/// or null) and deserializes back, so a serialized record re-parses to an
/// equal structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Value {
    /// Numeric view of this value, if it is a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text view of this value, if it is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// =============================================================================
// Ordered Record Map
// =============================================================================

/// One flat, insertion-ordered field-to-value map representing a single row
///
/// Field order is the source table's column order; field names are assumed
/// unique within a record because the source columns are. Serializes as a
/// JSON object with fields in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record(Vec<(String, Value)>);

impl Record {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Append a field; insertion order is preserved on output
    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.0.push((field.into(), value));
    }

    /// Look up a field by name
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Field names in insertion order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, value) in &self.0 {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a JSON object of field-value pairs")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Record, A::Error> {
                let mut record = Record::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((field, value)) = access.next_entry::<String, Value>()? {
                    record.insert(field, value);
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

/// Ordered sequence of records, one per source row
pub type RecordSequence = Vec<Record>;

// =============================================================================
// Labeled Table
// =============================================================================

/// A rectangular grid with a named row index and labeled columns
///
/// Produced by the data-fetch collaborator; the normalization routines only
/// consume it through read-only accessors. Cells are row-major; dimensions
/// are validated at construction so the transforms can index without bounds
/// concern.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledTable {
    index_label: String,
    row_labels: Vec<Cell>,
    column_labels: Vec<Cell>,
    rows: Vec<Vec<Cell>>,
}

impl LabeledTable {
    /// Create a table, validating that dimensions are consistent
    pub fn new(
        index_label: impl Into<String>,
        row_labels: Vec<Cell>,
        column_labels: Vec<Cell>,
        rows: Vec<Vec<Cell>>,
    ) -> Result<Self> {
        if rows.len() != row_labels.len() {
            return Err(Error::shape(format!(
                "{} row labels but {} data rows",
                row_labels.len(),
                rows.len()
            )));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != column_labels.len() {
                return Err(Error::shape(format!(
                    "row '{}' has {} cells, expected {}",
                    row_labels[i].label_text(),
                    row.len(),
                    column_labels.len()
                )));
            }
        }

        Ok(Self {
            index_label: index_label.into(),
            row_labels,
            column_labels,
            rows,
        })
    }

    /// An empty table (zero rows, zero columns)
    pub fn empty() -> Self {
        Self {
            index_label: crate::constants::DEFAULT_INDEX_LABEL.to_string(),
            row_labels: Vec::new(),
            column_labels: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Name of the row index, materialized as a field by row conversion
    pub fn index_label(&self) -> &str {
        &self.index_label
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.column_labels.is_empty()
    }

    pub fn row_label(&self, row: usize) -> &Cell {
        &self.row_labels[row]
    }

    pub fn column_label(&self, column: usize) -> &Cell {
        &self.column_labels[column]
    }

    /// Cell lookup by (row, column) position
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        &self.rows[row][column]
    }
}

// =============================================================================
// Period Statement
// =============================================================================

/// Nested line-item map for a single reporting period
pub type LineItemMap = Record;

/// A financial statement keyed by reporting period
///
/// Insertion-ordered mapping from period label to the period's line items.
/// Period order is the source table's column order. Serializes as a JSON
/// object of objects.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PeriodStatement(Vec<(String, LineItemMap)>);

impl PeriodStatement {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a period; insertion order is preserved on output
    pub fn insert(&mut self, period: impl Into<String>, items: LineItemMap) {
        self.0.push((period.into(), items));
    }

    /// Look up a period's line items by label
    pub fn get(&self, period: &str) -> Option<&LineItemMap> {
        self.0
            .iter()
            .find(|(label, _)| label == period)
            .map(|(_, items)| items)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate periods in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LineItemMap)> {
        self.0.iter().map(|(label, items)| (label.as_str(), items))
    }
}

impl Serialize for PeriodStatement {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (period, items) in &self.0 {
            map.serialize_entry(period, items)?;
        }
        map.end()
    }
}

// =============================================================================
// Indicator Report
// =============================================================================

/// One dated entry from an indicator report
///
/// `date` always matches `YYYY-MM-DD`; `value` is a number unless the
/// upstream emitted a known non-numeric sentinel or text that fails numeric
/// parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorValue {
    pub date: String,
    pub value: Value,
}

/// Structured form of a semi-structured technical-indicator text report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorReport {
    /// Report header (text after the `##` marker; last marker wins)
    pub header: String,

    /// Dated values in report order
    pub values: Vec<IndicatorValue>,

    /// Trailing free-text commentary, lines joined with single spaces
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn record_preserves_insertion_order() {
        let mut record = Record::new();
        record.insert("Open", Value::Number(1.0));
        record.insert("High", Value::Number(3.0));
        record.insert("Close", Value::Number(2.0));

        let names: Vec<&str> = record.field_names().collect();
        assert_eq!(names, vec!["Open", "High", "Close"]);
        assert_eq!(record.get("High"), Some(&Value::Number(3.0)));
        assert_eq!(record.get("Volume"), None);
    }

    #[test]
    fn record_serializes_as_ordered_object() {
        let mut record = Record::new();
        record.insert("Close", Value::Number(2.5));
        record.insert("Note", Value::Text("split".to_string()));
        record.insert("Gap", Value::Null);

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"Close":2.5,"Note":"split","Gap":null}"#);
    }

    #[test]
    fn record_round_trips_through_json() {
        let mut record = Record::new();
        record.insert("Close", Value::Number(101.25));
        record.insert("Halted", Value::Bool(false));
        record.insert("Symbol", Value::Text("AAPL".to_string()));
        record.insert("Split", Value::Null);

        let json = serde_json::to_string(&record).unwrap();
        let parsed: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn value_serializes_untagged() {
        assert_eq!(serde_json::to_string(&Value::Null).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Value::Bool(true)).unwrap(), "true");
        assert_eq!(serde_json::to_string(&Value::Number(1.5)).unwrap(), "1.5");
        assert_eq!(
            serde_json::to_string(&Value::Text("x".to_string())).unwrap(),
            "\"x\""
        );
    }

    #[test]
    fn timestamp_cell_renders_canonically() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let cell = Cell::Timestamp(ts);
        assert_eq!(cell.label_text(), "2024-01-02 00:00:00");
        assert_eq!(
            cell.to_value(),
            Value::Text("2024-01-02 00:00:00".to_string())
        );
    }

    #[test]
    fn nan_cell_is_missing() {
        assert!(Cell::Number(f64::NAN).is_missing());
        assert!(Cell::Null.is_missing());
        assert!(!Cell::Number(0.0).is_missing());
        assert_eq!(Cell::Number(f64::NAN).to_value(), Value::Null);
    }

    #[test]
    fn labeled_table_rejects_ragged_rows() {
        let result = LabeledTable::new(
            "index",
            vec![Cell::Text("Revenue".to_string())],
            vec![
                Cell::Text("2024-03-31".to_string()),
                Cell::Text("2023-12-31".to_string()),
            ],
            vec![vec![Cell::Number(100.0)]],
        );
        assert!(matches!(result, Err(Error::Shape { .. })));
    }

    #[test]
    fn labeled_table_rejects_label_count_mismatch() {
        let result = LabeledTable::new(
            "index",
            vec![
                Cell::Text("Revenue".to_string()),
                Cell::Text("NetIncome".to_string()),
            ],
            vec![Cell::Text("2024-03-31".to_string())],
            vec![vec![Cell::Number(100.0)]],
        );
        assert!(matches!(result, Err(Error::Shape { .. })));
    }

    #[test]
    fn empty_table_has_no_rows_or_columns() {
        let table = LabeledTable::empty();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn period_statement_orders_and_serializes() {
        let mut items = LineItemMap::new();
        items.insert("Revenue", Value::Number(100.0));

        let mut statement = PeriodStatement::new();
        statement.insert("2024-03-31", items);

        assert_eq!(statement.len(), 1);
        let json = serde_json::to_string(&statement).unwrap();
        assert_eq!(json, r#"{"2024-03-31":{"Revenue":100.0}}"#);
    }
}
