//! Fixed mapping from data category to normalization component
//!
//! The upstream payload shape per data category is a closed contract, not
//! configuration: price history arrives as CSV text, dividends and insider
//! transactions as labeled tables flattened row-wise, the three financial
//! statements as labeled tables transposed period-wise, and technical
//! indicators as text reports. This module enforces that contract at the
//! library seam so the HTTP boundary only routes and serializes.

use serde::Serialize;

use super::{csv_records, indicator_report, statement, table_records};
use crate::app::models::{IndicatorReport, LabeledTable, PeriodStatement, RecordSequence};
use crate::{Error, Result};

/// Data categories served by the API boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataCategory {
    StockHistory,
    Dividends,
    InsiderTransactions,
    BalanceSheet,
    IncomeStatement,
    Cashflow,
    TechnicalIndicator,
}

impl DataCategory {
    /// Stable name for logs and error messages
    pub fn name(&self) -> &'static str {
        match self {
            DataCategory::StockHistory => "stock-history",
            DataCategory::Dividends => "dividends",
            DataCategory::InsiderTransactions => "insider-transactions",
            DataCategory::BalanceSheet => "balance-sheet",
            DataCategory::IncomeStatement => "income-statement",
            DataCategory::Cashflow => "cashflow",
            DataCategory::TechnicalIndicator => "technical-indicator",
        }
    }

    /// The payload shape this category accepts
    pub fn expected_shape(&self) -> &'static str {
        match self {
            DataCategory::StockHistory => "CSV text",
            DataCategory::Dividends | DataCategory::InsiderTransactions => "labeled table",
            DataCategory::BalanceSheet
            | DataCategory::IncomeStatement
            | DataCategory::Cashflow => "labeled table",
            DataCategory::TechnicalIndicator => "report text",
        }
    }
}

/// A raw upstream payload, tagged by shape
#[derive(Debug, Clone)]
pub enum Payload {
    Csv(String),
    Table(LabeledTable),
    Report(String),
}

impl Payload {
    fn shape_name(&self) -> &'static str {
        match self {
            Payload::Csv(_) => "CSV text",
            Payload::Table(_) => "labeled table",
            Payload::Report(_) => "report text",
        }
    }
}

/// A normalized structure ready for JSON serialization at the HTTP boundary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Normalized {
    Records(RecordSequence),
    Statement(PeriodStatement),
    Report(IndicatorReport),
}

impl Normalized {
    /// Whether the upstream returned no data; the boundary maps this to 404
    pub fn is_empty(&self) -> bool {
        match self {
            Normalized::Records(records) => records.is_empty(),
            Normalized::Statement(statement) => statement.is_empty(),
            Normalized::Report(report) => {
                report.header.is_empty()
                    && report.values.is_empty()
                    && report.description.is_empty()
            }
        }
    }
}

/// Normalize a payload according to its category's fixed component mapping
///
/// Handing a category a payload of the wrong shape is a caller bug and
/// surfaces as a payload shape error rather than a silent empty result.
pub fn normalize(category: DataCategory, payload: Payload) -> Result<Normalized> {
    match (category, &payload) {
        (DataCategory::StockHistory, Payload::Csv(text)) => {
            Ok(Normalized::Records(csv_records::parse_csv(text, true)?))
        }
        (DataCategory::Dividends | DataCategory::InsiderTransactions, Payload::Table(table)) => {
            Ok(Normalized::Records(table_records::convert(table)))
        }
        (
            DataCategory::BalanceSheet | DataCategory::IncomeStatement | DataCategory::Cashflow,
            Payload::Table(table),
        ) => Ok(Normalized::Statement(statement::transpose(table))),
        (DataCategory::TechnicalIndicator, Payload::Report(text)) => {
            Ok(Normalized::Report(indicator_report::parse_report(text)))
        }
        (category, payload) => Err(Error::payload_shape(
            category.name(),
            category.expected_shape(),
            payload.shape_name(),
        )),
    }
}
