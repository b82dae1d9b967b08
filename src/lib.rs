//! Market Normalizer Library
//!
//! A Rust library for reshaping heterogeneous financial market data into
//! stable, nested JSON structures suitable for API consumers.
//!
//! This library provides tools for:
//! - Parsing delimited price-history text with optional comment-line stripping
//!   and whole-column type inference
//! - Flattening labeled tables (dividends, insider transactions) into ordered
//!   record sequences with the row index materialized as a field
//! - Transposing financial statements (columns = reporting periods, rows =
//!   line items) into period-keyed nested mappings with explicit null handling
//! - Parsing semi-structured technical-indicator reports into structured
//!   {header, values, description} records
//!
//! All transformations are pure, synchronous functions with no shared state
//! and no I/O; they may be called concurrently without coordination.

pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod csv_records;
        pub mod dispatch;
        pub mod indicator_report;
        pub mod statement;
        pub mod table_records;
    }
}

// Re-export commonly used types
pub use app::models::{
    Cell, IndicatorReport, IndicatorValue, LabeledTable, PeriodStatement, Record, RecordSequence,
    Value,
};

/// Result type alias for normalization operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for normalization operations
///
/// Empty input is never an error: an upstream payload with no rows yields an
/// empty sequence or mapping, and translating "empty" into a not-found
/// response is the HTTP boundary's job. Likewise, a value that fails numeric
/// coercion falls back to its text form rather than erroring.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Malformed delimited text (missing header, field-count mismatch)
    #[error("tabular format error: {message}")]
    Format {
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Labeled table construction with inconsistent dimensions
    #[error("table shape error: {message}")]
    Shape { message: String },

    /// A data category was handed a payload of the wrong shape
    #[error("payload shape error: category '{category}' expects {expected}, got {found}")]
    PayloadShape {
        category: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

impl Error {
    /// Create a tabular format error with optional CSV source
    pub fn format(message: impl Into<String>, source: Option<csv::Error>) -> Self {
        Self::Format {
            message: message.into(),
            source,
        }
    }

    /// Create a table shape error
    pub fn shape(message: impl Into<String>) -> Self {
        Self::Shape {
            message: message.into(),
        }
    }

    /// Create a payload shape error
    pub fn payload_shape(
        category: &'static str,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Self::PayloadShape {
            category,
            expected,
            found,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::Format {
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}
