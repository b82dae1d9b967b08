//! Delimited-text parser for price-history payloads
//!
//! This module converts raw CSV text from the upstream data provider into an
//! ordered sequence of typed records. The design keeps the upstream column
//! names exactly as delivered and infers each column's value domain across
//! all rows rather than per cell, so a column is uniformly numeric, boolean,
//! or text.
//!
//! ## Architecture
//!
//! - [`parser`] - Comment stripping, CSV orchestration, record assembly
//! - [`typing`] - Whole-column type inference and cell coercion

pub mod parser;
pub mod typing;

#[cfg(test)]
pub mod tests;

// Re-export main entry points for easy access
pub use parser::parse_csv;
pub use typing::ColumnType;
