//! Parser for semi-structured technical-indicator text reports
//!
//! The upstream emits reports of the form: a `##` header line, a run of
//! `date: value` lines, and trailing free-text commentary. Data lines and
//! commentary are disambiguated positionally: the first non-blank line that
//! is neither a header nor a value line latches the parser into description
//! mode, and nothing after that point is treated as a value line again, even
//! if it happens to look like one.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::app::models::{IndicatorReport, IndicatorValue, Value};
use crate::constants::NON_NUMERIC_SENTINELS;

static VALUE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2}):\s*(.+)$").expect("value-line pattern is valid")
});

/// Parser state: scanning dated values, or accumulating description text
///
/// The transition is a one-way latch, never a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    ScanningValues,
    InDescription,
}

/// Parse an indicator text report into its structured form
///
/// Blank lines are ignored. A `##` line sets the header wherever it appears;
/// the last one wins. Malformed input never errors: text with no
/// recognizable lines produces an empty header and values with everything
/// folded into the description.
pub fn parse_report(text: &str) -> IndicatorReport {
    let mut header = String::new();
    let mut values = Vec::new();
    let mut description = String::new();
    let mut state = ParseState::ScanningValues;

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with("##") {
            header = line.trim_start_matches('#').trim().to_string();
            continue;
        }

        match state {
            ParseState::ScanningValues => {
                if let Some(captures) = VALUE_LINE.captures(line) {
                    let date = captures[1].to_string();
                    let raw_value = captures[2].trim();
                    values.push(IndicatorValue {
                        date,
                        value: parse_value(raw_value),
                    });
                } else {
                    debug!("entering description mode at line: {}", line);
                    state = ParseState::InDescription;
                    description.push_str(line);
                    description.push(' ');
                }
            }
            ParseState::InDescription => {
                description.push_str(line);
                description.push(' ');
            }
        }
    }

    IndicatorReport {
        header,
        values,
        description: description.trim_end().to_string(),
    }
}

/// Interpret a value line's payload as a number or keep it as text
///
/// A payload exactly matching one of the recognized non-numeric sentinels is
/// kept as text without a parse attempt; any other payload that fails
/// numeric parsing falls back to text.
fn parse_value(raw: &str) -> Value {
    if NON_NUMERIC_SENTINELS.contains(&raw) {
        return Value::Text(raw.to_string());
    }
    match raw.parse::<f64>() {
        Ok(number) => Value::Number(number),
        Err(_) => Value::Text(raw.to_string()),
    }
}
