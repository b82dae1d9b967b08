//! Integration tests exercising the normalization pipeline end to end:
//! raw upstream payloads in, JSON-ready structures out.

use chrono::{TimeZone, Utc};
use market_normalizer::app::services::csv_records::parse_csv;
use market_normalizer::app::services::dispatch::{normalize, DataCategory, Normalized, Payload};
use market_normalizer::app::services::indicator_report::parse_report;
use market_normalizer::app::services::statement::transpose;
use market_normalizer::app::services::table_records::convert;
use market_normalizer::{Cell, LabeledTable, Record, Value};

fn statement_table() -> LabeledTable {
    LabeledTable::new(
        "index",
        vec![
            Cell::Text("Revenue".to_string()),
            Cell::Text("NetIncome".to_string()),
            Cell::Text("TotalDebt".to_string()),
        ],
        vec![
            Cell::Timestamp(Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap()),
            Cell::Timestamp(Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap()),
        ],
        vec![
            vec![Cell::Number(9.06e10), Cell::Number(1.19e11)],
            vec![Cell::Number(2.36e10), Cell::Null],
            vec![Cell::Number(f64::NAN), Cell::Number(1.08e11)],
        ],
    )
    .unwrap()
}

#[test]
fn price_history_csv_to_json() {
    let csv = "# Price data fetched from provider\n\
               Date,Open,High,Low,Close,Volume\n\
               2024-01-02,187.15,188.44,183.89,185.64,82488700\n\
               2024-01-03,184.22,185.88,183.43,184.25,58414500\n";

    let records = parse_csv(csv, true).unwrap();
    assert_eq!(records.len(), 2);

    let json = serde_json::to_value(&records).unwrap();
    assert_eq!(json[0]["Date"], "2024-01-02");
    assert_eq!(json[0]["Close"], 185.64);
    assert_eq!(json[1]["Volume"], 58414500.0);
}

#[test]
fn serialized_records_reparse_equal() {
    let csv = "Date,Close,Note\n2024-01-02,185.64,ok\n2024-01-03,,holiday\n";
    let records = parse_csv(csv, false).unwrap();

    let json = serde_json::to_string(&records).unwrap();
    let reparsed: Vec<Record> = serde_json::from_str(&json).unwrap();

    assert_eq!(reparsed.len(), records.len());
    for (original, round_tripped) in records.iter().zip(&reparsed) {
        for ((name_a, value_a), (name_b, value_b)) in original.iter().zip(round_tripped.iter()) {
            assert_eq!(name_a, name_b);
            match (value_a, value_b) {
                (Value::Number(a), Value::Number(b)) => assert!((a - b).abs() < 1e-9),
                (a, b) => assert_eq!(a, b),
            }
        }
    }
}

#[test]
fn comment_stripping_is_equivalent_to_pre_stripped_input() {
    let commented = "#header note\nOpen,Close\n1.0,2.0\n#interleaved\n3.0,4.0\n";
    let stripped: String = commented
        .split('\n')
        .filter(|line| !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");

    assert_eq!(
        parse_csv(commented, true).unwrap(),
        parse_csv(&stripped, false).unwrap()
    );
}

#[test]
fn converted_row_count_matches_table() {
    let table = LabeledTable::new(
        "Date",
        vec![
            Cell::Text("2024-02-09".to_string()),
            Cell::Text("2024-05-10".to_string()),
            Cell::Text("2024-08-12".to_string()),
        ],
        vec![Cell::Text("Dividends".to_string())],
        vec![
            vec![Cell::Number(0.24)],
            vec![Cell::Number(0.25)],
            vec![Cell::Number(0.25)],
        ],
    )
    .unwrap();

    assert_eq!(convert(&table).len(), table.row_count());
    assert_eq!(transpose(&table).len(), table.column_count());
}

#[test]
fn statement_transpose_preserves_nulls_in_json() {
    let statement = transpose(&statement_table());
    let json = serde_json::to_value(&statement).unwrap();

    assert_eq!(json["2024-03-31 00:00:00"]["Revenue"], 9.06e10);
    assert!(json["2024-03-31 00:00:00"]["TotalDebt"].is_null());
    assert!(json["2023-12-31 00:00:00"]["NetIncome"].is_null());

    // Key sets come 1:1 from the source table
    let periods = json.as_object().unwrap();
    assert_eq!(periods.len(), 2);
    for (_, items) in periods {
        assert_eq!(items.as_object().unwrap().len(), 3);
    }
}

#[test]
fn empty_table_normalizes_to_empty_shapes() {
    let table = LabeledTable::empty();
    assert!(convert(&table).is_empty());
    assert!(transpose(&table).is_empty());

    let json = serde_json::to_value(transpose(&table)).unwrap();
    assert_eq!(json, serde_json::json!({}));
}

#[test]
fn indicator_report_end_to_end() {
    let text = "##RSI values\n\
                \n\
                2024-01-02: 55.3\n\
                2024-01-03: N/A\n\
                Some trailing note.";

    let report = parse_report(text);
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["header"], "RSI values");
    assert_eq!(json["values"][0]["date"], "2024-01-02");
    assert_eq!(json["values"][0]["value"], 55.3);
    assert_eq!(json["values"][1]["value"], "N/A");
    assert_eq!(json["description"], "Some trailing note.");
}

#[test]
fn latch_keeps_late_value_lines_in_description() {
    let text = "2024-01-02: 55.3\nNote: values resume below.\n2024-01-03: 60.1\n2024-01-04: 61.0";
    let report = parse_report(text);

    assert_eq!(report.values.len(), 1);
    for value in &report.values {
        assert_eq!(value.date, "2024-01-02");
    }
    assert!(report.description.contains("2024-01-03: 60.1"));
    assert!(report.description.contains("2024-01-04: 61.0"));
}

#[test]
fn dispatch_covers_every_category() {
    let csv_payload = Payload::Csv("Open,Close\n1.0,2.0\n".to_string());
    assert!(matches!(
        normalize(DataCategory::StockHistory, csv_payload).unwrap(),
        Normalized::Records(_)
    ));

    for category in [
        DataCategory::BalanceSheet,
        DataCategory::IncomeStatement,
        DataCategory::Cashflow,
    ] {
        let normalized = normalize(category, Payload::Table(statement_table())).unwrap();
        assert!(matches!(normalized, Normalized::Statement(_)));
    }

    for category in [DataCategory::Dividends, DataCategory::InsiderTransactions] {
        let normalized = normalize(category, Payload::Table(statement_table())).unwrap();
        assert!(matches!(normalized, Normalized::Records(_)));
    }

    let report_payload = Payload::Report("##ATR values\n2024-01-02: 3.1".to_string());
    assert!(matches!(
        normalize(DataCategory::TechnicalIndicator, report_payload).unwrap(),
        Normalized::Report(_)
    ));
}

#[test]
fn empty_upstream_data_is_empty_not_error() {
    let normalized = normalize(
        DataCategory::StockHistory,
        Payload::Csv("Open,Close\n".to_string()),
    )
    .unwrap();
    assert!(normalized.is_empty());

    let normalized = normalize(
        DataCategory::Cashflow,
        Payload::Table(LabeledTable::empty()),
    )
    .unwrap();
    assert!(normalized.is_empty());
}
