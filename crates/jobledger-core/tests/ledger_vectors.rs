//! Ledger fixture tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;

use jobledger_core::ledger::{Ledger, LEDGER_HEADER};
use jobledger_core::record::MetricRecord;
use jobledger_core::LedgerError;

fn load(name: &str) -> Vec<u8> {
    fs::read(format!("tests/vectors/{name}")).unwrap()
}

#[test]
fn parse_accuracy_fixture() {
    let ledger = Ledger::from_bytes(&load("ledger_accuracy.csv")).unwrap();
    assert_eq!(ledger.len(), 4);
    let row = &ledger.rows()[2];
    assert_eq!(row.job_name, "knn-2024-02-01");
    assert_eq!(row.metric_name, "accuracy");
    assert_eq!(row.value, "0.7");
    assert_eq!(row.timestamp, "1706745600.0");
}

#[test]
fn existing_rows_survive_rerender_verbatim() {
    let raw = load("ledger_accuracy.csv");
    let ledger = Ledger::from_bytes(&raw).unwrap();
    assert_eq!(ledger.render().as_bytes(), raw.as_slice());
}

#[test]
fn crlf_and_quoted_fixture() {
    let ledger = Ledger::from_bytes(&load("ledger_crlf.csv")).unwrap();
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger.rows()[1].job_name, "knn,quoted");
    assert_eq!(ledger.rows()[1].value_f64(), Some(0.64));
}

#[test]
fn short_row_fixture_is_rejected() {
    match Ledger::from_bytes(&load("ledger_short_row.csv")) {
        Err(LedgerError::MalformedLedger { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected malformed ledger, got {other:?}"),
    }
}

#[test]
fn append_then_reread_preserves_order() {
    let mut ledger = Ledger::from_bytes(&load("ledger_accuracy.csv")).unwrap();
    let new_rows = [
        MetricRecord {
            job_name: "knn-2024-04-01".into(),
            metric_name: "accuracy".into(),
            value: 0.8,
            timestamp: 1711929600.0,
        },
        MetricRecord {
            job_name: "knn-2024-04-01".into(),
            metric_name: "loss".into(),
            value: 0.31,
            timestamp: 1711929600.0,
        },
    ];
    for r in &new_rows {
        ledger.append(r);
    }

    let bytes = ledger.to_bytes();
    let text = std::str::from_utf8(&bytes).unwrap();
    assert!(text.starts_with(&LEDGER_HEADER.join(",")));

    let back = Ledger::from_bytes(&bytes).unwrap();
    assert_eq!(back, ledger);
    assert_eq!(back.len(), 6);

    let tail: Vec<(&str, &str)> = back.rows()[4..]
        .iter()
        .map(|r| (r.metric_name.as_str(), r.value.as_str()))
        .collect();
    assert_eq!(tail, vec![("accuracy", "0.8"), ("loss", "0.31")]);
}
