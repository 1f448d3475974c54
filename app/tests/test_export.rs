//! FILENAME: tests/test_export.rs
//! Integration tests for the export commands: the paginated PDF pipeline
//! end to end, the in-flight rejection and the CSV escape hatch.

mod common;

use std::sync::atomic::Ordering;

use app_lib::{
    export_report_pdf, export_table_csv, set_display_mode, toggle_filter, TabKey,
};
use common::{SalesFixture, TestHarness};
use report_engine::DisplayMode;

#[test]
fn pdf_export_names_the_artifact_from_tab_and_range() {
    let harness = TestHarness::with_sales_data();
    let artifact = export_report_pdf(&harness.state, TabKey::Sales).unwrap();

    assert_eq!(
        artifact.filename,
        "terroir-report-sales-2024-05-01_to_2024-05-31.pdf"
    );
    assert!(artifact.bytes.starts_with(b"%PDF"));

    // The artifact is plain bytes the host can persist anywhere.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(&artifact.filename);
    std::fs::write(&path, &artifact.bytes).unwrap();
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}

#[test]
fn large_tables_paginate_without_truncation() {
    let harness = TestHarness::with_sales_data();
    harness.load_rows(TabKey::Sales, SalesFixture::many_rows(160));

    let artifact = export_report_pdf(&harness.state, TabKey::Sales).unwrap();
    let text = String::from_utf8_lossy(&artifact.bytes);
    // 160 rows at 28 css px each cannot fit one A4 content page at the
    // default capture scale; the document must carry several pages.
    let pages = text
        .match_indices("/Count ")
        .next()
        .map(|(i, _)| text[i + 7..].chars().take_while(|c| c.is_ascii_digit()).collect::<String>())
        .unwrap();
    assert!(pages.parse::<u32>().unwrap() > 1, "expected a multi-page artifact");
}

#[test]
fn second_export_is_rejected_while_one_is_in_flight() {
    let harness = TestHarness::with_sales_data();

    harness.state.export_in_flight.store(true, Ordering::SeqCst);
    let err = export_report_pdf(&harness.state, TabKey::Sales).unwrap_err();
    assert!(err.contains("in flight"));

    // Release and the export goes through, leaving the flag clear again.
    harness.state.export_in_flight.store(false, Ordering::SeqCst);
    export_report_pdf(&harness.state, TabKey::Sales).unwrap();
    assert!(!harness.state.export_in_flight.load(Ordering::SeqCst));
}

#[test]
fn csv_export_carries_the_filtered_table() {
    let harness = TestHarness::with_sales_data();
    toggle_filter(&harness.state, TabKey::Sales, "producers", "Ferme du Lac").unwrap();

    let artifact = export_table_csv(&harness.state, TabKey::Sales).unwrap();
    assert_eq!(
        artifact.filename,
        "terroir-report-sales-2024-05-01_to_2024-05-31.csv"
    );
    let csv = String::from_utf8(artifact.bytes).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Date,Produit,Producteur,Qté,Total");
    assert_eq!(lines.len(), 1 + 3);
    // The dual-producer row keeps both tags in one quoted cell.
    assert!(csv.contains("\"Ferme du Lac, Rucher des Prés\""));
}

#[test]
fn chart_only_tabs_refuse_the_csv_export() {
    let harness = TestHarness::with_sales_data();
    set_display_mode(&harness.state, TabKey::Sales, DisplayMode::ChartOnly).unwrap();
    let err = export_table_csv(&harness.state, TabKey::Sales).unwrap_err();
    assert!(err.contains("not showing a table"));
}
