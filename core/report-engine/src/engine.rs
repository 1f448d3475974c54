//! FILENAME: core/report-engine/src/engine.rs
//! Report Engine - composes filtered rows into the tab's ReportView.
//!
//! Every number on the surface comes from the SAME filtered row set: KPIs,
//! chart series and table are always mutually consistent, whether or not a
//! column filter is active.

use rustc_hash::FxHashSet;

use filter_engine::{apply, FilterState};
use rollup_engine::{field_number, field_text, field_values, rollup, Bucket, SourceRow};

use crate::definition::{DisplayMode, KpiKind, KpiSpec, TabSpec, TablePage};
use crate::view::{format_cell_number, format_kpi, KpiValue, ReportView, TableView};

/// Builds the ReportView for one tab from the fetched row window.
pub fn build_report(
    rows: &[SourceRow],
    spec: &TabSpec,
    filters: &FilterState,
    bucket: Bucket,
    mode: DisplayMode,
    table_page: TablePage,
    subtitle: &str,
) -> ReportView {
    let filtered = apply(rows, filters);

    let kpis = spec
        .kpis
        .iter()
        .map(|kpi| compute_kpi(&filtered, kpi))
        .collect();

    let series = mode
        .has_chart()
        .then(|| rollup(&filtered, bucket, &spec.series));

    let table = mode
        .has_table()
        .then(|| build_table(&filtered, spec, table_page));

    ReportView {
        tab_key: spec.key.clone(),
        title: spec.title.clone(),
        subtitle: subtitle.to_string(),
        mode,
        kpis,
        series,
        table,
    }
}

// ============================================================================
// KPI COMPUTATION
// ============================================================================

fn compute_kpi(rows: &[SourceRow], spec: &KpiSpec) -> KpiValue {
    let value = match &spec.kind {
        KpiKind::Sum { field } => sum_field(rows, field),
        KpiKind::DistinctCount { field } => distinct_count(rows, field) as f64,
        KpiKind::RowCount => rows.len() as f64,
        KpiKind::SumPerDistinct { sum_field: sum_field_name, id_field } => {
            let denominator = distinct_count(rows, id_field);
            if denominator == 0 {
                0.0
            } else {
                sum_field(rows, sum_field_name) / denominator as f64
            }
        }
    };

    KpiValue {
        key: spec.key.clone(),
        label: spec.label.clone(),
        value,
        display: format_kpi(value, spec.format),
    }
}

fn sum_field(rows: &[SourceRow], field: &str) -> f64 {
    rows.iter()
        .filter_map(|row| field_number(row, field))
        .sum()
}

fn distinct_count(rows: &[SourceRow], field: &str) -> usize {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    for row in rows {
        if let Some(id) = field_text(row, field) {
            seen.insert(id);
        }
    }
    seen.len()
}

// ============================================================================
// TABLE WINDOW
// ============================================================================

fn build_table(filtered: &[SourceRow], spec: &TabSpec, page: TablePage) -> TableView {
    let total = filtered.len();
    let (start, end) = page.window(total);

    let rows = filtered[start..end]
        .iter()
        .map(|row| {
            spec.table_columns
                .iter()
                .map(|col| {
                    if col.numeric {
                        field_number(row, &col.field)
                            .map(format_cell_number)
                            .unwrap_or_default()
                    } else {
                        field_values(row, &col.field).join(", ")
                    }
                })
                .collect()
        })
        .collect();

    TableView {
        columns: spec.table_columns.clone(),
        rows,
        total_rows: total,
        page: page.page,
        page_size: page.page_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{KpiFormat, TableColumn};
    use filter_engine::ColumnSpec;
    use rollup_engine::{MeasureSpec, SeriesSpec};
    use serde_json::json;

    fn sales_row(ts: &str, producers: Vec<&str>, qty: f64, total: f64, order: &str) -> SourceRow {
        match json!({
            "created_at": ts,
            "producers": producers,
            "quantity": qty,
            "line_total": total,
            "order_id": order,
        }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn sales_spec() -> TabSpec {
        TabSpec {
            key: "sales".into(),
            title: "Ventes".into(),
            endpoint: "analytics/sales".into(),
            series: SeriesSpec::new(
                "created_at",
                vec![
                    MeasureSpec::sum("units", "quantity"),
                    MeasureSpec::sum("revenue", "line_total"),
                    MeasureSpec::distinct("orders", "order_id"),
                ],
            ),
            filter_columns: vec![ColumnSpec::new("producers", "producers", "Producteur")],
            table_columns: vec![
                TableColumn::text("date", "created_at", "Date"),
                TableColumn::text("producers", "producers", "Producteur"),
                TableColumn::number("quantity", "quantity", "Qté"),
                TableColumn::number("line_total", "line_total", "Total"),
            ],
            kpis: vec![
                KpiSpec::new(
                    "revenue",
                    "Chiffre d'affaires",
                    KpiKind::Sum {
                        field: "line_total".into(),
                    },
                    KpiFormat::Amount,
                ),
                KpiSpec::new(
                    "orders",
                    "Commandes",
                    KpiKind::DistinctCount {
                        field: "order_id".into(),
                    },
                    KpiFormat::Count,
                ),
                KpiSpec::new(
                    "basket",
                    "Panier moyen",
                    KpiKind::SumPerDistinct {
                        sum_field: "line_total".into(),
                        id_field: "order_id".into(),
                    },
                    KpiFormat::Amount,
                ),
            ],
        }
    }

    fn fixture() -> Vec<SourceRow> {
        vec![
            sales_row("2024-05-01 09:00:00", vec!["Ferme du Lac"], 2.0, 24.0, "o1"),
            sales_row("2024-05-01 10:00:00", vec!["Rucher des Prés"], 1.0, 8.5, "o1"),
            sales_row("2024-05-02 11:00:00", vec!["Ferme du Lac", "Rucher des Prés"], 3.0, 30.0, "o2"),
            sales_row("2024-05-03 12:00:00", vec!["GAEC des Vergers"], 5.0, 12.5, "o3"),
        ]
    }

    #[test]
    fn kpis_follow_the_filtered_rows() {
        let rows = fixture();
        let spec = sales_spec();
        let mut filters = FilterState::new(spec.filter_columns.clone());
        filters.toggle("producers", "Ferme du Lac");

        let report = build_report(
            &rows,
            &spec,
            &filters,
            Bucket::Day,
            DisplayMode::Both,
            TablePage::all(),
            "01/05/2024 – 03/05/2024",
        );

        // Only rows whose producer-tag set contains "Ferme du Lac".
        let revenue = &report.kpis[0];
        assert_eq!(revenue.value, 24.0 + 30.0);
        assert_eq!(report.table.as_ref().unwrap().total_rows, 2);
        // The chart aggregates the same two rows.
        let series = report.series.as_ref().unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].value("revenue"), 24.0);
    }

    #[test]
    fn average_basket_divides_by_distinct_orders() {
        let rows = fixture();
        let spec = sales_spec();
        let filters = FilterState::new(spec.filter_columns.clone());
        let report = build_report(
            &rows,
            &spec,
            &filters,
            Bucket::Day,
            DisplayMode::ChartOnly,
            TablePage::all(),
            "",
        );
        // 75.0 total over 3 distinct orders.
        assert_eq!(report.kpis[2].value, 25.0);
        assert!(report.table.is_none());
        assert!(report.series.is_some());
    }

    #[test]
    fn empty_rows_give_zero_kpis_not_nan() {
        let spec = sales_spec();
        let filters = FilterState::new(spec.filter_columns.clone());
        let report = build_report(
            &[],
            &spec,
            &filters,
            Bucket::Day,
            DisplayMode::Both,
            TablePage::default(),
            "",
        );
        assert_eq!(report.kpis[2].value, 0.0);
        assert!(report.series.as_ref().unwrap().is_empty());
    }

    #[test]
    fn table_window_is_a_plain_row_count_cursor() {
        let rows = fixture();
        let spec = sales_spec();
        let filters = FilterState::new(spec.filter_columns.clone());
        let report = build_report(
            &rows,
            &spec,
            &filters,
            Bucket::Day,
            DisplayMode::TableOnly,
            TablePage::new(1, 3),
            "",
        );
        let table = report.table.unwrap();
        assert_eq!(table.total_rows, 4);
        assert_eq!(table.rows.len(), 1);
        assert!(report.series.is_none());
        // Multi-tag cells join their values for display.
        let report_all = build_report(
            &rows,
            &spec,
            &filters,
            Bucket::Day,
            DisplayMode::TableOnly,
            TablePage::all(),
            "",
        );
        let all = report_all.table.unwrap();
        assert_eq!(all.rows[2][1], "Ferme du Lac, Rucher des Prés");
        assert_eq!(all.rows[3][2], "5");
    }
}
