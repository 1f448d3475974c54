//! FILENAME: core/report-engine/src/view.rs
//! Report View - Renderable output for the dashboard surface.

use serde::{Deserialize, Serialize};

use rollup_engine::AggregatedPoint;

use crate::definition::{DisplayMode, KpiFormat, TableColumn};

// ============================================================================
// KPI VALUE
// ============================================================================

/// A computed summary card: raw value for consumers, display string for the
/// surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiValue {
    pub key: String,
    pub label: String,
    pub value: f64,
    pub display: String,
}

// ============================================================================
// TABLE VIEW
// ============================================================================

/// The windowed table: display cells only, one Vec<String> per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
    /// Filtered row count before windowing.
    pub total_rows: usize,
    pub page: usize,
    pub page_size: usize,
}

// ============================================================================
// REPORT VIEW
// ============================================================================

/// The composed report for one tab: KPIs, chart series and table window,
/// all derived from the same filtered row set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportView {
    pub tab_key: String,
    pub title: String,
    /// Subtitle shown under the title (the active date range).
    pub subtitle: String,
    pub mode: DisplayMode,
    pub kpis: Vec<KpiValue>,
    pub series: Option<Vec<AggregatedPoint>>,
    pub table: Option<TableView>,
}

// ============================================================================
// VALUE FORMATTING
// ============================================================================

/// Renders a KPI value in its fixed format. Thousands group with narrow
/// no-break spaces; amounts use a decimal comma and a euro sign.
pub fn format_kpi(value: f64, format: KpiFormat) -> String {
    match format {
        KpiFormat::Count => group_thousands(value.round() as i64),
        KpiFormat::Amount => format!("{},{:02} €", group_thousands(value.trunc() as i64), cents(value)),
        KpiFormat::Decimal => format!("{value:.2}"),
    }
}

/// Renders a table cell number: integers stay integers, everything else
/// keeps two decimals.
pub fn format_cell_number(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        group_thousands(value.round() as i64)
    } else {
        format!("{value:.2}")
    }
}

fn cents(value: f64) -> u32 {
    ((value.abs() * 100.0).round() as u64 % 100) as u32
}

fn group_thousands(value: i64) -> String {
    let digits = value.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('\u{202f}');
        }
        grouped.push(ch);
    }
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kpi_formats() {
        assert_eq!(format_kpi(12408.0, KpiFormat::Count), "12\u{202f}408");
        assert_eq!(format_kpi(1204.5, KpiFormat::Amount), "1\u{202f}204,50 €");
        assert_eq!(format_kpi(0.0, KpiFormat::Amount), "0,00 €");
        assert_eq!(format_kpi(3.14159, KpiFormat::Decimal), "3.14");
    }

    #[test]
    fn cell_numbers_keep_integers_plain() {
        assert_eq!(format_cell_number(42.0), "42");
        assert_eq!(format_cell_number(1500.0), "1\u{202f}500");
        assert_eq!(format_cell_number(12.345), "12.35");
    }
}
