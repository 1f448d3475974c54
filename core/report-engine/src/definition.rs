//! FILENAME: core/report-engine/src/definition.rs
//! Report Definition - The serializable per-tab configuration.
//!
//! Every dashboard tab (sales, orders, geo, ...) is an instance of TabSpec.
//! The engine itself carries no per-tab control flow: the projection decides
//! which fields feed the chart, the table and the KPI cards.

use serde::{Deserialize, Serialize};

use filter_engine::ColumnSpec;
use rollup_engine::SeriesSpec;

// ============================================================================
// DISPLAY MODE
// ============================================================================

/// What the report surface shows for a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayMode {
    TableOnly,
    ChartOnly,
    Both,
}

impl DisplayMode {
    pub fn has_table(&self) -> bool {
        matches!(self, DisplayMode::TableOnly | DisplayMode::Both)
    }

    pub fn has_chart(&self) -> bool {
        matches!(self, DisplayMode::ChartOnly | DisplayMode::Both)
    }
}

impl Default for DisplayMode {
    fn default() -> Self {
        DisplayMode::Both
    }
}

// ============================================================================
// TABLE
// ============================================================================

/// One table column: key, projected row field, header label, numeric flag
/// (numeric cells right-align and format as amounts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableColumn {
    pub key: String,
    pub field: String,
    pub label: String,
    #[serde(default)]
    pub numeric: bool,
}

impl TableColumn {
    pub fn text(key: impl Into<String>, field: impl Into<String>, label: impl Into<String>) -> Self {
        TableColumn {
            key: key.into(),
            field: field.into(),
            label: label.into(),
            numeric: false,
        }
    }

    pub fn number(
        key: impl Into<String>,
        field: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        TableColumn {
            key: key.into(),
            field: field.into(),
            label: label.into(),
            numeric: true,
        }
    }
}

/// Row-count window over the filtered collection. This is the table's own
/// pagination; it has nothing to do with the export engine's geometry-based
/// page slicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePage {
    /// 0-based page index.
    pub page: usize,
    pub page_size: usize,
}

impl TablePage {
    pub fn new(page: usize, page_size: usize) -> Self {
        TablePage { page, page_size }
    }

    /// The [start, end) row window over a collection of `total` rows.
    pub fn window(&self, total: usize) -> (usize, usize) {
        if self.page_size == 0 {
            return (0, total);
        }
        let start = (self.page * self.page_size).min(total);
        let end = (start + self.page_size).min(total);
        (start, end)
    }

    /// Window spanning the whole collection (used by exports, which render
    /// every filtered row regardless of the on-screen cursor).
    pub fn all() -> Self {
        TablePage {
            page: 0,
            page_size: 0,
        }
    }
}

impl Default for TablePage {
    fn default() -> Self {
        TablePage {
            page: 0,
            page_size: 25,
        }
    }
}

// ============================================================================
// KPI CARDS
// ============================================================================

/// How a KPI derives its number from the filtered rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KpiKind {
    /// Sum of a numeric field.
    Sum { field: String },
    /// Count of distinct values of a field.
    DistinctCount { field: String },
    /// Plain row count.
    RowCount,
    /// Sum of one field divided by the distinct count of another
    /// (e.g. average basket = revenue / orders). 0 when the denominator is 0.
    SumPerDistinct { sum_field: String, id_field: String },
}

/// Fixed display format of a KPI value. Locale negotiation is the host
/// UI's concern; the engine emits one deterministic rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KpiFormat {
    /// Grouped integer, e.g. `12 408`.
    Count,
    /// Grouped amount with two decimals and a euro sign, e.g. `1 204,50 €`.
    Amount,
    /// Two decimals, no unit.
    Decimal,
}

/// One summary card of a tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSpec {
    pub key: String,
    pub label: String,
    pub kind: KpiKind,
    pub format: KpiFormat,
}

impl KpiSpec {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        kind: KpiKind,
        format: KpiFormat,
    ) -> Self {
        KpiSpec {
            key: key.into(),
            label: label.into(),
            kind,
            format,
        }
    }
}

// ============================================================================
// TAB SPEC
// ============================================================================

/// The complete projection for one dashboard tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabSpec {
    /// Stable key, also the artifact-name component (`sales`, `geo`, ...).
    pub key: String,

    /// Human title shown on the report header.
    pub title: String,

    /// Analytics endpoint path, relative to the configured base URL.
    pub endpoint: String,

    /// Chart projection.
    pub series: SeriesSpec,

    /// Columns offered as multi-select facets.
    pub filter_columns: Vec<ColumnSpec>,

    /// Table projection.
    pub table_columns: Vec<TableColumn>,

    /// Summary cards.
    pub kpis: Vec<KpiSpec>,
}
