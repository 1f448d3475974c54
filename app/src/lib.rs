//! FILENAME: app/src/lib.rs
// PURPOSE: Main library entry point for the dashboard backend.
// CONTEXT: Owns the per-tab state and wires the engines together. The host
// UI talks to the command surface; the engines stay framework-free.

use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Mutex;

use filter_engine::FilterState;
use report_engine::{DisplayMode, TabSpec, TablePage};
use rollup_engine::Bucket;

pub mod client;
pub mod commands;
pub mod config;
pub mod csv;
pub mod export;
pub mod fetch;
pub mod logging;
pub mod tabs;

pub use client::{AnalyticsClient, AnalyticsQuery, AnalyticsResponse, ApiError, GeoLevel};
pub use commands::{
    clear_all_filters, clear_filter, filter_facets, load_error, report, set_bucket,
    set_date_range, set_display_mode, set_filter_all, set_geo_level, set_table_page,
    toggle_filter,
};
pub use config::DashboardConfig;
pub use export::{export_report_pdf, export_table_csv, ExportArtifact};
pub use fetch::{refresh_tab, FetchGate, TabData};
pub use logging::{get_log_path, init_log_file, next_seq, write_log};
pub use tabs::{tab_spec, TabKey};

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Everything one tab owns. Nothing here is shared across tabs: switching
/// tabs can never leak a filter selection, cursor or date range.
#[derive(Debug)]
pub struct TabState {
    pub spec: TabSpec,
    pub filters: FilterState,
    pub bucket: Bucket,
    pub date_from: String,
    pub date_to: String,
    pub geo_level: Option<GeoLevel>,
    pub table_page: TablePage,
    pub mode: DisplayMode,
    pub data: TabData,
    pub gate: FetchGate,
}

impl TabState {
    fn new(key: TabKey) -> Self {
        let spec = tab_spec(key);
        let filters = FilterState::new(spec.filter_columns.clone());
        TabState {
            spec,
            filters,
            bucket: Bucket::Day,
            date_from: String::new(),
            date_to: String::new(),
            geo_level: (key == TabKey::Geo).then_some(GeoLevel::Region),
            table_page: TablePage::default(),
            mode: DisplayMode::Both,
            data: TabData::Empty,
            gate: FetchGate::new(),
        }
    }
}

/// The dashboard backend state: injected configuration, one TabState per
/// report tab, and the export in-flight flag the capture guard scopes.
#[derive(Debug)]
pub struct DashboardState {
    pub config: DashboardConfig,
    pub tabs: Mutex<HashMap<TabKey, TabState>>,
    pub export_in_flight: AtomicBool,
}

/// Builds the full dashboard state from an explicit configuration. When the
/// configuration names a log path, the unified log file opens here.
pub fn create_dashboard_state(config: DashboardConfig) -> DashboardState {
    if let Some(path) = &config.log_path {
        if let Err(message) = logging::init_log_file(path) {
            eprintln!("[LOG_INIT] {message}");
        }
    }

    let tabs = TabKey::all()
        .into_iter()
        .map(|key| (key, TabState::new(key)))
        .collect();

    DashboardState {
        config,
        tabs: Mutex::new(tabs),
        export_in_flight: AtomicBool::new(false),
    }
}
