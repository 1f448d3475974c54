//! FILENAME: app/src/commands.rs
//! PURPOSE: The command surface the host UI calls into.
//! CONTEXT: Thin Result<_, String> wrappers over the engines, operating on
//! one tab's state at a time. Commands never touch another tab: filters,
//! cursor, bucket and range are all tab-local.

use std::str::FromStr;

use filter_engine::{facet_candidates, FacetCandidate};
use report_engine::{build_report, DisplayMode, ReportView, TablePage};
use rollup_engine::Bucket;

use crate::client::GeoLevel;
use crate::tabs::TabKey;
use crate::DashboardState;

/// Runs a closure over one tab's mutable state.
fn with_tab<T>(
    state: &DashboardState,
    tab: TabKey,
    f: impl FnOnce(&mut crate::TabState) -> T,
) -> Result<T, String> {
    let mut tabs = state.tabs.lock().map_err(|e| e.to_string())?;
    let tab_state = tabs
        .get_mut(&tab)
        .ok_or_else(|| format!("unknown tab: {}", tab.as_str()))?;
    Ok(f(tab_state))
}

// ============================================================================
// TAB PARAMETERS
// ============================================================================

/// Sets the bucket granularity from its wire form. The caller refetches
/// afterwards; the server restricts the row window per granularity.
pub fn set_bucket(state: &DashboardState, tab: TabKey, bucket: &str) -> Result<(), String> {
    let bucket = Bucket::from_str(bucket).map_err(|e| e.to_string())?;
    with_tab(state, tab, |t| {
        t.bucket = bucket;
    })
}

/// Sets the ISO date range. The caller refetches afterwards.
pub fn set_date_range(
    state: &DashboardState,
    tab: TabKey,
    date_from: &str,
    date_to: &str,
) -> Result<(), String> {
    with_tab(state, tab, |t| {
        t.date_from = date_from.to_string();
        t.date_to = date_to.to_string();
    })
}

/// Sets the geo aggregation level. Only the geo tab accepts one.
pub fn set_geo_level(state: &DashboardState, tab: TabKey, level: &str) -> Result<(), String> {
    if tab != TabKey::Geo {
        return Err(format!(
            "geo level does not apply to the {} tab",
            tab.as_str()
        ));
    }
    let level = GeoLevel::parse(level)?;
    with_tab(state, tab, |t| {
        t.geo_level = Some(level);
    })
}

pub fn set_display_mode(state: &DashboardState, tab: TabKey, mode: DisplayMode) -> Result<(), String> {
    with_tab(state, tab, |t| {
        t.mode = mode;
    })
}

pub fn set_table_page(state: &DashboardState, tab: TabKey, page: usize) -> Result<(), String> {
    with_tab(state, tab, |t| {
        t.table_page.page = page;
    })
}

// ============================================================================
// FILTERS
// ============================================================================

/// Toggles one value of one facet. The table cursor rewinds because the
/// filtered collection changed under it.
pub fn toggle_filter(
    state: &DashboardState,
    tab: TabKey,
    column: &str,
    value: &str,
) -> Result<(), String> {
    with_tab(state, tab, |t| {
        t.filters.toggle(column, value);
        t.table_page.page = 0;
    })
}

pub fn set_filter_all(
    state: &DashboardState,
    tab: TabKey,
    column: &str,
    values: &[String],
) -> Result<(), String> {
    with_tab(state, tab, |t| {
        t.filters.set_all(column, values);
        t.table_page.page = 0;
    })
}

pub fn clear_filter(state: &DashboardState, tab: TabKey, column: &str) -> Result<(), String> {
    with_tab(state, tab, |t| {
        t.filters.clear(column);
        t.table_page.page = 0;
    })
}

pub fn clear_all_filters(state: &DashboardState, tab: TabKey) -> Result<(), String> {
    with_tab(state, tab, |t| {
        t.filters.clear_all();
        t.table_page.page = 0;
    })
}

/// Candidate values for a facet dropdown, cascaded through every other
/// column's current filter.
pub fn filter_facets(
    state: &DashboardState,
    tab: TabKey,
    column: &str,
) -> Result<Vec<FacetCandidate>, String> {
    with_tab(state, tab, |t| {
        facet_candidates(t.data.rows(), &t.filters, column)
    })
}

// ============================================================================
// REPORT
// ============================================================================

/// Builds the tab's current ReportView (the on-screen table window).
pub fn report(state: &DashboardState, tab: TabKey) -> Result<ReportView, String> {
    with_tab(state, tab, |t| {
        let subtitle = range_subtitle(&t.date_from, &t.date_to);
        build_report(
            t.data.rows(),
            &t.spec,
            &t.filters,
            t.bucket,
            t.mode,
            t.table_page,
            &subtitle,
        )
    })
}

/// Same view with the table un-windowed; exports render every filtered row.
pub(crate) fn full_report(state: &DashboardState, tab: TabKey) -> Result<ReportView, String> {
    with_tab(state, tab, |t| {
        let subtitle = range_subtitle(&t.date_from, &t.date_to);
        build_report(
            t.data.rows(),
            &t.spec,
            &t.filters,
            t.bucket,
            t.mode,
            TablePage::all(),
            &subtitle,
        )
    })
}

/// The tab's load-error message, if its latest fetch failed.
pub fn load_error(state: &DashboardState, tab: TabKey) -> Result<Option<String>, String> {
    with_tab(state, tab, |t| t.data.error().map(str::to_string))
}

fn range_subtitle(date_from: &str, date_to: &str) -> String {
    if date_from.is_empty() && date_to.is_empty() {
        String::new()
    } else {
        format!("{date_from} – {date_to}")
    }
}
