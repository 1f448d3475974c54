//! FILENAME: app/src/export.rs
//! PURPOSE: Export commands - the paginated PDF and the CSV escape hatch.
//! CONTEXT: The PDF export captures the CURRENT view of a tab (filters,
//! bucket and mode as on screen) with the table un-windowed, and runs the
//! whole pipeline under the capture guard: a second export while one is in
//! flight is rejected with a notification, and the export-only state is
//! released on every path out.

use export_engine::{artifact_name, capture, cut_candidates, slice_pages, write_pdf, CaptureGuard};
use report_engine::{render_report, RenderOptions};

use crate::commands::full_report;
use crate::tabs::TabKey;
use crate::{log_info, log_warn, DashboardState};

/// A finished export: deterministic filename plus the artifact bytes. The
/// host decides where the bytes land (download, disk, share sheet).
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Exports the tab's current report as a row-safe paginated PDF.
pub fn export_report_pdf(state: &DashboardState, tab: TabKey) -> Result<ExportArtifact, String> {
    let guard = CaptureGuard::acquire(&state.export_in_flight).map_err(|e| {
        log_warn!("EXPORT", "{}: rejected: {}", tab.as_str(), e);
        e.to_string()
    })?;

    let export_id = uuid::Uuid::new_v4();
    log_info!("EXPORT", "{}: starting export {}", tab.as_str(), export_id);

    let view = full_report(state, tab)?;
    let (date_from, date_to) = {
        let tabs = state.tabs.lock().map_err(|e| e.to_string())?;
        let t = tabs
            .get(&tab)
            .ok_or_else(|| format!("unknown tab: {}", tab.as_str()))?;
        (t.date_from.clone(), t.date_to.clone())
    };

    let rendered = render_report(&view, RenderOptions { export_mode: true });
    let raster = capture(&rendered, state.config.device_scale).map_err(|e| e.to_string())?;

    let candidates = cut_candidates(&rendered.row_bands, raster.scale);
    let budget = state.config.page_setup.content_budget_px(raster.width());
    let slices = slice_pages(raster.height(), budget, &candidates);

    let bytes =
        write_pdf(&raster, &slices, &state.config.page_setup, &view.title).map_err(|e| e.to_string())?;
    let filename = artifact_name(&state.config.product_slug, tab.as_str(), &date_from, &date_to);

    log_info!(
        "EXPORT",
        "{}: export {} wrote {} pages ({} bytes) as {}",
        tab.as_str(),
        export_id,
        slices.len(),
        bytes.len(),
        filename
    );

    drop(guard);
    Ok(ExportArtifact { filename, bytes })
}

/// Exports the tab's current filtered table as CSV.
pub fn export_table_csv(state: &DashboardState, tab: TabKey) -> Result<ExportArtifact, String> {
    let view = full_report(state, tab)?;
    let table = view
        .table
        .as_ref()
        .ok_or_else(|| format!("the {} tab is not showing a table", tab.as_str()))?;

    let (date_from, date_to) = {
        let tabs = state.tabs.lock().map_err(|e| e.to_string())?;
        let t = tabs
            .get(&tab)
            .ok_or_else(|| format!("unknown tab: {}", tab.as_str()))?;
        (t.date_from.clone(), t.date_to.clone())
    };

    let csv = crate::csv::build_csv(table);
    let filename = format!(
        "{}-report-{}-{}_to_{}.csv",
        state.config.product_slug,
        tab.as_str(),
        date_from,
        date_to
    );
    Ok(ExportArtifact {
        filename,
        bytes: csv.into_bytes(),
    })
}
