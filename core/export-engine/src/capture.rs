//! FILENAME: core/export-engine/src/capture.rs
//! Capture - rasterizes the rendered report and scopes the export state.
//!
//! The capture works from the report's real rendered output (the SVG the
//! dashboard surface displays), never from a re-derived layout: what lands
//! in the raster is exactly what the user sees, fonts and all.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use once_cell::sync::Lazy;
use tiny_skia::{Color, Pixmap, Transform};

use report_engine::RenderedReport;

use crate::error::ExportError;

/// Device-pixel supersampling factor applied while rasterizing.
pub const DEFAULT_DEVICE_SCALE: f32 = 2.0;

/// System font database, loaded once per process.
static FONTDB: Lazy<Arc<usvg::fontdb::Database>> = Lazy::new(|| {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    Arc::new(db)
});

// ============================================================================
// CAPTURE GUARD
// ============================================================================

/// Scoped ownership of the export-only state.
///
/// Acquiring flips the in-flight flag; dropping always restores it, on the
/// success path and on every error path alike, so the surface can never be
/// left stuck in export styling. A second acquisition while one guard is
/// alive is rejected, not queued.
#[derive(Debug)]
pub struct CaptureGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> CaptureGuard<'a> {
    pub fn acquire(flag: &'a AtomicBool) -> Result<Self, ExportError> {
        if flag
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            Ok(CaptureGuard { flag })
        } else {
            Err(ExportError::ExportInFlight)
        }
    }
}

impl Drop for CaptureGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

// ============================================================================
// RASTERIZATION
// ============================================================================

/// The rasterized report: one continuous RGBA image of the whole document.
#[derive(Debug, Clone)]
pub struct Raster {
    pub pixmap: Pixmap,
    /// CSS px -> raster px factor the capture ran at.
    pub scale: f32,
}

impl Raster {
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }
}

/// Rasterizes a rendered report at the given device scale.
///
/// A surface with a zero dimension aborts here, before any artifact is
/// produced.
pub fn capture(rendered: &RenderedReport, scale: f32) -> Result<Raster, ExportError> {
    let width = (rendered.width as f32 * scale).round() as u32;
    let height = (rendered.height as f32 * scale).round() as u32;
    if width == 0 || height == 0 {
        return Err(ExportError::EmptySurface { width, height });
    }

    let mut options = usvg::Options::default();
    options.fontdb = Arc::clone(&FONTDB);
    let tree = usvg::Tree::from_str(&rendered.svg, &options)
        .map_err(|e| ExportError::Svg(e.to_string()))?;

    let mut pixmap =
        Pixmap::new(width, height).ok_or(ExportError::EmptySurface { width, height })?;
    pixmap.fill(Color::WHITE);
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    Ok(Raster { pixmap, scale })
}
