//! FILENAME: core/export-engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("an export is already in flight")]
    ExportInFlight,

    #[error("report surface has no size ({width}x{height} px)")]
    EmptySurface { width: u32, height: u32 },

    #[error("SVG parse error: {0}")]
    Svg(String),

    #[error("raster error: {0}")]
    Raster(String),

    #[error("PDF write error: {0}")]
    Pdf(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
