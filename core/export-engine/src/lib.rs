//! FILENAME: core/export-engine/src/lib.rs
//! Terroir Export Module
//!
//! Turns a rendered report into a multi-page PDF whose page breaks never
//! split a table row mid-text. The pipeline rasterizes the report's true
//! rendered geometry, cuts the raster only at recorded row bottoms, and
//! embeds one band per page.
//!
//! Layers:
//! - `error`: ExportError
//! - `capture`: SVG rasterization and the scoped capture guard
//! - `paginate`: Cut candidates, the page budget and the greedy slicer
//! - `writer`: PDF assembly and deterministic artifact naming

mod capture;
mod error;
mod paginate;
mod writer;

pub use capture::{capture, CaptureGuard, Raster, DEFAULT_DEVICE_SCALE};
pub use error::ExportError;
pub use paginate::{cut_candidates, slice_pages, PageSetup, PageSlice, MIN_CUT_ADVANCE_PX};
pub use writer::{artifact_name, write_pdf};
