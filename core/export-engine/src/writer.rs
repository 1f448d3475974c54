//! FILENAME: core/export-engine/src/writer.rs
//! Writer - assembles page slices into the PDF artifact.
//!
//! Each slice becomes one page: the band is lifted out of the continuous
//! raster, embedded as a raw RGB image (no lossy re-encode) scaled to the
//! page content width, and placed under the top margin. The first slice
//! lands on the document's initial page; every further slice opens a new
//! one.

use printpdf::{
    ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, Mm, PdfDocument, Px,
};
use tiny_skia::{IntRect, Pixmap};

use crate::capture::Raster;
use crate::error::ExportError;
use crate::paginate::{PageSetup, PageSlice};

/// Deterministic artifact name: product slug, tab key and the active date
/// range, nothing else.
pub fn artifact_name(product: &str, tab: &str, date_from: &str, date_to: &str) -> String {
    format!("{product}-report-{tab}-{date_from}_to_{date_to}.pdf")
}

/// Writes the sliced raster into a paginated PDF and returns its bytes.
pub fn write_pdf(
    raster: &Raster,
    slices: &[PageSlice],
    setup: &PageSetup,
    title: &str,
) -> Result<Vec<u8>, ExportError> {
    if slices.is_empty() {
        return Err(ExportError::Raster("no page slices to write".to_string()));
    }

    let width_px = raster.width();
    // Map the raster width onto the page content width.
    let dpi = width_px as f64 * 25.4 / setup.content_width_mm();

    let (doc, first_page, first_layer) = PdfDocument::new(
        title,
        Mm(setup.width_mm as f32),
        Mm(setup.height_mm as f32),
        "Report",
    );

    for (i, slice) in slices.iter().enumerate() {
        let (page, layer) = if i == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(setup.width_mm as f32), Mm(setup.height_mm as f32), "Report")
        };

        let rect = IntRect::from_xywh(0, slice.top as i32, width_px, slice.height())
            .ok_or_else(|| ExportError::Raster(format!("degenerate slice {slice:?}")))?;
        let band = raster
            .pixmap
            .clone_rect(rect)
            .ok_or_else(|| ExportError::Raster(format!("slice {slice:?} outside the raster")))?;

        let band_height_mm = band.height() as f64 * 25.4 / dpi;
        let xobject = ImageXObject {
            width: Px(band.width() as usize),
            height: Px(band.height() as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: rgb_bytes(&band),
            image_filter: None,
            smask: None,
            clipping_bbox: None,
        };
        Image::from(xobject).add_to_layer(
            doc.get_page(page).get_layer(layer),
            ImageTransform {
                translate_x: Some(Mm(setup.margin_mm as f32)),
                // PDF origin is bottom-left; anchor the band to the top margin.
                translate_y: Some(Mm((setup.height_mm - setup.margin_mm - band_height_mm) as f32)),
                dpi: Some(dpi as f32),
                ..Default::default()
            },
        );
    }

    doc.save_to_bytes().map_err(|e| ExportError::Pdf(e.to_string()))
}

/// Flattens a premultiplied-RGBA pixmap into the raw RGB stream the PDF
/// image object carries.
fn rgb_bytes(pixmap: &Pixmap) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixmap.width() as usize * pixmap.height() as usize * 3);
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        out.extend_from_slice(&[color.red(), color.green(), color.blue()]);
    }
    out
}
