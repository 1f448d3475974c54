//! FILENAME: core/export-engine/src/paginate.rs
//! Paginate - slices the raster into row-safe page bands.
//!
//! The only legal vertical cut points are the recorded row bottoms (scaled
//! to raster pixels) plus the natural end of content; cutting anywhere else
//! would bisect a row. The greedy slicer fills each page as far as a legal
//! cut allows and falls back to an exact-budget cut only when no candidate
//! qualifies, the one documented situation where a row may be split (a
//! single row taller than a full page).

use serde::{Deserialize, Serialize};

use report_engine::RowBand;

/// Minimum raster-pixel advance a candidate cut must make past the previous
/// one. Guards against a pathologically short leading row producing a
/// near-empty page or stalling the slicer.
pub const MIN_CUT_ADVANCE_PX: f64 = 100.0;

/// Rows rendered shorter than this (raster px) are unreliable cut
/// candidates and are discarded.
const MIN_ROW_HEIGHT_PX: f64 = 2.0;

// ============================================================================
// PAGE SETUP
// ============================================================================

/// Physical page geometry. Defaults to portrait A4 with 10 mm margins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSetup {
    pub width_mm: f64,
    pub height_mm: f64,
    pub margin_mm: f64,
}

impl Default for PageSetup {
    fn default() -> Self {
        PageSetup {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm: 10.0,
        }
    }
}

impl PageSetup {
    pub fn content_width_mm(&self) -> f64 {
        self.width_mm - 2.0 * self.margin_mm
    }

    pub fn content_height_mm(&self) -> f64 {
        self.height_mm - 2.0 * self.margin_mm
    }

    /// The raster height that, scaled to the page content width, exactly
    /// fills one page.
    pub fn content_budget_px(&self, raster_width: u32) -> f64 {
        self.content_height_mm() * raster_width as f64 / self.content_width_mm()
    }
}

// ============================================================================
// PAGE SLICES
// ============================================================================

/// A contiguous pixel band `[top, bottom)` of the raster, one per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSlice {
    pub top: u32,
    pub bottom: u32,
}

impl PageSlice {
    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// Legal cut offsets in raster pixels: every reliable row's bottom edge,
/// ascending.
pub fn cut_candidates(bands: &[RowBand], scale: f32) -> Vec<f64> {
    let scale = scale as f64;
    let mut cuts: Vec<f64> = bands
        .iter()
        .filter(|band| band.height() * scale >= MIN_ROW_HEIGHT_PX)
        .map(|band| band.bottom * scale)
        .collect();
    cuts.sort_by(|a, b| a.partial_cmp(b).expect("cut offsets are finite"));
    cuts
}

/// Greedy slicing loop.
///
/// The produced slices exactly cover `[0, raster_height)`: each slice
/// starts where the previous one ended and the last one ends at the raster
/// bottom. Every interior boundary is a candidate cut except in the
/// documented fallback.
pub fn slice_pages(raster_height: u32, budget_px: f64, candidates: &[f64]) -> Vec<PageSlice> {
    let total = raster_height as f64;
    let mut slices = Vec::new();
    let mut used: u32 = 0;

    while total - used as f64 >= 1.0 {
        let ideal = used as f64 + budget_px;

        // Remainder fits on one page: take it whole and stop.
        if total <= ideal {
            slices.push(PageSlice {
                top: used,
                bottom: raster_height,
            });
            break;
        }

        // Largest legal cut within the budget that still advances enough.
        let cut = candidates
            .iter()
            .copied()
            .filter(|&c| c <= ideal && c >= used as f64 + MIN_CUT_ADVANCE_PX && c < total)
            .fold(None::<f64>, |best, c| Some(best.map_or(c, |b| b.max(c))));

        let bottom = match cut {
            Some(c) => c.round() as u32,
            // No qualifying candidate: cut at the exact budget boundary,
            // bisecting a row. Deliberate last resort, not an error.
            None => ideal.floor() as u32,
        };
        let bottom = bottom.clamp(used + 1, raster_height);

        slices.push(PageSlice { top: used, bottom });
        used = bottom;
    }

    slices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_bands(count: usize, row_h: f64, offset: f64) -> Vec<RowBand> {
        (0..count)
            .map(|i| RowBand {
                top: offset + i as f64 * row_h,
                bottom: offset + (i + 1) as f64 * row_h,
            })
            .collect()
    }

    fn assert_covers_exactly(slices: &[PageSlice], height: u32) {
        assert_eq!(slices.first().unwrap().top, 0);
        assert_eq!(slices.last().unwrap().bottom, height);
        for pair in slices.windows(2) {
            assert_eq!(pair[0].bottom, pair[1].top, "gap or overlap");
        }
    }

    fn assert_no_cut_inside_a_row(slices: &[PageSlice], bands: &[RowBand], scale: f64) {
        for slice in &slices[..slices.len() - 1] {
            let b = slice.bottom as f64;
            for band in bands {
                let (top, bottom) = (band.top * scale, band.bottom * scale);
                assert!(
                    !(b > top + 0.5 && b < bottom - 0.5),
                    "cut {b} bisects row [{top}, {bottom})"
                );
            }
        }
    }

    #[test]
    fn slices_cover_the_raster_with_no_gaps_or_overlaps() {
        // 57 rows of mixed heights after a 160 px header block.
        let mut bands = uniform_bands(40, 28.0, 160.0);
        bands.extend(uniform_bands(17, 44.0, 160.0 + 40.0 * 28.0));
        let scale = 2.0_f32;
        let height = ((bands.last().unwrap().bottom + 24.0) * scale as f64) as u32;

        let candidates = cut_candidates(&bands, scale);
        let slices = slice_pages(height, 1100.0, &candidates);

        assert!(slices.len() > 1);
        assert_covers_exactly(&slices, height);
        assert_no_cut_inside_a_row(&slices, &bands, scale as f64);
    }

    #[test]
    fn one_hundred_twenty_rows_at_twenty_per_page_makes_six_pages() {
        let bands = uniform_bands(120, 28.0, 0.0);
        let scale = 2.0_f32;
        let row_px = 56.0;
        let height = (120.0 * row_px) as u32;

        // Budget fits ~20.5 rows so the greedy cut lands on row 20's bottom.
        let candidates = cut_candidates(&bands, scale);
        let slices = slice_pages(height, 20.5 * row_px, &candidates);

        assert_eq!(slices.len(), 6);
        assert_covers_exactly(&slices, height);
        for slice in &slices {
            assert_eq!(slice.height() as f64 % row_px, 0.0);
            assert_eq!(slice.height() as f64 / row_px, 20.0);
        }
    }

    #[test]
    fn short_leading_row_does_not_stall_the_slicer() {
        // One 30 px row at the top, then a giant un-cuttable block: the
        // 30 px candidate is under the minimum advance, so the slicer must
        // fall back rather than emit a near-empty page forever.
        let bands = vec![RowBand {
            top: 0.0,
            bottom: 30.0,
        }];
        let candidates = cut_candidates(&bands, 1.0);
        let slices = slice_pages(2000, 500.0, &candidates);
        assert_covers_exactly(&slices, 2000);
        assert_eq!(slices[0].bottom, 500);
    }

    #[test]
    fn row_taller_than_a_page_is_bisected_at_the_budget() {
        let bands = vec![RowBand {
            top: 0.0,
            bottom: 1500.0,
        }];
        let candidates = cut_candidates(&bands, 1.0);
        let slices = slice_pages(1500, 600.0, &candidates);
        assert_eq!(
            slices,
            vec![
                PageSlice { top: 0, bottom: 600 },
                PageSlice {
                    top: 600,
                    bottom: 1200
                },
                PageSlice {
                    top: 1200,
                    bottom: 1500
                },
            ]
        );
    }

    #[test]
    fn near_zero_height_rows_are_not_candidates() {
        let bands = vec![
            RowBand {
                top: 0.0,
                bottom: 0.5,
            },
            RowBand {
                top: 0.5,
                bottom: 200.0,
            },
        ];
        let cuts = cut_candidates(&bands, 1.0);
        assert_eq!(cuts, vec![200.0]);
    }

    #[test]
    fn content_budget_scales_with_raster_width() {
        let setup = PageSetup::default();
        // 1920 px wide raster over 190 mm of content width.
        let budget = setup.content_budget_px(1920);
        assert!((budget - 277.0 * 1920.0 / 190.0).abs() < 1e-9);
    }

    #[test]
    fn whole_report_shorter_than_a_page_is_one_slice() {
        let bands = uniform_bands(5, 28.0, 0.0);
        let candidates = cut_candidates(&bands, 1.0);
        let slices = slice_pages(140, 1000.0, &candidates);
        assert_eq!(
            slices,
            vec![PageSlice {
                top: 0,
                bottom: 140
            }]
        );
    }
}
