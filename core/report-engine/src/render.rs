//! FILENAME: core/report-engine/src/render.rs
//! Deterministic SVG rendering of a ReportView.
//!
//! The dashboard surface and the export pipeline both consume this layout.
//! Geometry is fixed (no font measurement feedback), so the recorded table
//! row bands are exact: band i is the vertical extent of body row i in CSS
//! pixels, measured from the top of the document. The export engine cuts
//! pages ONLY at these band bottoms.

use serde::{Deserialize, Serialize};

use crate::view::ReportView;

// ============================================================================
// LAYOUT METRICS (CSS px)
// ============================================================================

const REPORT_WIDTH: f64 = 960.0;
const MARGIN: f64 = 24.0;
const TITLE_BLOCK_H: f64 = 64.0;
const KPI_CARD_H: f64 = 84.0;
const KPI_GAP: f64 = 16.0;
const SECTION_GAP: f64 = 24.0;
const CHART_H: f64 = 260.0;
const CHART_GUTTER: f64 = 48.0;
const TABLE_HEADER_H: f64 = 32.0;
const ROW_H: f64 = 28.0;

const SERIES_COLORS: [&str; 4] = ["#2a7d4f", "#c77d2a", "#4a6fb5", "#a8435c"];

// ============================================================================
// OUTPUT TYPES
// ============================================================================

/// Vertical extent of one rendered table body row, `[top, bottom)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowBand {
    pub top: f64,
    pub bottom: f64,
}

impl RowBand {
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// A rendered report: the SVG document plus the geometry export needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedReport {
    pub svg: String,
    /// Document size in CSS pixels.
    pub width: f64,
    pub height: f64,
    /// One band per table body row, top to bottom.
    pub row_bands: Vec<RowBand>,
}

/// Rendering options.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Export styling: plain white page background instead of the dashboard
    /// canvas tint. Entered only while an export captures the report.
    pub export_mode: bool,
}

// ============================================================================
// RENDERING
// ============================================================================

/// Lays the report out and returns the SVG document with row geometry.
pub fn render_report(view: &ReportView, options: RenderOptions) -> RenderedReport {
    let width = REPORT_WIDTH;
    let content_w = width - 2.0 * MARGIN;
    let mut body = String::new();
    let mut row_bands = Vec::new();
    let mut y = MARGIN;

    // Title block
    body.push_str(&svg_text(
        MARGIN,
        y + 26.0,
        &xml_escape(&view.title),
        22.0,
        "700",
        "#20242b",
        "start",
    ));
    body.push_str(&svg_text(
        MARGIN,
        y + 50.0,
        &xml_escape(&view.subtitle),
        13.0,
        "400",
        "#6b7280",
        "start",
    ));
    y += TITLE_BLOCK_H + SECTION_GAP;

    // KPI cards
    if !view.kpis.is_empty() {
        let n = view.kpis.len() as f64;
        let card_w = (content_w - KPI_GAP * (n - 1.0)) / n;
        for (i, kpi) in view.kpis.iter().enumerate() {
            let x = MARGIN + i as f64 * (card_w + KPI_GAP);
            body.push_str(&format!(
                "<rect x='{x:.1}' y='{y:.1}' width='{card_w:.1}' height='{KPI_CARD_H:.1}' \
                 rx='8' fill='#ffffff' stroke='#e3e1da'/>\n"
            ));
            body.push_str(&svg_text(
                x + 14.0,
                y + 26.0,
                &xml_escape(&kpi.label),
                12.0,
                "400",
                "#6b7280",
                "start",
            ));
            body.push_str(&svg_text(
                x + 14.0,
                y + 60.0,
                &xml_escape(&kpi.display),
                24.0,
                "700",
                "#20242b",
                "start",
            ));
        }
        y += KPI_CARD_H + SECTION_GAP;
    }

    // Chart
    if let Some(series) = &view.series {
        body.push_str(&format!(
            "<rect x='{MARGIN:.1}' y='{y:.1}' width='{content_w:.1}' height='{CHART_H:.1}' \
             rx='8' fill='#ffffff' stroke='#e3e1da'/>\n"
        ));
        body.push_str(&render_chart(series, MARGIN, y, content_w));
        y += CHART_H + SECTION_GAP;
    }

    // Table
    if let Some(table) = &view.table {
        let n_cols = table.columns.len().max(1);
        let col_w = content_w / n_cols as f64;

        body.push_str(&format!(
            "<rect x='{MARGIN:.1}' y='{y:.1}' width='{content_w:.1}' height='{TABLE_HEADER_H:.1}' \
             fill='#eceae3'/>\n"
        ));
        for (c, col) in table.columns.iter().enumerate() {
            let (x, anchor) = cell_anchor(MARGIN, col_w, c, col.numeric);
            body.push_str(&svg_text(
                x,
                y + 21.0,
                &xml_escape(&truncate_cell(&col.label, col_w)),
                12.0,
                "600",
                "#3d4450",
                anchor,
            ));
        }
        y += TABLE_HEADER_H;

        for (r, row) in table.rows.iter().enumerate() {
            let top = y;
            if r % 2 == 1 {
                body.push_str(&format!(
                    "<rect x='{MARGIN:.1}' y='{top:.1}' width='{content_w:.1}' height='{ROW_H:.1}' \
                     fill='#f7f6f2'/>\n"
                ));
            }
            for (c, cell) in row.iter().enumerate() {
                let numeric = table.columns.get(c).map(|col| col.numeric).unwrap_or(false);
                let (x, anchor) = cell_anchor(MARGIN, col_w, c, numeric);
                body.push_str(&svg_text(
                    x,
                    top + 18.5,
                    &xml_escape(&truncate_cell(cell, col_w)),
                    12.0,
                    "400",
                    "#20242b",
                    anchor,
                ));
            }
            body.push_str(&format!(
                "<line x1='{MARGIN:.1}' y1='{:.1}' x2='{:.1}' y2='{:.1}' stroke='#e3e1da'/>\n",
                top + ROW_H,
                MARGIN + content_w,
                top + ROW_H
            ));
            row_bands.push(RowBand {
                top,
                bottom: top + ROW_H,
            });
            y += ROW_H;
        }
    }

    let height = y + MARGIN;
    let background = if options.export_mode { "#ffffff" } else { "#f2f0ea" };
    let svg = format!(
        "<svg xmlns='http://www.w3.org/2000/svg' width='{width:.0}' height='{height:.0}' \
         viewBox='0 0 {width:.0} {height:.0}' font-family='Inter, sans-serif'>\n\
         <rect width='{width:.0}' height='{height:.0}' fill='{background}'/>\n\
         {body}</svg>\n"
    );

    RenderedReport {
        svg,
        width,
        height,
        row_bands,
    }
}

// ============================================================================
// CHART
// ============================================================================

fn render_chart(series: &[rollup_engine::AggregatedPoint], x0: f64, y0: f64, w: f64) -> String {
    let mut out = String::new();
    let plot_left = x0 + CHART_GUTTER;
    let plot_right = x0 + w - 16.0;
    let plot_top = y0 + 20.0;
    let plot_bottom = y0 + CHART_H - 36.0;

    out.push_str(&format!(
        "<line x1='{plot_left:.1}' y1='{plot_bottom:.1}' x2='{plot_right:.1}' y2='{plot_bottom:.1}' \
         stroke='#c9c6bd'/>\n"
    ));

    if series.is_empty() {
        out.push_str(&svg_text(
            x0 + w / 2.0,
            (plot_top + plot_bottom) / 2.0,
            "Aucune donnée sur la période",
            13.0,
            "400",
            "#6b7280",
            "middle",
        ));
        return out;
    }

    // Deterministic measure order: sorted keys of the first point.
    let mut measures: Vec<&String> = series[0].values.keys().collect();
    measures.sort();

    let max = series
        .iter()
        .flat_map(|p| p.values.values())
        .fold(1.0_f64, |m, v| m.max(*v));
    let span = (series.len().max(2) - 1) as f64;

    for (mi, measure) in measures.into_iter().enumerate() {
        let color = SERIES_COLORS[mi % SERIES_COLORS.len()];
        let points: Vec<String> = series
            .iter()
            .enumerate()
            .map(|(i, point)| {
                let x = plot_left + (plot_right - plot_left) * i as f64 / span;
                let y = plot_bottom - (plot_bottom - plot_top) * point.value(measure) / max;
                format!("{x:.1},{y:.1}")
            })
            .collect();
        out.push_str(&format!(
            "<polyline points='{}' fill='none' stroke='{color}' stroke-width='2'/>\n",
            points.join(" ")
        ));
        // Legend swatch + label
        let lx = plot_left + mi as f64 * 110.0;
        out.push_str(&format!(
            "<rect x='{lx:.1}' y='{:.1}' width='10' height='10' rx='2' fill='{color}'/>\n",
            y0 + CHART_H - 22.0
        ));
        out.push_str(&svg_text(
            lx + 16.0,
            y0 + CHART_H - 13.0,
            &xml_escape(measure),
            11.0,
            "400",
            "#3d4450",
            "start",
        ));
    }

    // Period labels at the extremes, max value on the axis.
    out.push_str(&svg_text(
        plot_left,
        plot_bottom + 16.0,
        &xml_escape(&series[0].period),
        11.0,
        "400",
        "#6b7280",
        "start",
    ));
    if series.len() > 1 {
        out.push_str(&svg_text(
            plot_right,
            plot_bottom + 16.0,
            &xml_escape(&series[series.len() - 1].period),
            11.0,
            "400",
            "#6b7280",
            "end",
        ));
    }
    out.push_str(&svg_text(
        plot_left - 6.0,
        plot_top + 4.0,
        &format!("{max:.0}"),
        11.0,
        "400",
        "#6b7280",
        "end",
    ));

    out
}

// ============================================================================
// HELPERS
// ============================================================================

fn cell_anchor(margin: f64, col_w: f64, col: usize, numeric: bool) -> (f64, &'static str) {
    let left = margin + col as f64 * col_w;
    if numeric {
        (left + col_w - 12.0, "end")
    } else {
        (left + 12.0, "start")
    }
}

/// Rough glyph budget at 12px; the layout never measures fonts, so cells
/// truncate pessimistically to stay inside their column.
fn truncate_cell(text: &str, col_w: f64) -> String {
    let budget = ((col_w - 24.0) / 6.5) as usize;
    if text.chars().count() <= budget {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(budget.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

fn svg_text(
    x: f64,
    y: f64,
    escaped: &str,
    size: f64,
    weight: &str,
    fill: &str,
    anchor: &str,
) -> String {
    format!(
        "<text x='{x:.1}' y='{y:.1}' font-size='{size:.0}' font-weight='{weight}' \
         fill='{fill}' text-anchor='{anchor}'>{escaped}</text>\n"
    )
}

fn xml_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::TableColumn;
    use crate::view::{KpiValue, TableView};
    use crate::DisplayMode;

    fn view_with_rows(n: usize) -> ReportView {
        ReportView {
            tab_key: "sales".into(),
            title: "Ventes".into(),
            subtitle: "01/05/2024 – 31/05/2024".into(),
            mode: DisplayMode::Both,
            kpis: vec![KpiValue {
                key: "revenue".into(),
                label: "Chiffre d'affaires".into(),
                value: 100.0,
                display: "100,00 €".into(),
            }],
            series: Some(Vec::new()),
            table: Some(TableView {
                columns: vec![
                    TableColumn::text("date", "created_at", "Date"),
                    TableColumn::number("total", "line_total", "Total"),
                ],
                rows: (0..n)
                    .map(|i| vec![format!("2024-05-{:02}", i + 1), format!("{i}")])
                    .collect(),
                total_rows: n,
                page: 0,
                page_size: 0,
            }),
        }
    }

    #[test]
    fn row_bands_are_contiguous_and_row_high() {
        let rendered = render_report(&view_with_rows(12), RenderOptions::default());
        assert_eq!(rendered.row_bands.len(), 12);
        for pair in rendered.row_bands.windows(2) {
            assert_eq!(pair[0].bottom, pair[1].top);
        }
        for band in &rendered.row_bands {
            assert_eq!(band.height(), ROW_H);
        }
        // The document ends a margin below the last row.
        let last = rendered.row_bands.last().unwrap();
        assert_eq!(rendered.height, last.bottom + MARGIN);
    }

    #[test]
    fn chart_only_view_has_no_bands() {
        let mut view = view_with_rows(0);
        view.table = None;
        let rendered = render_report(&view, RenderOptions::default());
        assert!(rendered.row_bands.is_empty());
        assert!(rendered.svg.contains("Aucune donnée"));
    }

    #[test]
    fn text_is_xml_escaped() {
        let mut view = view_with_rows(1);
        view.title = "Ventes & <promos>".into();
        let rendered = render_report(&view, RenderOptions::default());
        assert!(rendered.svg.contains("Ventes &amp; &lt;promos&gt;"));
    }

    #[test]
    fn export_mode_swaps_the_canvas_background() {
        let screen = render_report(&view_with_rows(1), RenderOptions::default());
        let export = render_report(&view_with_rows(1), RenderOptions { export_mode: true });
        assert!(screen.svg.contains("#f2f0ea"));
        assert!(export.svg.contains("#ffffff'/>"));
        assert_eq!(screen.row_bands, export.row_bands);
    }
}
