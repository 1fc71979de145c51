use crate::histogram::{Beam, Hist1D};

use super::axes::{format_tick, Axis};
use super::canvas::{Anchor, SvgCanvas, TextStyle};
use super::color::{Color, MarkerShape};

// Pad margins as fractions of the canvas.
const MARGIN_LEFT: f64 = 0.16;
const MARGIN_RIGHT: f64 = 0.04;
const MARGIN_TOP: f64 = 0.08;
const MARGIN_BOTTOM: f64 = 0.13;

// Legend box in normalized canvas coordinates, y measured upwards.
const LEGEND_X1: f64 = 0.20;
const LEGEND_X2: f64 = 0.50;
const LEGEND_Y1: f64 = 0.75;
const LEGEND_Y2: f64 = 0.875;

/// One histogram drawn on a plot.
pub(crate) struct PlotEntry<'a> {
    pub hist: &'a Hist1D,
    pub label: String,
    pub color: Color,
    pub marker: MarkerShape,
}

/// Header text naming the collision system.
pub(crate) fn beam_header(beam: Option<Beam>) -> &'static str {
    match beam {
        Some(Beam::PPb) => "pPb 8.16 TeV",
        Some(Beam::Pbp) => "Pbp 8.16 TeV",
        Some(Beam::PP) => "pp 8.16 TeV",
        Some(Beam::PA) | None => "pPb + Pbp 8.16 TeV",
    }
}

/// Draw `entries` on one canvas and return the SVG document.
///
/// Axis titles and the x range come from the first entry. The legend is
/// only drawn when more than one histogram shares the canvas.
pub(crate) fn draw_plot(
    entries: &[PlotEntry<'_>],
    width: u32,
    height: u32,
    beam: Option<Beam>,
) -> String {
    let w = width as f64;
    let h = height as f64;
    let mut canvas = SvgCanvas::new(w, h);
    let Some(first) = entries.first() else {
        return canvas.finish_svg();
    };

    let y_max = entries
        .iter()
        .map(|e| e.hist.max_with_error())
        .fold(0.0, f64::max);
    let y_max = if y_max > 0.0 { 1.1 * y_max } else { 1.0 };

    let x_axis = Axis {
        min: first.hist.x_min(),
        max: first.hist.x_max(),
        px_min: MARGIN_LEFT * w,
        px_max: (1.0 - MARGIN_RIGHT) * w,
    };
    let y_axis = Axis {
        min: 0.0,
        max: y_max,
        px_min: (1.0 - MARGIN_BOTTOM) * h,
        px_max: MARGIN_TOP * h,
    };

    let font = 0.035 * h;
    let tick_len = 0.015 * h;
    canvas.rect(
        x_axis.px_min,
        y_axis.px_max,
        x_axis.px_max - x_axis.px_min,
        y_axis.px_min - y_axis.px_max,
        Color::BLACK,
        2.0,
    );

    let (x_ticks, x_step) = x_axis.ticks(5);
    for value in x_ticks {
        let px = x_axis.to_pixel(value);
        canvas.line(px, y_axis.px_min, px, y_axis.px_min - tick_len, Color::BLACK, 1.5);
        canvas.text(
            px,
            y_axis.px_min + 1.2 * font,
            &format_tick(value, x_step),
            &TextStyle::new(font, Anchor::Middle),
        );
    }
    let (y_ticks, y_step) = y_axis.ticks(6);
    for value in y_ticks {
        let py = y_axis.to_pixel(value);
        canvas.line(x_axis.px_min, py, x_axis.px_min + tick_len, py, Color::BLACK, 1.5);
        canvas.text(
            x_axis.px_min - 0.4 * font,
            py + 0.35 * font,
            &format_tick(value, y_step),
            &TextStyle::new(font, Anchor::End),
        );
    }

    canvas.text(
        x_axis.px_max,
        h - 0.03 * h,
        &first.hist.x_title,
        &TextStyle::new(font, Anchor::End),
    );
    canvas.text(
        0.04 * w,
        y_axis.px_max,
        &first.hist.y_title,
        &TextStyle::new(font, Anchor::End).rotated(-90.0),
    );

    let marker_size = 0.012 * h;
    for entry in entries {
        let hist = entry.hist;
        for bin in 0..hist.n_bins() {
            let content = hist.bin_content[bin];
            if content == 0.0 {
                continue;
            }
            let center = hist.bin_center(bin);
            if center < x_axis.min || center > x_axis.max {
                continue;
            }
            let px = x_axis.to_pixel(center);
            let error = hist.bin_error(bin);
            canvas.error_bar(
                px,
                y_axis.to_pixel((content - error).max(0.0)),
                y_axis.to_pixel((content + error).min(y_max)),
                entry.color,
                1.5,
            );
            canvas.marker(px, y_axis.to_pixel(content), marker_size, entry.marker, entry.color);
        }
    }

    if entries.len() > 1 {
        draw_legend(&mut canvas, entries, font);
    }

    canvas.text(
        x_axis.px_min,
        y_axis.px_max - 0.3 * font,
        "CMS",
        &TextStyle::new(font * 1.1, Anchor::Start).bold(),
    );
    canvas.text(
        x_axis.px_max,
        y_axis.px_max - 0.3 * font,
        beam_header(beam),
        &TextStyle::new(font, Anchor::End),
    );

    canvas.finish_svg()
}

fn draw_legend(canvas: &mut SvgCanvas, entries: &[PlotEntry<'_>], font: f64) {
    let (w, h) = (canvas.width, canvas.height);
    let x1 = LEGEND_X1 * w;
    let x2 = LEGEND_X2 * w;
    let top = (1.0 - LEGEND_Y2) * h;
    let bottom = (1.0 - LEGEND_Y1) * h;
    let row = (bottom - top) / entries.len() as f64;
    let size = (0.8 * font).min(0.9 * row);
    canvas.rect(x1, top, x2 - x1, bottom - top, Color::BLACK, 1.0);

    for (i, entry) in entries.iter().enumerate() {
        let cy = top + (i as f64 + 0.5) * row;
        canvas.marker(x1 + 0.6 * size, cy, 0.6 * size, entry.marker, entry.color);
        canvas.plain_text(
            x1 + 1.5 * size,
            cy + 0.35 * size,
            &entry.label,
            &TextStyle::new(size, Anchor::Start),
        );
    }
}
