//! Series charts drawn with plotters: one full-size chart or a grid of mini charts.

use super::fonts::FONT_FAMILY;
use super::layout::Rect;
use super::theme::Palette;
use super::util::{compute_left_label_area_px, format_compact, format_grouped};
use crate::models::ChartDataPoint;
use crate::settings::{ChartDisplaySettings, ChartType};
use crate::stats::{Summary, series_summary};
use anyhow::{Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::{AreaSeries, DashedLineSeries, LineSeries};
use plotters::style::FontStyle;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// Above this many points data labels are skipped.
const MAX_DATA_LABELS: usize = 40;

/// One series to draw.
#[derive(Debug, Clone)]
pub struct SeriesView<'a> {
    pub label: String,
    pub unit: String,
    pub color: RGBColor,
    pub chart_type: ChartType,
    pub data: &'a [ChartDataPoint],
    pub error: Option<&'a str>,
    pub loading: bool,
}

/// Render-wide knobs shared by every chart on the canvas.
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub display: ChartDisplaySettings,
    pub palette: Palette,
    pub scale: f64,
    pub text: bool,
}

pub(crate) fn font(px: f64, color: RGBColor) -> TextStyle<'static> {
    (FONT_FAMILY, px).into_font().color(&color)
}

pub(crate) fn bold(px: f64, color: RGBColor) -> TextStyle<'static> {
    (FONT_FAMILY, px)
        .into_font()
        .style(FontStyle::Bold)
        .color(&color)
}

/// Sub-area of `root` covering `r`.
pub(crate) fn sub_area<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    r: Rect,
) -> DrawingArea<DB, Shift> {
    let (w, h) = root.dim_in_pixel();
    root.margin(
        r.y,
        (h as i32 - r.bottom()).max(0),
        r.x,
        (w as i32 - r.right()).max(0),
    )
}

fn centered_note<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    msg: &str,
    style: &ChartStyle,
) -> Result<()> {
    if !style.text {
        return Ok(());
    }
    let (w, h) = area.dim_in_pixel();
    let ts = font(14.0 * style.scale, style.palette.muted)
        .pos(Pos::new(HPos::Center, VPos::Center));
    area.draw_text(msg, &ts, (w as i32 / 2, h as i32 / 2))
        .map_err(|e| anyhow!("{:?}", e))
}

/// Draw one series into `area`. Returns the plot area in root pixel coordinates,
/// or `None` when there was nothing to plot.
pub fn draw_series_chart<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    view: &SeriesView,
    style: &ChartStyle,
    compact: bool,
) -> Result<Option<Rect>> {
    if view.loading {
        centered_note(area, "Loading…", style)?;
        return Ok(None);
    }
    if let Some(err) = view.error {
        centered_note(area, err, style)?;
        return Ok(None);
    }
    let points: Vec<(f64, f64)> = view
        .data
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.value.filter(|v| v.is_finite()).map(|v| (i as f64, v)))
        .collect();
    if points.is_empty() {
        centered_note(area, "No data", style)?;
        return Ok(None);
    }

    let n = view.data.len();
    let pal = &style.palette;
    let s = style.scale;
    let lo = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min).min(0.0);
    let mut hi = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    if (hi - lo).abs() < f64::EPSILON {
        hi = lo + 1.0;
    }
    hi += (hi - lo) * 0.08;

    let label_px = (if compact { 11.0 } else { 13.0 }) * s;
    let (left, bottom) = if style.text {
        (
            compute_left_label_area_px(lo, hi, 5, label_px.round() as u32),
            (label_px * 2.2).round() as u32,
        )
    } else {
        (0, 0)
    };

    let dates: Vec<&str> = view.data.iter().map(|p| p.date_str().unwrap_or("")).collect();
    let x_fmt = |x: &f64| {
        let i = x.round();
        if i < 0.0 || (x - i).abs() > 0.01 {
            return String::new();
        }
        dates.get(i as usize).map(|d| d.to_string()).unwrap_or_default()
    };
    let y_fmt = |y: &f64| format_compact(*y);

    let mut chart = ChartBuilder::on(area)
        .margin((8.0 * s).round() as u32)
        .set_label_area_size(LabelAreaPosition::Left, left)
        .set_label_area_size(LabelAreaPosition::Bottom, bottom)
        .build_cartesian_2d(-0.5..(n as f64 - 0.5), lo..hi)
        .map_err(|e| anyhow!("{:?}", e))?;

    {
        let mut mesh = chart.configure_mesh();
        mesh.x_labels(if compact { 4 } else { 6 })
            .y_labels(5)
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .axis_style(pal.axis)
            .bold_line_style(pal.grid)
            .light_line_style(TRANSPARENT)
            .label_style(font(label_px, pal.muted));
        if !style.display.show_grid_lines {
            mesh.disable_mesh();
        }
        mesh.draw().map_err(|e| anyhow!("{:?}", e))?;
    }

    let stroke = ((2.0 * s).round() as u32).max(1);
    match view.chart_type {
        ChartType::Line => {
            chart
                .draw_series(LineSeries::new(points.clone(), view.color.stroke_width(stroke)))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
        ChartType::Area => {
            chart
                .draw_series(
                    AreaSeries::new(points.clone(), lo, view.color.mix(0.25).filled())
                        .border_style(view.color.stroke_width(stroke)),
                )
                .map_err(|e| anyhow!("{:?}", e))?;
        }
        ChartType::Bar => {
            let half = 0.38;
            chart
                .draw_series(points.iter().map(|(x, y)| {
                    Rectangle::new(
                        [(x - half, 0.0f64.min(*y)), (x + half, 0.0f64.max(*y))],
                        view.color.filled(),
                    )
                }))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
    }

    let summary = series_summary(view.data, "value");
    if style.display.show_avg_line
        && let Some(avg) = summary.mean
    {
        let dash = (6.0 * s).round() as u32;
        chart
            .draw_series(DashedLineSeries::new(
                vec![(-0.5, avg), (n as f64 - 0.5, avg)],
                dash,
                dash,
                pal.muted.stroke_width(stroke.div_ceil(2).max(1)),
            ))
            .map_err(|e| anyhow!("{:?}", e))?;
        if style.text && !compact {
            let ts = font(label_px, pal.muted).pos(Pos::new(HPos::Right, VPos::Bottom));
            chart
                .draw_series(std::iter::once(Text::new(
                    format!("avg {}", format_compact(avg)),
                    (n as f64 - 0.5, avg),
                    ts,
                )))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
    }

    if style.display.show_data_labels && style.text && points.len() <= MAX_DATA_LABELS {
        let ts = font(label_px * 0.9, pal.text).pos(Pos::new(HPos::Center, VPos::Bottom));
        let lift = (hi - lo) * 0.01;
        chart
            .draw_series(
                points
                    .iter()
                    .map(|(x, y)| Text::new(format_compact(*y), (*x, y + lift), ts.clone())),
            )
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    let (xr, yr) = chart.plotting_area().get_pixel_range();
    Ok(Some(Rect::new(xr.start, yr.start, xr.end - xr.start, yr.end - yr.start)))
}

/// Small up/down triangle plus the percent change, anchored at its right edge.
pub fn draw_trend<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    summary: &Summary,
    right: i32,
    center_y: i32,
    px: f64,
    style: &ChartStyle,
) -> Result<()> {
    let Some(change) = summary.change_pct else {
        return Ok(());
    };
    let pal = &style.palette;
    let color = match summary.trend() {
        1 => pal.positive,
        -1 => pal.negative,
        _ => pal.muted,
    };
    let label = format!("{change:+.1}%");
    let text_w = super::text::estimate_text_width_px(&label, px.round() as u32) as i32;
    let tri = (px * 0.45).round() as i32;
    let tx = right - text_w - tri * 3;
    let tip = if summary.trend() >= 0 { -tri } else { tri };
    root.draw(&Polygon::new(
        vec![
            (tx, center_y + tip),
            (tx - tri, center_y - tip),
            (tx + tri, center_y - tip),
        ],
        color.filled(),
    ))
    .map_err(|e| anyhow!("{:?}", e))?;
    if style.text {
        let ts = bold(px, color).pos(Pos::new(HPos::Right, VPos::Center));
        root.draw_text(&label, &ts, (right, center_y))
            .map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}

/// Summary row under the single chart: latest, average, min, max and total.
pub fn draw_summary_row<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    r: Rect,
    summary: &Summary,
    unit: &str,
    style: &ChartStyle,
) -> Result<()> {
    if !style.text {
        return Ok(());
    }
    let pal = &style.palette;
    let s = style.scale;
    let cells = [
        ("Latest", summary.latest),
        ("Average", summary.mean),
        ("Min", summary.min),
        ("Max", summary.max),
        ("Total", summary.total),
    ];
    let cell_w = r.w / cells.len() as i32;
    let label_ts = font(12.0 * s, pal.muted);
    let value_ts = bold(20.0 * s, pal.text);
    for (i, (label, value)) in cells.iter().enumerate() {
        let x = r.x + cell_w * i as i32;
        let y = r.y + (8.0 * s) as i32;
        root.draw_text(label, &label_ts, (x, y))
            .map_err(|e| anyhow!("{:?}", e))?;
        let shown = match value {
            Some(v) if unit.is_empty() => format_grouped(*v),
            Some(v) => format!("{} {unit}", format_compact(*v)),
            None => "–".to_string(),
        };
        root.draw_text(&shown, &value_ts, (x, y + (18.0 * s) as i32))
            .map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}

/// Columns of the collage grid for `n` tiles.
pub fn grid_columns(n: usize) -> usize {
    if n == 0 {
        return 1;
    }
    (n as f64).sqrt().ceil() as usize
}

/// Tile rectangles for `n` metrics inside `r`, row-major.
pub fn grid_cells(r: Rect, n: usize, gap: i32) -> Vec<Rect> {
    let cols = grid_columns(n) as i32;
    let rows = (n as i32 + cols - 1) / cols.max(1);
    if n == 0 || rows == 0 {
        return Vec::new();
    }
    let cw = (r.w - gap * (cols - 1)) / cols;
    let ch = (r.h - gap * (rows - 1)) / rows;
    (0..n as i32)
        .map(|i| {
            let (row, col) = (i / cols, i % cols);
            Rect::new(r.x + col * (cw + gap), r.y + row * (ch + gap), cw, ch)
        })
        .collect()
}

/// Collage: one card per metric with its label, latest value and mini chart.
pub fn draw_collage_grid<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    r: Rect,
    views: &[SeriesView],
    style: &ChartStyle,
) -> Result<()> {
    let s = style.scale;
    let pal = &style.palette;
    let gap = (12.0 * s).round() as i32;
    for (cell, view) in grid_cells(r, views.len(), gap).into_iter().zip(views) {
        root.draw(&Rectangle::new(
            [(cell.x, cell.y), (cell.right(), cell.bottom())],
            pal.surface.filled(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
        let inner = cell.inset((10.0 * s).round() as i32);
        let head_h = if style.text { (40.0 * s).round() as i32 } else { 0 };
        let (head, body) = inner.split_top(head_h);
        if style.text {
            let label_w = (head.w as f64 * 0.6) as u32;
            let label = super::text::truncate_to_width(
                &view.label,
                (13.0 * s).round() as u32,
                label_w,
            );
            root.draw_text(&label, &font(13.0 * s, pal.muted), (head.x, head.y))
                .map_err(|e| anyhow!("{:?}", e))?;
            let summary = series_summary(view.data, "value");
            if let Some(latest) = summary.latest {
                root.draw_text(
                    &format_compact(latest),
                    &bold(18.0 * s, pal.text),
                    (head.x, head.y + (16.0 * s) as i32),
                )
                .map_err(|e| anyhow!("{:?}", e))?;
            }
            if style.display.show_trend_indicator {
                let y = head.y + (8.0 * s) as i32;
                draw_trend(root, &summary, head.right(), y, 12.0 * s, style)?;
            }
        }
        let area = sub_area(root, body);
        draw_series_chart(&area, view, style, true)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_uses_ceil_sqrt_columns() {
        assert_eq!(grid_columns(1), 1);
        assert_eq!(grid_columns(4), 2);
        assert_eq!(grid_columns(5), 3);
        assert_eq!(grid_columns(9), 3);
        let cells = grid_cells(Rect::new(0, 0, 300, 200), 5, 0);
        assert_eq!(cells.len(), 5);
        assert_eq!(cells[3], Rect::new(0, 100, 100, 100));
    }
}
