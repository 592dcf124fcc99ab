//! Draw annotations onto the canvas, mapping their percentage coordinates onto
//! the plot area.

use super::chart::bold;
use super::layout::Rect;
use super::text::estimate_text_width_px;
use super::util::{parse_hex_color, with_opacity};
use crate::annotations::{
    Annotation, AnnotationShape, ArrowheadStyle, LineStyle, OverlayRect, PercentPoint,
};
use anyhow::{Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

const FALLBACK_COLOR: RGBColor = RGBColor(232, 65, 66);

type Px = (i32, i32);

/// Arrowhead triangle `[tip, left, right]` for an arrow ending at `end`.
pub fn arrowhead_points(start: (f64, f64), end: (f64, f64), len: f64) -> [(f64, f64); 3] {
    let (dx, dy) = (end.0 - start.0, end.1 - start.1);
    let norm = (dx * dx + dy * dy).sqrt();
    if norm < f64::EPSILON {
        return [end, end, end];
    }
    let (ux, uy) = (dx / norm, dy / norm);
    let base = (end.0 - ux * len, end.1 - uy * len);
    let half = len * 0.55;
    [
        end,
        (base.0 - uy * half, base.1 + ux * half),
        (base.0 + uy * half, base.1 - ux * half),
    ]
}

/// Split a polyline into dash segments of `dash` px separated by `gap` px.
pub fn dash_segments(points: &[(f64, f64)], dash: f64, gap: f64) -> Vec<[(f64, f64); 2]> {
    let mut out = Vec::new();
    if dash <= 0.0 {
        return out;
    }
    let period = dash + gap.max(0.0);
    let mut phase = 0.0;
    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        let seg = ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt();
        if seg < f64::EPSILON {
            continue;
        }
        let at = |d: f64| (a.0 + (b.0 - a.0) * d / seg, a.1 + (b.1 - a.1) * d / seg);
        let mut d = 0.0;
        while d < seg {
            let in_period = (phase + d) % period;
            if in_period < dash {
                let end = (d + dash - in_period).min(seg);
                out.push([at(d), at(end)]);
                d = end;
            } else {
                d += period - in_period;
            }
        }
        phase = (phase + seg) % period;
    }
    out
}

fn px(p: (f64, f64)) -> Px {
    (p.0.round() as i32, p.1.round() as i32)
}

fn draw_err<E: std::fmt::Debug>(e: E) -> anyhow::Error {
    anyhow!("{:?}", e)
}

fn stroke_path<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    points: &[(f64, f64)],
    style: ShapeStyle,
    dashed: bool,
    scale: f64,
) -> Result<()> {
    if dashed {
        for [a, b] in dash_segments(points, 8.0 * scale, 6.0 * scale) {
            root.draw(&PathElement::new(vec![px(a), px(b)], style))
                .map_err(draw_err)?;
        }
        return Ok(());
    }
    let pts: Vec<Px> = points.iter().copied().map(px).collect();
    root.draw(&PathElement::new(pts, style)).map_err(draw_err)
}

fn draw_one<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    a: &Annotation,
    frame: &OverlayRect,
    scale: f64,
    text: bool,
) -> Result<()> {
    let base = parse_hex_color(&a.color).unwrap_or(FALLBACK_COLOR);
    let color = with_opacity(base, a.opacity);
    let map = |x: f64, y: f64| frame.to_client(PercentPoint::new(x, y));

    match &a.shape {
        AnnotationShape::Highlight { x, y, size } => {
            let c = px(map(*x, *y));
            let r = (f64::from(size.pixels()) * scale).round() as i32;
            root.draw(&Circle::new(c, r, color.mix(0.25).filled()))
                .map_err(draw_err)?;
            root.draw(&Circle::new(c, r, color.stroke_width((2.0 * scale) as u32)))
                .map_err(draw_err)?;
            root.draw(&Circle::new(c, (r / 3).max(2), color.filled()))
                .map_err(draw_err)?;
        }
        AnnotationShape::Text {
            text: label,
            x,
            y,
            size,
            has_background,
        } => {
            if !text || label.trim().is_empty() {
                return Ok(());
            }
            let font_px = (f64::from(size.pixels()) + 6.0) * scale;
            let c = px(map(*x, *y));
            if *has_background {
                let w = estimate_text_width_px(label, font_px.round() as u32) as i32;
                let (pad_x, pad_y) = ((8.0 * scale) as i32, (5.0 * scale) as i32);
                let half_h = (font_px / 2.0) as i32 + pad_y;
                root.draw(&Rectangle::new(
                    [
                        (c.0 - w / 2 - pad_x, c.1 - half_h),
                        (c.0 + w / 2 + pad_x, c.1 + half_h),
                    ],
                    color.filled(),
                ))
                .map_err(draw_err)?;
                let ts = bold(font_px, WHITE).pos(Pos::new(HPos::Center, VPos::Center));
                root.draw_text(label, &ts, c).map_err(draw_err)?;
            } else {
                let ts = bold(font_px, base).pos(Pos::new(HPos::Center, VPos::Center));
                root.draw_text(label, &ts, c).map_err(draw_err)?;
            }
        }
        AnnotationShape::Arrow {
            start_x,
            start_y,
            end_x,
            end_y,
            size,
            line_style,
            arrowhead_style,
        } => {
            let start = map(*start_x, *start_y);
            let end = map(*end_x, *end_y);
            let width = ((f64::from(size.pixels()) / 4.0).max(2.0) * scale).round() as u32;
            let head_len = (8.0 + f64::from(size.pixels())) * scale;
            let head = arrowhead_points(start, end, head_len);
            let head_style = arrowhead_style.unwrap_or_default();
            // Stop the shaft at the head's base so a filled head stays sharp.
            let shaft_end = if head_style == ArrowheadStyle::None {
                end
            } else {
                ((head[1].0 + head[2].0) / 2.0, (head[1].1 + head[2].1) / 2.0)
            };
            let dashed = line_style.unwrap_or_default() == LineStyle::Dashed;
            stroke_path(root, &[start, shaft_end], color.stroke_width(width), dashed, scale)?;
            let tri: Vec<Px> = head.iter().copied().map(px).collect();
            match head_style {
                ArrowheadStyle::Filled => {
                    root.draw(&Polygon::new(tri, color.filled()))
                        .map_err(draw_err)?;
                }
                ArrowheadStyle::Outline => {
                    let mut closed = tri.clone();
                    closed.push(tri[0]);
                    root.draw(&PathElement::new(closed, color.stroke_width(width)))
                        .map_err(draw_err)?;
                }
                ArrowheadStyle::None => {}
            }
        }
        AnnotationShape::Freehand {
            points,
            stroke_width,
        } => {
            let pts: Vec<(f64, f64)> = points.iter().map(|p| map(p.x, p.y)).collect();
            let w = (stroke_width * scale).round().max(1.0) as u32;
            stroke_path(root, &pts, color.stroke_width(w), false, scale)?;
        }
        AnnotationShape::Rectangle {
            x,
            y,
            width,
            height,
            stroke_width,
        } => {
            let a0 = px(map(*x, *y));
            let a1 = px(map(x + width, y + height));
            let w = (stroke_width * scale).round().max(1.0) as u32;
            root.draw(&Rectangle::new([a0, a1], color.stroke_width(w)))
                .map_err(draw_err)?;
        }
    }
    Ok(())
}

/// Draw every annotation over `target` (root pixel coordinates), in list order.
pub fn draw_annotations<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    annotations: &[Annotation],
    target: Rect,
    scale: f64,
    text: bool,
) -> Result<()> {
    let frame = OverlayRect::new(
        f64::from(target.x),
        f64::from(target.y),
        f64::from(target.w),
        f64::from(target.h),
    );
    for a in annotations {
        draw_one(root, a, &frame, scale, text)?;
    }
    if !text && annotations.iter().any(|a| matches!(a.shape, AnnotationShape::Text { .. })) {
        log::warn!("text annotations skipped: no font available");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrowhead_tip_is_the_end_point() {
        let [tip, l, r] = arrowhead_points((0.0, 0.0), (100.0, 0.0), 10.0);
        assert_eq!(tip, (100.0, 0.0));
        assert!((l.0 - 90.0).abs() < 1e-9 && (r.0 - 90.0).abs() < 1e-9);
        assert!((l.1 + r.1).abs() < 1e-9);
    }

    #[test]
    fn dashes_cover_roughly_dash_fraction() {
        let segs = dash_segments(&[(0.0, 0.0), (100.0, 0.0)], 10.0, 10.0);
        assert_eq!(segs.len(), 5);
        assert_eq!(segs[1], [(20.0, 0.0), (30.0, 0.0)]);
    }
}
