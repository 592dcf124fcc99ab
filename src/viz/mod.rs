//! Export composition: background, header, chart or collage grid, summary row,
//! footer, watermark and the annotation overlay, drawn onto any plotters backend.
//!
//! - Canvas is 1200 px wide at 1x, height from the aspect ratio; the resolution
//!   factor multiplies every size
//! - Themes `light`, `dark`, `rich` (`auto` renders as light)
//! - Text needs a registered font (see [`fonts`]); without one the image is still
//!   produced with text elements left out

pub mod chart;
pub mod fonts;
pub mod layout;
pub mod overlay;
pub mod text;
pub mod theme;
pub mod util;

pub use chart::{ChartStyle, SeriesView, grid_columns};
pub use layout::{BASE_WIDTH, Layout, Rect, canvas_size, compute_layout};
pub use theme::{Palette, palette};

use crate::annotations::Annotation;
use crate::collage::CollageMetricData;
use crate::models::ChartDataPoint;
use crate::settings::{
    BackgroundType, ExportSettings, FooterPosition, FooterSettings, GradientDirection, LogoPosition,
    LogoType, TitleStyle, WatermarkLayer, WatermarkPosition,
};
use crate::stats::series_summary;
use anyhow::{Result, anyhow};
use chart::{
    bold, draw_collage_grid, draw_series_chart, draw_summary_row, draw_trend, font, sub_area,
};
use chrono::NaiveDate;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontStyle;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use util::{lerp_color, parse_hex_color, with_opacity};

pub const DEFAULT_SOURCE: &str = "Avalanche Builder Hub";
pub const DEFAULT_URL: &str = "build.avax.network";
pub const DEFAULT_WATERMARK: &str = "Avalanche Builder Hub";

const GRADIENT_STEPS: usize = 48;
const DESCRIPTION_PX: f64 = 15.0;

/// What the footer can mention.
#[derive(Debug, Clone, PartialEq)]
pub struct FooterInfo {
    pub sources: Vec<String>,
    pub url: Option<String>,
    pub capture_date: NaiveDate,
}

impl FooterInfo {
    pub fn new(capture_date: NaiveDate) -> Self {
        Self {
            sources: vec![DEFAULT_SOURCE.to_string()],
            url: Some(DEFAULT_URL.to_string()),
            capture_date,
        }
    }
}

/// Footer line for the enabled parts, joined with ` · `.
pub fn footer_text(settings: &FooterSettings, info: &FooterInfo) -> String {
    let mut parts: Vec<String> = Vec::new();
    if settings.show_sources {
        let sources: Vec<&str> = info
            .sources
            .iter()
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
            .collect();
        let joined = if sources.is_empty() {
            DEFAULT_SOURCE.to_string()
        } else {
            sources.join(", ")
        };
        parts.push(format!("Source: {joined}"));
    }
    if settings.show_url
        && let Some(url) = info.url.as_deref().filter(|u| !u.is_empty())
    {
        parts.push(url.to_string());
    }
    if settings.show_capture_date {
        parts.push(format!("Captured {}", info.capture_date.format("%b %-d, %Y")));
    }
    parts.join(" · ")
}

#[derive(Debug, Clone)]
pub enum ChartContent<'a> {
    Single(SeriesView<'a>),
    Collage(Vec<SeriesView<'a>>),
}

/// Everything drawn into one exported image.
#[derive(Debug, Clone)]
pub struct Composition<'a> {
    pub settings: &'a ExportSettings,
    pub title: String,
    pub chain_name: Option<String>,
    pub content: ChartContent<'a>,
    pub annotations: &'a [Annotation],
    pub footer: FooterInfo,
    pub watermark_text: String,
}

impl<'a> Composition<'a> {
    fn base(settings: &'a ExportSettings, title: &str, content: ChartContent<'a>) -> Self {
        Self {
            settings,
            title: title.to_string(),
            chain_name: None,
            content,
            annotations: &[],
            footer: FooterInfo::new(chrono::Local::now().date_naive()),
            watermark_text: DEFAULT_WATERMARK.to_string(),
        }
    }

    /// One chart of `data.value` in the settings' chart type and the theme accent.
    pub fn single(settings: &'a ExportSettings, title: &str, data: &'a [ChartDataPoint]) -> Self {
        let view = SeriesView {
            label: title.to_string(),
            unit: String::new(),
            color: palette(settings.theme).accent,
            chart_type: settings.chart_type,
            data,
            error: None,
            loading: false,
        };
        Self::base(settings, title, ChartContent::Single(view))
    }

    /// A grid with one tile per metric, each in its registry color and chart type.
    pub fn collage(
        settings: &'a ExportSettings,
        title: &str,
        metrics: &[&'a CollageMetricData],
    ) -> Self {
        let views = metrics
            .iter()
            .enumerate()
            .map(|(i, m)| SeriesView {
                label: m.config.label.to_string(),
                unit: m.config.unit.to_string(),
                color: parse_hex_color(m.config.color).unwrap_or_else(|| util::series_color(i)),
                chart_type: m.config.chart_type,
                data: &m.data,
                error: m.error.as_deref(),
                loading: m.is_loading,
            })
            .collect();
        Self::base(settings, title, ChartContent::Collage(views))
    }

    pub fn with_annotations(mut self, annotations: &'a [Annotation]) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn with_footer(mut self, footer: FooterInfo) -> Self {
        self.footer = footer;
        self
    }

    pub fn with_chain_name(mut self, name: impl Into<String>) -> Self {
        self.chain_name = Some(name.into());
        self
    }
}

/// Backend capabilities that change how a composition is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// A font is registered.
    pub text: bool,
    /// The backend keeps unpainted pixels transparent (SVG).
    pub supports_transparency: bool,
}

fn draw_err<E: std::fmt::Debug>(e: E) -> anyhow::Error {
    anyhow!("{:?}", e)
}

fn fill_rect<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    r: Rect,
    c: RGBColor,
) -> Result<()> {
    root.draw(&Rectangle::new([(r.x, r.y), (r.right(), r.bottom())], c.filled()))
        .map_err(draw_err)
}

/// Linear gradient as painter's-order bands; shapes reaching past `r` are clipped
/// by the backend.
fn draw_gradient<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    r: Rect,
    from: RGBColor,
    to: RGBColor,
    dir: GradientDirection,
) -> Result<()> {
    let (w, h) = (f64::from(r.w), f64::from(r.h));
    let (x0, y0, y1) = (f64::from(r.x), f64::from(r.y), f64::from(r.bottom()));
    for i in (0..GRADIENT_STEPS).rev() {
        let s = (i + 1) as f64 / GRADIENT_STEPS as f64;
        let color = lerp_color(from, to, (i as f64 + 0.5) / GRADIENT_STEPS as f64);
        let pts: Vec<(f64, f64)> = match dir {
            GradientDirection::ToRight => {
                vec![(x0, y0), (x0 + s * w, y0), (x0 + s * w, y1), (x0, y1)]
            }
            GradientDirection::ToBottom => {
                vec![(x0, y0), (x0 + w, y0), (x0 + w, y0 + s * h), (x0, y0 + s * h)]
            }
            GradientDirection::ToBottomRight => {
                vec![(x0, y0), (x0 + 2.0 * s * w, y0), (x0, y0 + 2.0 * s * h)]
            }
            GradientDirection::ToTopRight => {
                vec![(x0, y1), (x0 + 2.0 * s * w, y1), (x0, y1 - 2.0 * s * h)]
            }
        };
        let pts: Vec<(i32, i32)> = pts
            .into_iter()
            .map(|(x, y)| (x.round() as i32, y.round() as i32))
            .collect();
        root.draw(&Polygon::new(pts, color.filled())).map_err(draw_err)?;
    }
    Ok(())
}

fn draw_background<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    canvas: Rect,
    settings: &ExportSettings,
    pal: &Palette,
    opts: RenderOptions,
) -> Result<()> {
    let bg = &settings.background;
    let solid = parse_hex_color(&bg.color).unwrap_or(pal.background);
    match bg.kind {
        BackgroundType::Solid => fill_rect(root, canvas, solid),
        BackgroundType::Gradient => {
            let from = bg
                .gradient_from
                .as_deref()
                .and_then(parse_hex_color)
                .unwrap_or(solid);
            let to = bg
                .gradient_to
                .as_deref()
                .and_then(parse_hex_color)
                .unwrap_or(pal.surface);
            let dir = bg.gradient_direction.unwrap_or(GradientDirection::ToBottomRight);
            draw_gradient(root, canvas, from, to, dir)
        }
        BackgroundType::Transparent if opts.supports_transparency => Ok(()),
        BackgroundType::Transparent => {
            log::debug!("raster target without alpha; transparent background uses the theme color");
            fill_rect(root, canvas, pal.background)
        }
    }
}

fn draw_watermark<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    comp: &Composition,
    layout: &Layout,
    pal: &Palette,
) -> Result<()> {
    let wm = &comp.settings.watermark;
    let s = layout.scale;
    let inner = layout.frame.inset((16.0 * s) as i32);
    let (px, pos, at) = match wm.position {
        WatermarkPosition::Center => (
            64.0,
            Pos::new(HPos::Center, VPos::Center),
            (inner.x + inner.w / 2, inner.y + inner.h / 2),
        ),
        WatermarkPosition::TopLeft => (18.0, Pos::new(HPos::Left, VPos::Top), (inner.x, inner.y)),
        WatermarkPosition::TopRight => {
            (18.0, Pos::new(HPos::Right, VPos::Top), (inner.right(), inner.y))
        }
        WatermarkPosition::BottomLeft => {
            (18.0, Pos::new(HPos::Left, VPos::Bottom), (inner.x, inner.bottom()))
        }
        WatermarkPosition::BottomRight => (
            18.0,
            Pos::new(HPos::Right, VPos::Bottom),
            (inner.right(), inner.bottom()),
        ),
    };
    let color = with_opacity(pal.text, wm.opacity);
    let ts = (fonts::FONT_FAMILY, px * s)
        .into_font()
        .style(FontStyle::Bold)
        .color(&color)
        .pos(pos);
    root.draw_text(&comp.watermark_text, &ts, at).map_err(draw_err)
}

/// Badge radius at 1x.
const LOGO_RADIUS: f64 = 18.0;

/// Draw the logo badge; returns the horizontal space it occupies.
fn draw_logo<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    comp: &Composition,
    layout: &Layout,
    pal: &Palette,
    opts: RenderOptions,
) -> Result<i32> {
    let logo = &comp.settings.logo;
    if logo.kind == LogoType::None {
        return Ok(0);
    }
    let s = layout.scale;
    let r = (LOGO_RADIUS * s).round() as i32;
    let content = layout.frame.inset((24.0 * s).round() as i32);
    let cx = match logo.position {
        LogoPosition::TopLeft | LogoPosition::BottomLeft => content.x + r,
        LogoPosition::TopRight | LogoPosition::BottomRight => content.right() - r,
    };
    let cy = match logo.position {
        LogoPosition::TopLeft | LogoPosition::TopRight => content.y + r,
        LogoPosition::BottomLeft | LogoPosition::BottomRight => content.bottom() - r,
    };

    match logo.kind {
        LogoType::Avalanche => {
            root.draw(&Circle::new((cx, cy), r, pal.accent.filled()))
                .map_err(draw_err)?;
            let t = r / 2;
            root.draw(&Polygon::new(
                vec![(cx, cy - t), (cx - t, cy + t * 3 / 4), (cx + t, cy + t * 3 / 4)],
                WHITE.filled(),
            ))
            .map_err(draw_err)?;
        }
        LogoType::Chain | LogoType::Custom => {
            if logo.kind == LogoType::Custom {
                log::debug!(
                    "custom logo {:?} is drawn as a monogram badge",
                    logo.custom_url
                );
            }
            root.draw(&Circle::new((cx, cy), r, pal.surface.filled()))
                .map_err(draw_err)?;
            root.draw(&Circle::new((cx, cy), r, pal.axis.stroke_width((1.5 * s) as u32)))
                .map_err(draw_err)?;
            let initial = comp
                .chain_name
                .as_deref()
                .or(Some(comp.title.as_str()))
                .and_then(|n| n.trim().chars().next())
                .map(|c| c.to_uppercase().to_string());
            if opts.text
                && let Some(initial) = initial
            {
                let ts = bold(f64::from(r), pal.text).pos(Pos::new(HPos::Center, VPos::Center));
                root.draw_text(&initial, &ts, (cx, cy)).map_err(draw_err)?;
            }
        }
        LogoType::None => {}
    }
    Ok(2 * r + (12.0 * s).round() as i32)
}

fn draw_header<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    comp: &Composition,
    header: Rect,
    description: &[String],
    logo_w: i32,
    pal: &Palette,
) -> Result<()> {
    let settings = comp.settings;
    let s = f64::from(settings.export_quality.resolution.factor());
    let left = if settings.logo.position == LogoPosition::TopLeft {
        header.x + logo_w
    } else {
        header.x
    };
    let logo_reserve = if settings.logo.position == LogoPosition::TopRight {
        logo_w
    } else {
        0
    };
    // Keep room for the trend indicator on the right.
    let right_reserve = logo_reserve + (140.0 * s) as i32;

    let mut y = header.y;
    if settings.title.style != TitleStyle::Hidden && !comp.title.trim().is_empty() {
        let mut title_px = f64::from(settings.title.size.font_px());
        let mut color = pal.text;
        if settings.title.style == TitleStyle::Minimal {
            title_px *= 0.75;
            color = pal.muted;
        }
        if let Some(c) = settings.title.color.as_deref().and_then(parse_hex_color) {
            color = c;
        }
        let title_px = title_px * s;
        let ts = if settings.title.style == TitleStyle::Bold {
            bold(title_px, color)
        } else {
            font(title_px, color)
        };
        let max_w = (header.right() - left - right_reserve).max(0) as u32;
        let title = text::truncate_to_width(comp.title.trim(), title_px.round() as u32, max_w);
        root.draw_text(&title, &ts, (left, y)).map_err(draw_err)?;
        y += (title_px * 1.5).round() as i32;
    }
    let desc_ts = font(DESCRIPTION_PX * s, pal.muted);
    for line in description {
        root.draw_text(line, &desc_ts, (left, y)).map_err(draw_err)?;
        y += (22.0 * s).round() as i32;
    }
    Ok(())
}

fn draw_footer<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    comp: &Composition,
    footer: Rect,
    logo_w: i32,
    pal: &Palette,
) -> Result<()> {
    let settings = &comp.settings.footer;
    if !settings.visible {
        return Ok(());
    }
    if settings.show_qr_code {
        log::debug!("QR code footer element is not rendered");
    }
    let line = footer_text(settings, &comp.footer);
    if line.is_empty() {
        return Ok(());
    }
    let s = f64::from(comp.settings.export_quality.resolution.factor());
    let logo_pos = comp.settings.logo.position;
    let left = footer.x
        + if logo_pos == LogoPosition::BottomLeft {
            logo_w
        } else {
            0
        };
    let right = footer.right()
        - if logo_pos == LogoPosition::BottomRight {
            logo_w
        } else {
            0
        };
    let cy = footer.y + footer.h / 2;
    let (hpos, x) = match settings.position {
        FooterPosition::Left => (HPos::Left, left),
        FooterPosition::Center => (HPos::Center, (left + right) / 2),
        FooterPosition::Right => (HPos::Right, right),
    };
    let px = 13.0 * s;
    let line = text::truncate_to_width(&line, px.round() as u32, (right - left).max(0) as u32);
    let ts = font(px, pal.muted).pos(Pos::new(hpos, VPos::Center));
    root.draw_text(&line, &ts, (x, cy)).map_err(draw_err)
}

/// Draw `comp` onto `root`, which must be sized by [`canvas_size`].
pub fn draw_composition<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    comp: &Composition,
    opts: RenderOptions,
) -> Result<()> {
    let settings = comp.settings;
    let pal = palette(settings.theme);
    let s = f64::from(settings.export_quality.resolution.factor());

    // Description wraps against the content width, which only depends on padding.
    let content_w = {
        let probe = compute_layout(settings, 0, opts.text);
        probe.frame.inset((24.0 * s).round() as i32).w
    };
    let description: Vec<String> = match settings.description.as_deref() {
        Some(d) if opts.text => text::wrap_text_to_width(
            d,
            (DESCRIPTION_PX * s).round() as u32,
            content_w.max(0) as u32,
            2,
        ),
        _ => Vec::new(),
    };
    let layout = compute_layout(settings, description.len(), opts.text);
    let canvas = Rect::new(0, 0, layout.width as i32, layout.height as i32);

    draw_background(root, canvas, settings, &pal, opts)?;
    let watermark = settings.watermark.visible && opts.text && !comp.watermark_text.is_empty();
    if watermark && settings.watermark.layer == WatermarkLayer::Behind {
        draw_watermark(root, comp, &layout, &pal)?;
    }

    let logo_w = draw_logo(root, comp, &layout, &pal, opts)?;
    if opts.text
        && let Some(header) = layout.header
    {
        draw_header(root, comp, header, &description, logo_w, &pal)?;
    }

    let style = ChartStyle {
        display: settings.chart_display.clone(),
        palette: pal,
        scale: layout.scale,
        text: opts.text,
    };
    let overlay_target = match &comp.content {
        ChartContent::Single(view) => {
            let area = sub_area(root, layout.chart);
            let plot = draw_series_chart(&area, view, &style, false)?;
            let summary = series_summary(view.data, "value");
            if settings.chart_display.show_trend_indicator
                && let Some(header) = layout.header
            {
                let reserve = if settings.logo.position == LogoPosition::TopRight {
                    logo_w
                } else {
                    0
                };
                let cy = header.y + (f64::from(settings.title.size.font_px()) * s * 0.6) as i32;
                draw_trend(root, &summary, header.right() - reserve, cy, 16.0 * s, &style)?;
            }
            if let Some(stats) = layout.stats {
                draw_summary_row(root, stats, &summary, &view.unit, &style)?;
            }
            plot.unwrap_or(layout.chart)
        }
        ChartContent::Collage(views) => {
            draw_collage_grid(root, layout.chart, views, &style)?;
            layout.chart
        }
    };

    if opts.text
        && let Some(footer) = layout.footer
    {
        draw_footer(root, comp, footer, logo_w, &pal)?;
    }

    overlay::draw_annotations(root, comp.annotations, overlay_target, layout.scale, opts.text)?;

    if watermark && settings.watermark.layer == WatermarkLayer::Front {
        draw_watermark(root, comp, &layout, &pal)?;
    }

    root.present().map_err(draw_err)?;
    Ok(())
}
