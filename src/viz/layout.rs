//! Pixel layout of an export: padding frame, header, chart, summary row and footer.

use crate::settings::{ExportSettings, LogoPosition, LogoType, TitleStyle};

/// Canvas width at 1x; height follows the aspect ratio.
pub const BASE_WIDTH: u32 = 1200;

/// Inner spacing between the padding frame and the content, at 1x.
const CONTENT_INSET: f64 = 24.0;
const LOGO_BAND: f64 = 48.0;
const DESCRIPTION_LINE: f64 = 22.0;
const STATS_ROW: f64 = 64.0;
const FOOTER_ROW: f64 = 32.0;
const MIN_CHART: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            x,
            y,
            w: w.max(0),
            h: h.max(0),
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn inset(&self, px: i32) -> Rect {
        let px = px.min(self.w / 2).min(self.h / 2).max(0);
        Rect::new(self.x + px, self.y + px, self.w - 2 * px, self.h - 2 * px)
    }

    /// Cut `h` pixels off the top: `(top, rest)`.
    pub fn split_top(&self, h: i32) -> (Rect, Rect) {
        let h = h.clamp(0, self.h);
        (
            Rect::new(self.x, self.y, self.w, h),
            Rect::new(self.x, self.y + h, self.w, self.h - h),
        )
    }

    /// Cut `h` pixels off the bottom: `(rest, bottom)`.
    pub fn split_bottom(&self, h: i32) -> (Rect, Rect) {
        let h = h.clamp(0, self.h);
        (
            Rect::new(self.x, self.y, self.w, self.h - h),
            Rect::new(self.x, self.bottom() - h, self.w, h),
        )
    }
}

/// Output pixel size: aspect ratio at [`BASE_WIDTH`] times the resolution factor.
pub fn canvas_size(settings: &ExportSettings) -> (u32, u32) {
    let (w, h) = settings.aspect_ratio.dimensions(BASE_WIDTH);
    let f = settings.export_quality.resolution.factor();
    (w * f, h * f)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    /// Device pixels per layout pixel (the resolution factor).
    pub scale: f64,
    /// Canvas minus padding; background and logo live here.
    pub frame: Rect,
    pub header: Option<Rect>,
    pub chart: Rect,
    pub stats: Option<Rect>,
    pub footer: Option<Rect>,
}

/// Lay out the export. `description_lines` is the wrapped description height in lines;
/// `text` is false when no font is available and text rows are dropped.
pub fn compute_layout(settings: &ExportSettings, description_lines: usize, text: bool) -> Layout {
    let (width, height) = canvas_size(settings);
    let scale = f64::from(settings.export_quality.resolution.factor());
    let px = |v: f64| (v * scale).round() as i32;

    let canvas = Rect::new(0, 0, width as i32, height as i32);
    let frame = canvas.inset(px(f64::from(settings.padding.px())));
    let content = frame.inset(px(CONTENT_INSET));

    let logo = settings.logo.kind != LogoType::None;
    let logo_top = logo
        && matches!(
            settings.logo.position,
            LogoPosition::TopLeft | LogoPosition::TopRight
        );
    let logo_bottom = logo && !logo_top;

    let mut header_h = 0.0;
    if text && settings.title.style != TitleStyle::Hidden {
        let title_px = f64::from(settings.title.size.font_px());
        let title_px = if settings.title.style == TitleStyle::Minimal {
            title_px * 0.75
        } else {
            title_px
        };
        header_h += title_px * 1.5;
    }
    if text {
        header_h += description_lines as f64 * DESCRIPTION_LINE;
    }
    if logo_top {
        header_h = header_h.max(LOGO_BAND);
    }
    if header_h > 0.0 {
        header_h += 8.0;
    }

    let mut footer_h = 0.0;
    if text && settings.footer.visible {
        footer_h = FOOTER_ROW;
    }
    if logo_bottom {
        footer_h = f64::max(footer_h, LOGO_BAND);
    }

    let stats_h = if text && settings.chart_display.show_summary_stats {
        STATS_ROW
    } else {
        0.0
    };

    let (header, rest) = content.split_top(px(header_h));
    let (rest, footer) = rest.split_bottom(px(footer_h));
    let (mut chart, stats) = rest.split_top(rest.h - px(stats_h));
    let mut stats = Some(stats).filter(|s| s.h > 0);
    if f64::from(chart.h) < MIN_CHART * scale {
        // Too cramped: give the summary row back to the chart.
        chart = rest;
        stats = None;
    }

    Layout {
        width,
        height,
        scale,
        frame,
        header: Some(header).filter(|r| r.h > 0),
        chart,
        stats,
        footer: Some(footer).filter(|r| r.h > 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Padding, Preset, Resolution, preset_settings};

    #[test]
    fn canvas_scales_with_resolution() {
        let mut s = preset_settings(Preset::Default);
        s.export_quality.resolution = Resolution::X1;
        assert_eq!(canvas_size(&s), (1200, 675));
        s.export_quality.resolution = Resolution::X3;
        assert_eq!(canvas_size(&s), (3600, 2025));
    }

    #[test]
    fn padding_shrinks_the_frame() {
        let mut s = preset_settings(Preset::Default);
        s.export_quality.resolution = Resolution::X2;
        s.padding = Padding::LG;
        let l = compute_layout(&s, 0, true);
        assert_eq!(l.frame, Rect::new(64, 64, 2400 - 128, 1350 - 128));
        assert!(l.chart.y >= l.frame.y);
        assert!(l.chart.bottom() <= l.frame.bottom());
    }

    #[test]
    fn without_text_only_logo_rows_remain() {
        let mut s = preset_settings(Preset::Default);
        s.logo.kind = LogoType::None;
        let l = compute_layout(&s, 2, false);
        assert_eq!(l.header, None);
        assert_eq!(l.footer, None);
        assert_eq!(l.stats, None);
    }
}
