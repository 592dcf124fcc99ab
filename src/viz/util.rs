//! Colors, number formatting and axis sizing shared by the chart renderers.

use num_format::{Locale, ToFormattedString};
use plotters::prelude::*;

use super::text::estimate_text_width_px;

/// Fallback series palette (Office 2013+ chart colors).
const SERIES10: [RGBColor; 10] = [
    RGBColor(68, 114, 196),
    RGBColor(237, 125, 49),
    RGBColor(165, 165, 165),
    RGBColor(255, 192, 0),
    RGBColor(91, 155, 213),
    RGBColor(112, 173, 71),
    RGBColor(38, 68, 120),
    RGBColor(158, 72, 14),
    RGBColor(99, 99, 99),
    RGBColor(153, 115, 0),
];

#[inline]
pub fn series_color(idx: usize) -> RGBColor {
    SERIES10[idx % SERIES10.len()]
}

/// Parse `#rgb` or `#rrggbb` (the `#` is optional).
pub fn parse_hex_color(s: &str) -> Option<RGBColor> {
    let hex = s.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    let channel = |h: &str| u8::from_str_radix(h, 16).ok();
    match hex.len() {
        3 => {
            let mut it = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            Some(RGBColor(it.next()??, it.next()??, it.next()??))
        }
        6 => Some(RGBColor(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => None,
    }
}

/// Color with a 0..=100 opacity.
pub fn with_opacity(c: RGBColor, opacity_pct: u8) -> RGBAColor {
    c.mix(f64::from(opacity_pct.min(100)) / 100.0)
}

/// Linear blend between two colors, `t` in `0..=1`.
pub fn lerp_color(a: RGBColor, b: RGBColor, t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let ch = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * t).round() as u8;
    RGBColor(ch(a.0, b.0), ch(a.1, b.1), ch(a.2, b.2))
}

/// Pick an axis divisor and its suffix from the overall magnitude, e.g. `(1e6, "M")`.
pub fn choose_axis_scale(max_abs: f64) -> (f64, &'static str) {
    if max_abs >= 1.0e12 {
        (1.0e12, "T")
    } else if max_abs >= 1.0e9 {
        (1.0e9, "B")
    } else if max_abs >= 1.0e6 {
        (1.0e6, "M")
    } else if max_abs >= 1.0e3 {
        (1.0e3, "K")
    } else {
        (1.0, "")
    }
}

/// Short label for ticks and data labels: `950`, `12.5K`, `3.1M`.
pub fn format_compact(v: f64) -> String {
    if !v.is_finite() {
        return String::new();
    }
    let (scale, suffix) = choose_axis_scale(v.abs());
    let s = v / scale;
    let prec = if suffix.is_empty() && s.fract() == 0.0 {
        0
    } else if s.abs() >= 100.0 {
        0
    } else if s.abs() >= 10.0 {
        1
    } else {
        2
    };
    let txt = format!("{s:.prec$}");
    let txt = if txt.contains('.') {
        txt.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        txt
    };
    format!("{txt}{suffix}")
}

/// Full number with thousands separators, for the summary row.
pub fn format_grouped(v: f64) -> String {
    if !v.is_finite() {
        return String::new();
    }
    if v.abs() >= 1.0e15 || (v.fract() != 0.0 && v.abs() < 1000.0) {
        return format_compact(v);
    }
    let rounded = v.round() as i64;
    rounded.to_formatted_string(&Locale::en)
}

/// Width of the left label area needed for the tick labels in `ymin..ymax`.
pub fn compute_left_label_area_px(ymin: f64, ymax: f64, ticks: usize, font_px: u32) -> u32 {
    let widest = (0..=ticks)
        .map(|i| {
            let t = if ticks == 0 { 0.0 } else { i as f64 / ticks as f64 };
            format_compact(ymin + (ymax - ymin) * t)
        })
        .map(|s| estimate_text_width_px(&s, font_px))
        .max()
        .unwrap_or(0);
    widest.saturating_add(16).clamp(36, 120)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse_short_and_long_forms() {
        assert_eq!(parse_hex_color("#e84142"), Some(RGBColor(0xe8, 0x41, 0x42)));
        assert_eq!(parse_hex_color("fff"), Some(RGBColor(255, 255, 255)));
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn compact_numbers_drop_trailing_zeros() {
        assert_eq!(format_compact(950.0), "950");
        assert_eq!(format_compact(12_500.0), "12.5K");
        assert_eq!(format_compact(3_000_000.0), "3M");
        assert_eq!(format_grouped(1_234_567.0), "1,234,567");
    }
}
