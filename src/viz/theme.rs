//! Color palettes for the three render themes. `auto` renders as light.

use crate::settings::Theme;
use plotters::style::RGBColor;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: RGBColor,
    /// Card behind each collage tile.
    pub surface: RGBColor,
    pub text: RGBColor,
    pub muted: RGBColor,
    pub grid: RGBColor,
    pub axis: RGBColor,
    /// Default series color and logo badge fill.
    pub accent: RGBColor,
    pub positive: RGBColor,
    pub negative: RGBColor,
}

const AVALANCHE_RED: RGBColor = RGBColor(232, 65, 66);

pub const LIGHT: Palette = Palette {
    background: RGBColor(255, 255, 255),
    surface: RGBColor(248, 250, 252),
    text: RGBColor(15, 23, 42),
    muted: RGBColor(100, 116, 139),
    grid: RGBColor(226, 232, 240),
    axis: RGBColor(148, 163, 184),
    accent: AVALANCHE_RED,
    positive: RGBColor(22, 163, 74),
    negative: RGBColor(220, 38, 38),
};

pub const DARK: Palette = Palette {
    background: RGBColor(9, 9, 11),
    surface: RGBColor(24, 24, 27),
    text: RGBColor(244, 244, 245),
    muted: RGBColor(161, 161, 170),
    grid: RGBColor(39, 39, 42),
    axis: RGBColor(82, 82, 91),
    accent: AVALANCHE_RED,
    positive: RGBColor(74, 222, 128),
    negative: RGBColor(248, 113, 113),
};

pub const RICH: Palette = Palette {
    background: RGBColor(30, 27, 75),
    surface: RGBColor(49, 46, 129),
    text: RGBColor(255, 255, 255),
    muted: RGBColor(199, 210, 254),
    grid: RGBColor(67, 56, 202),
    axis: RGBColor(129, 140, 248),
    accent: RGBColor(251, 113, 133),
    positive: RGBColor(52, 211, 153),
    negative: RGBColor(251, 113, 133),
};

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light | Theme::Auto => LIGHT,
        Theme::Dark => DARK,
        Theme::Rich => RICH,
    }
}
