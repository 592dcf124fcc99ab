//! Typed export settings. JSON uses camelCase names so template files stay portable.

use crate::error::StudioError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    Default,
    SocialMedia,
    SlideDeck,
    Collage,
    Customize,
}

impl Preset {
    /// Table order, also used by the numeric keyboard shortcuts.
    pub const ALL: [Preset; 5] = [
        Preset::Default,
        Preset::SocialMedia,
        Preset::SlideDeck,
        Preset::Collage,
        Preset::Customize,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Default => "default",
            Preset::SocialMedia => "social-media",
            Preset::SlideDeck => "slide-deck",
            Preset::Collage => "collage",
            Preset::Customize => "customize",
        }
    }

    pub fn parse(s: &str) -> Result<Self, StudioError> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| StudioError::UnknownPreset(s.to_string()))
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "4:3")]
    Standard,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "4:5")]
    Portrait,
    #[serde(rename = "9:16")]
    Story,
    #[serde(rename = "1.91:1")]
    OpenGraph,
}

impl AspectRatio {
    /// Width divided by height.
    pub fn ratio(&self) -> f64 {
        match self {
            AspectRatio::Landscape => 16.0 / 9.0,
            AspectRatio::Standard => 4.0 / 3.0,
            AspectRatio::Square => 1.0,
            AspectRatio::Portrait => 4.0 / 5.0,
            AspectRatio::Story => 9.0 / 16.0,
            AspectRatio::OpenGraph => 1.91,
        }
    }

    /// Pixel size for a canvas `base_width` wide.
    pub fn dimensions(&self, base_width: u32) -> (u32, u32) {
        let h = (base_width as f64 / self.ratio()).round() as u32;
        (base_width, h.max(1))
    }

    pub fn parse(s: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::String(s.trim().to_string())).ok()
    }
}

/// Outer padding in pixels; only 0, 8, 16, 24 and 32 are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Padding(u8);

impl Padding {
    pub const ALLOWED: [u8; 5] = [0, 8, 16, 24, 32];
    pub const NONE: Padding = Padding(0);
    pub const XS: Padding = Padding(8);
    pub const SM: Padding = Padding(16);
    pub const MD: Padding = Padding(24);
    pub const LG: Padding = Padding(32);

    pub fn new(px: u8) -> Result<Self, StudioError> {
        if Self::ALLOWED.contains(&px) {
            Ok(Padding(px))
        } else {
            Err(StudioError::InvalidPadding(px))
        }
    }

    pub fn px(&self) -> u32 {
        self.0 as u32
    }
}

impl TryFrom<u8> for Padding {
    type Error = StudioError;
    fn try_from(v: u8) -> Result<Self, Self::Error> {
        Padding::new(v)
    }
}

impl From<Padding> for u8 {
    fn from(p: Padding) -> u8 {
        p.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoType {
    Avalanche,
    Chain,
    Custom,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogoPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoSettings {
    #[serde(rename = "type")]
    pub kind: LogoType,
    pub position: LogoPosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleStyle {
    Default,
    Bold,
    Minimal,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleSize {
    Small,
    Medium,
    Large,
}

impl TitleSize {
    pub fn font_px(&self) -> u32 {
        match self {
            TitleSize::Small => 22,
            TitleSize::Medium => 30,
            TitleSize::Large => 40,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleSettings {
    pub style: TitleStyle,
    pub size: TitleSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundType {
    Solid,
    Gradient,
    Transparent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GradientDirection {
    ToRight,
    ToBottom,
    ToBottomRight,
    ToTopRight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundSettings {
    #[serde(rename = "type")]
    pub kind: BackgroundType,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_direction: Option<GradientDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FooterPosition {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterSettings {
    pub position: FooterPosition,
    pub show_sources: bool,
    pub show_url: bool,
    pub show_qr_code: bool,
    pub show_capture_date: bool,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Line,
    Bar,
    Area,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    Rich,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkPosition {
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatermarkLayer {
    Behind,
    Front,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatermarkSettings {
    pub visible: bool,
    /// 0..=100
    pub opacity: u8,
    pub position: WatermarkPosition,
    pub layer: WatermarkLayer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDisplaySettings {
    pub show_data_labels: bool,
    pub show_grid_lines: bool,
    pub show_summary_stats: bool,
    pub show_trend_indicator: bool,
    pub show_avg_line: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    #[serde(rename = "1x")]
    X1,
    #[serde(rename = "2x")]
    X2,
    #[serde(rename = "3x")]
    X3,
    #[serde(rename = "4x")]
    X4,
}

impl Resolution {
    pub fn factor(&self) -> u32 {
        match self {
            Resolution::X1 => 1,
            Resolution::X2 => 2,
            Resolution::X3 => 3,
            Resolution::X4 => 4,
        }
    }

    pub fn from_factor(f: u32) -> Option<Self> {
        match f {
            1 => Some(Resolution::X1),
            2 => Some(Resolution::X2),
            3 => Some(Resolution::X3),
            4 => Some(Resolution::X4),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Svg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Svg => "svg",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "svg" => Some(ImageFormat::Svg),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportQuality {
    pub resolution: Resolution,
    pub format: ImageFormat,
    /// 1..=100, used for JPEG only.
    pub jpeg_quality: u8,
}

/// Everything that controls how an exported image looks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSettings {
    pub preset: Preset,
    pub aspect_ratio: AspectRatio,
    pub padding: Padding,
    pub logo: LogoSettings,
    pub title: TitleSettings,
    pub background: BackgroundSettings,
    pub footer: FooterSettings,
    pub chart_type: ChartType,
    pub theme: Theme,
    pub watermark: WatermarkSettings,
    pub chart_display: ChartDisplaySettings,
    pub export_quality: ExportQuality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
