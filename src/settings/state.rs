//! Reducer over [`ExportSettings`]: one action per sub-record, each carrying a typed
//! partial payload.

use super::presets::preset_settings;
use super::types::*;

/// Partial update of [`LogoSettings`]. `custom_url: Some(None)` clears the URL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogoPatch {
    pub kind: Option<LogoType>,
    pub position: Option<LogoPosition>,
    pub custom_url: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TitlePatch {
    pub style: Option<TitleStyle>,
    pub size: Option<TitleSize>,
    pub color: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackgroundPatch {
    pub kind: Option<BackgroundType>,
    pub color: Option<String>,
    pub gradient_from: Option<Option<String>>,
    pub gradient_to: Option<Option<String>>,
    pub gradient_direction: Option<Option<GradientDirection>>,
    pub border_radius: Option<Option<u32>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FooterPatch {
    pub position: Option<FooterPosition>,
    pub show_sources: Option<bool>,
    pub show_url: Option<bool>,
    pub show_qr_code: Option<bool>,
    pub show_capture_date: Option<bool>,
    pub visible: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WatermarkPatch {
    pub visible: Option<bool>,
    pub opacity: Option<u8>,
    pub position: Option<WatermarkPosition>,
    pub layer: Option<WatermarkLayer>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartDisplayPatch {
    pub show_data_labels: Option<bool>,
    pub show_grid_lines: Option<bool>,
    pub show_summary_stats: Option<bool>,
    pub show_trend_indicator: Option<bool>,
    pub show_avg_line: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportQualityPatch {
    pub resolution: Option<Resolution>,
    pub format: Option<ImageFormat>,
    pub jpeg_quality: Option<u8>,
}

fn merge<T>(slot: &mut T, v: Option<T>) {
    if let Some(v) = v {
        *slot = v;
    }
}

impl LogoPatch {
    fn apply(self, t: &mut LogoSettings) {
        merge(&mut t.kind, self.kind);
        merge(&mut t.position, self.position);
        merge(&mut t.custom_url, self.custom_url);
    }
}

impl TitlePatch {
    fn apply(self, t: &mut TitleSettings) {
        merge(&mut t.style, self.style);
        merge(&mut t.size, self.size);
        merge(&mut t.color, self.color);
    }
}

impl BackgroundPatch {
    fn apply(self, t: &mut BackgroundSettings) {
        merge(&mut t.kind, self.kind);
        merge(&mut t.color, self.color);
        merge(&mut t.gradient_from, self.gradient_from);
        merge(&mut t.gradient_to, self.gradient_to);
        merge(&mut t.gradient_direction, self.gradient_direction);
        merge(&mut t.border_radius, self.border_radius);
    }
}

impl FooterPatch {
    fn apply(self, t: &mut FooterSettings) {
        merge(&mut t.position, self.position);
        merge(&mut t.show_sources, self.show_sources);
        merge(&mut t.show_url, self.show_url);
        merge(&mut t.show_qr_code, self.show_qr_code);
        merge(&mut t.show_capture_date, self.show_capture_date);
        merge(&mut t.visible, self.visible);
    }
}

impl WatermarkPatch {
    fn apply(self, t: &mut WatermarkSettings) {
        merge(&mut t.visible, self.visible);
        merge(&mut t.opacity, self.opacity.map(|o| o.min(100)));
        merge(&mut t.position, self.position);
        merge(&mut t.layer, self.layer);
    }
}

impl ChartDisplayPatch {
    fn apply(self, t: &mut ChartDisplaySettings) {
        merge(&mut t.show_data_labels, self.show_data_labels);
        merge(&mut t.show_grid_lines, self.show_grid_lines);
        merge(&mut t.show_summary_stats, self.show_summary_stats);
        merge(&mut t.show_trend_indicator, self.show_trend_indicator);
        merge(&mut t.show_avg_line, self.show_avg_line);
    }
}

impl ExportQualityPatch {
    fn apply(self, t: &mut ExportQuality) {
        merge(&mut t.resolution, self.resolution);
        merge(&mut t.format, self.format);
        merge(&mut t.jpeg_quality, self.jpeg_quality.map(|q| q.clamp(1, 100)));
    }
}

/// Every state transition the settings panel can make.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsAction {
    SelectPreset(Preset),
    ResetToPreset,
    /// Replace all settings with a saved template's snapshot.
    ApplyTemplate(Box<ExportSettings>),
    SetAspectRatio(AspectRatio),
    SetPadding(Padding),
    SetChartType(ChartType),
    SetTheme(Theme),
    SetDescription(Option<String>),
    UpdateLogo(LogoPatch),
    UpdateTitle(TitlePatch),
    UpdateBackground(BackgroundPatch),
    UpdateFooter(FooterPatch),
    UpdateWatermark(WatermarkPatch),
    UpdateChartDisplay(ChartDisplayPatch),
    UpdateExportQuality(ExportQualityPatch),
}

/// Current settings plus the "customized since the preset was applied" flag.
///
/// Field setters never touch `settings.preset`; only selecting a preset does.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsState {
    settings: ExportSettings,
    is_customized: bool,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self::new(Preset::Default)
    }
}

impl SettingsState {
    pub fn new(preset: Preset) -> Self {
        Self {
            settings: preset_settings(preset),
            is_customized: false,
        }
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    pub fn is_customized(&self) -> bool {
        self.is_customized
    }

    pub fn preset(&self) -> Preset {
        self.settings.preset
    }

    /// Field-level comparison against the active preset's defaults.
    pub fn diverges_from_preset(&self) -> bool {
        self.settings != preset_settings(self.settings.preset)
    }

    pub fn dispatch(&mut self, action: SettingsAction) {
        let s = &mut self.settings;
        match action {
            SettingsAction::SelectPreset(preset) => {
                self.settings = preset_settings(preset);
                self.is_customized = false;
                return;
            }
            SettingsAction::ResetToPreset => {
                self.settings = preset_settings(self.settings.preset);
                self.is_customized = false;
                return;
            }
            SettingsAction::ApplyTemplate(settings) => *s = *settings,
            SettingsAction::SetAspectRatio(v) => s.aspect_ratio = v,
            SettingsAction::SetPadding(v) => s.padding = v,
            SettingsAction::SetChartType(v) => s.chart_type = v,
            SettingsAction::SetTheme(v) => s.theme = v,
            SettingsAction::SetDescription(v) => {
                s.description = v.map(|d| d.trim().to_string()).filter(|d| !d.is_empty())
            }
            SettingsAction::UpdateLogo(p) => p.apply(&mut s.logo),
            SettingsAction::UpdateTitle(p) => p.apply(&mut s.title),
            SettingsAction::UpdateBackground(p) => p.apply(&mut s.background),
            SettingsAction::UpdateFooter(p) => p.apply(&mut s.footer),
            SettingsAction::UpdateWatermark(p) => p.apply(&mut s.watermark),
            SettingsAction::UpdateChartDisplay(p) => p.apply(&mut s.chart_display),
            SettingsAction::UpdateExportQuality(p) => p.apply(&mut s.export_quality),
        }
        self.is_customized = true;
    }

    pub fn select_preset(&mut self, preset: Preset) {
        self.dispatch(SettingsAction::SelectPreset(preset));
    }

    pub fn reset_to_preset(&mut self) {
        self.dispatch(SettingsAction::ResetToPreset);
    }

    pub fn apply_template(&mut self, settings: ExportSettings) {
        self.dispatch(SettingsAction::ApplyTemplate(Box::new(settings)));
    }

    pub fn set_aspect_ratio(&mut self, v: AspectRatio) {
        self.dispatch(SettingsAction::SetAspectRatio(v));
    }

    pub fn set_padding(&mut self, v: Padding) {
        self.dispatch(SettingsAction::SetPadding(v));
    }

    pub fn set_chart_type(&mut self, v: ChartType) {
        self.dispatch(SettingsAction::SetChartType(v));
    }

    pub fn set_theme(&mut self, v: Theme) {
        self.dispatch(SettingsAction::SetTheme(v));
    }

    pub fn set_description(&mut self, v: Option<String>) {
        self.dispatch(SettingsAction::SetDescription(v));
    }

    pub fn update_logo(&mut self, p: LogoPatch) {
        self.dispatch(SettingsAction::UpdateLogo(p));
    }

    pub fn update_title(&mut self, p: TitlePatch) {
        self.dispatch(SettingsAction::UpdateTitle(p));
    }

    pub fn update_background(&mut self, p: BackgroundPatch) {
        self.dispatch(SettingsAction::UpdateBackground(p));
    }

    pub fn update_footer(&mut self, p: FooterPatch) {
        self.dispatch(SettingsAction::UpdateFooter(p));
    }

    pub fn update_watermark(&mut self, p: WatermarkPatch) {
        self.dispatch(SettingsAction::UpdateWatermark(p));
    }

    pub fn update_chart_display(&mut self, p: ChartDisplayPatch) {
        self.dispatch(SettingsAction::UpdateChartDisplay(p));
    }

    pub fn update_export_quality(&mut self, p: ExportQualityPatch) {
        self.dispatch(SettingsAction::UpdateExportQuality(p));
    }
}
