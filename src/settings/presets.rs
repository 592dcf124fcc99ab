use super::types::*;

/// Complete default settings for `preset`.
pub fn preset_settings(preset: Preset) -> ExportSettings {
    match preset {
        Preset::Default => ExportSettings {
            preset,
            aspect_ratio: AspectRatio::Landscape,
            padding: Padding::SM,
            logo: LogoSettings {
                kind: LogoType::Avalanche,
                position: LogoPosition::TopLeft,
                custom_url: None,
            },
            title: TitleSettings {
                style: TitleStyle::Default,
                size: TitleSize::Medium,
                color: None,
            },
            background: BackgroundSettings {
                kind: BackgroundType::Solid,
                color: "#ffffff".into(),
                gradient_from: None,
                gradient_to: None,
                gradient_direction: None,
                border_radius: Some(12),
            },
            footer: FooterSettings {
                position: FooterPosition::Left,
                show_sources: true,
                show_url: true,
                show_qr_code: false,
                show_capture_date: false,
                visible: true,
            },
            chart_type: ChartType::Area,
            theme: Theme::Light,
            watermark: WatermarkSettings {
                visible: true,
                opacity: 8,
                position: WatermarkPosition::Center,
                layer: WatermarkLayer::Behind,
            },
            chart_display: ChartDisplaySettings {
                show_data_labels: false,
                show_grid_lines: true,
                show_summary_stats: false,
                show_trend_indicator: false,
                show_avg_line: false,
            },
            export_quality: ExportQuality {
                resolution: Resolution::X2,
                format: ImageFormat::Png,
                jpeg_quality: 92,
            },
            description: None,
        },
        Preset::SocialMedia => ExportSettings {
            preset,
            aspect_ratio: AspectRatio::Square,
            padding: Padding::MD,
            title: TitleSettings {
                style: TitleStyle::Bold,
                size: TitleSize::Large,
                color: None,
            },
            background: BackgroundSettings {
                kind: BackgroundType::Gradient,
                color: "#0f172a".into(),
                gradient_from: Some("#0f172a".into()),
                gradient_to: Some("#1e293b".into()),
                gradient_direction: Some(GradientDirection::ToBottomRight),
                border_radius: Some(16),
            },
            footer: FooterSettings {
                position: FooterPosition::Center,
                show_sources: false,
                show_url: true,
                show_qr_code: false,
                show_capture_date: false,
                visible: true,
            },
            theme: Theme::Dark,
            watermark: WatermarkSettings {
                visible: false,
                opacity: 8,
                position: WatermarkPosition::BottomRight,
                layer: WatermarkLayer::Front,
            },
            chart_display: ChartDisplaySettings {
                show_data_labels: false,
                show_grid_lines: false,
                show_summary_stats: false,
                show_trend_indicator: true,
                show_avg_line: false,
            },
            ..preset_settings(Preset::Default)
        },
        Preset::SlideDeck => ExportSettings {
            preset,
            padding: Padding::LG,
            logo: LogoSettings {
                kind: LogoType::Avalanche,
                position: LogoPosition::TopRight,
                custom_url: None,
            },
            title: TitleSettings {
                style: TitleStyle::Default,
                size: TitleSize::Large,
                color: None,
            },
            footer: FooterSettings {
                position: FooterPosition::Right,
                show_sources: true,
                show_url: false,
                show_qr_code: false,
                show_capture_date: true,
                visible: true,
            },
            chart_type: ChartType::Line,
            watermark: WatermarkSettings {
                visible: false,
                opacity: 8,
                position: WatermarkPosition::Center,
                layer: WatermarkLayer::Behind,
            },
            chart_display: ChartDisplaySettings {
                show_data_labels: false,
                show_grid_lines: true,
                show_summary_stats: true,
                show_trend_indicator: false,
                show_avg_line: true,
            },
            export_quality: ExportQuality {
                resolution: Resolution::X3,
                format: ImageFormat::Png,
                jpeg_quality: 92,
            },
            ..preset_settings(Preset::Default)
        },
        Preset::Collage => ExportSettings {
            preset,
            padding: Padding::SM,
            title: TitleSettings {
                style: TitleStyle::Minimal,
                size: TitleSize::Medium,
                color: None,
            },
            footer: FooterSettings {
                position: FooterPosition::Center,
                show_sources: true,
                show_url: true,
                show_qr_code: false,
                show_capture_date: true,
                visible: true,
            },
            chart_type: ChartType::Line,
            watermark: WatermarkSettings {
                visible: false,
                opacity: 8,
                position: WatermarkPosition::Center,
                layer: WatermarkLayer::Behind,
            },
            chart_display: ChartDisplaySettings {
                show_data_labels: false,
                show_grid_lines: false,
                show_summary_stats: false,
                show_trend_indicator: true,
                show_avg_line: false,
            },
            ..preset_settings(Preset::Default)
        },
        Preset::Customize => ExportSettings {
            preset,
            aspect_ratio: AspectRatio::Standard,
            padding: Padding::MD,
            chart_type: ChartType::Line,
            ..preset_settings(Preset::Default)
        },
    }
}
