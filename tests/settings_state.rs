use chart_studio::settings::{
    AspectRatio, ChartDisplayPatch, ChartType, ExportQualityPatch, ImageFormat, Padding, Preset,
    Resolution, SettingsAction, SettingsState, Theme, TitlePatch, preset_settings,
};

#[test]
fn reset_restores_the_active_preset() {
    let mut state = SettingsState::new(Preset::Default);
    state.select_preset(Preset::Collage);
    state.set_padding(Padding::MD);
    assert!(state.is_customized());
    assert_eq!(state.settings().padding.px(), 24);

    state.reset_to_preset();
    assert_eq!(state.settings().padding.px(), 16);
    assert_eq!(state.preset(), Preset::Collage);
    assert!(!state.is_customized());
    assert_eq!(state.settings(), &preset_settings(Preset::Collage));
}

#[test]
fn field_setters_never_change_the_preset() {
    let mut state = SettingsState::new(Preset::SlideDeck);
    state.set_aspect_ratio(AspectRatio::Square);
    state.set_chart_type(ChartType::Line);
    state.set_theme(Theme::Dark);
    state.update_title(TitlePatch {
        color: Some(Some("#ff0000".into())),
        ..Default::default()
    });
    assert_eq!(state.preset(), Preset::SlideDeck);
    assert!(state.is_customized());
    assert!(state.diverges_from_preset());
}

#[test]
fn selecting_a_preset_replaces_everything() {
    let mut state = SettingsState::new(Preset::Default);
    state.set_chart_type(ChartType::Bar);
    state.select_preset(Preset::SocialMedia);
    assert_eq!(state.settings(), &preset_settings(Preset::SocialMedia));
    assert!(!state.is_customized());
}

#[test]
fn partial_patches_keep_other_fields() {
    let mut state = SettingsState::new(Preset::Default);
    let before = state.settings().chart_display.clone();
    state.update_chart_display(ChartDisplayPatch {
        show_avg_line: Some(true),
        ..Default::default()
    });
    let after = &state.settings().chart_display;
    assert!(after.show_avg_line);
    assert_eq!(after.show_grid_lines, before.show_grid_lines);
    assert_eq!(after.show_data_labels, before.show_data_labels);

    state.update_export_quality(ExportQualityPatch {
        format: Some(ImageFormat::Jpeg),
        ..Default::default()
    });
    let q = &state.settings().export_quality;
    assert_eq!(q.format, ImageFormat::Jpeg);
    assert_eq!(q.resolution, preset_settings(Preset::Default).export_quality.resolution);
}

#[test]
fn applying_a_template_marks_customized() {
    let mut template = preset_settings(Preset::SlideDeck);
    template.export_quality.resolution = Resolution::X4;
    let mut state = SettingsState::new(Preset::Default);
    state.dispatch(SettingsAction::ApplyTemplate(Box::new(template.clone())));
    assert_eq!(state.settings(), &template);
    assert_eq!(state.preset(), Preset::SlideDeck);
    assert!(state.is_customized());
}

#[test]
fn blank_descriptions_are_cleared() {
    let mut state = SettingsState::new(Preset::Default);
    state.set_description(Some("  Daily transactions  ".into()));
    assert_eq!(state.settings().description.as_deref(), Some("Daily transactions"));
    state.set_description(Some("   ".into()));
    assert_eq!(state.settings().description, None);
}

#[test]
fn presets_parse_by_name() {
    for p in Preset::ALL {
        assert_eq!(Preset::parse(p.name()).unwrap(), p);
    }
    assert!(Preset::parse("poster").is_err());
    assert!(Padding::new(12).is_err());
    assert_eq!(Padding::new(32).unwrap(), Padding::LG);
}
