use chart_studio::annotations::{AnnotationEngine, AnnotationTool};
use chart_studio::settings::{ChartType, Preset, SettingsState, preset_settings};
use chart_studio::shortcuts::{
    Key, KeyInput, Shortcut, ShortcutEffect, apply_shortcut, resolve_shortcut,
};
use chart_studio::templates::{MemoryRepository, TemplateStore};

fn press(
    key: Key,
    settings: &mut SettingsState,
    engine: &mut AnnotationEngine,
) -> Option<ShortcutEffect> {
    let shortcut = resolve_shortcut(KeyInput::plain(key))?;
    apply_shortcut(shortcut, settings, engine, &[])
}

#[test]
fn modifier_keys_request_save_and_copy() {
    assert_eq!(
        resolve_shortcut(KeyInput::with_modifier(Key::Char('S'))),
        Some(Shortcut::Save)
    );
    let mut settings = SettingsState::default();
    let mut engine = AnnotationEngine::new();
    let effect = apply_shortcut(Shortcut::Copy, &mut settings, &mut engine, &[]);
    assert_eq!(effect, Some(ShortcutEffect::Copy));
    assert!(!settings.is_customized());
}

#[test]
fn letters_change_chart_type_and_toggles() {
    let mut settings = SettingsState::new(Preset::Default);
    let mut engine = AnnotationEngine::new();
    press(Key::Char('l'), &mut settings, &mut engine);
    assert_eq!(settings.settings().chart_type, ChartType::Line);

    let grid = settings.settings().chart_display.show_grid_lines;
    press(Key::Char('g'), &mut settings, &mut engine);
    assert_eq!(settings.settings().chart_display.show_grid_lines, !grid);
    press(Key::Char('r'), &mut settings, &mut engine);
    assert!(settings.settings().chart_display.show_avg_line);
    assert_eq!(settings.preset(), Preset::Default);
}

#[test]
fn digits_select_presets_then_templates() {
    let mut store = TemplateStore::new(MemoryRepository::new());
    let mut custom = preset_settings(Preset::SocialMedia);
    custom.chart_type = ChartType::Line;
    store.save_template("Mine", &custom);

    let mut settings = SettingsState::new(Preset::Default);
    let mut engine = AnnotationEngine::new();
    apply_shortcut(Shortcut::SelectSlot(4), &mut settings, &mut engine, store.templates());
    assert_eq!(settings.preset(), Preset::Collage);
    assert!(!settings.is_customized());

    apply_shortcut(Shortcut::SelectSlot(6), &mut settings, &mut engine, store.templates());
    assert_eq!(settings.settings(), &custom);

    // Empty slots do nothing.
    apply_shortcut(Shortcut::SelectSlot(9), &mut settings, &mut engine, store.templates());
    assert_eq!(settings.settings(), &custom);
}

#[test]
fn keys_act_on_the_selected_annotation() {
    let mut settings = SettingsState::default();
    let mut engine = AnnotationEngine::new();
    let id = engine.add_highlight(50.0, 50.0).id.clone();

    let right = resolve_shortcut(KeyInput::with_shift(Key::ArrowRight)).unwrap();
    apply_shortcut(right, &mut settings, &mut engine, &[]);
    press(Key::ArrowUp, &mut settings, &mut engine);
    let moved = serde_json::to_value(engine.get(&id).unwrap()).unwrap();
    assert_eq!((moved["x"].as_f64(), moved["y"].as_f64()), (Some(55.0), Some(49.0)));

    press(Key::Backspace, &mut settings, &mut engine);
    assert!(engine.annotations().is_empty());
}

#[test]
fn escape_deselects_and_drops_the_tool() {
    let mut settings = SettingsState::default();
    let mut engine = AnnotationEngine::new();
    engine.add_text(10.0, 10.0, None);
    engine.set_active_tool(Some(AnnotationTool::Arrow));
    press(Key::Escape, &mut settings, &mut engine);
    assert_eq!(engine.selected_id(), None);
    assert_eq!(engine.active_tool(), None);
    assert_eq!(engine.annotations().len(), 1);
}
