//! Keyboard contract of the studio.
//!
//! | Keys                  | Action                                   |
//! |-----------------------|------------------------------------------|
//! | Ctrl/Cmd + S          | save image                               |
//! | Ctrl/Cmd + C          | copy image                               |
//! | 1..9                  | presets in table order, then templates   |
//! | L / B / A             | line / bar / area chart                  |
//! | G / D / R             | toggle grid / data labels / average line |
//! | Delete, Backspace     | delete selected annotation               |
//! | Arrows (+Shift)       | nudge selected annotation 1 (5) percent  |
//! | Escape                | deselect and drop the active tool        |
//!
//! Nothing fires while focus is in a text field.

use crate::annotations::AnnotationEngine;
use crate::settings::{ChartDisplayPatch, ChartType, Preset, SettingsState};
use crate::templates::CustomTemplate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Delete,
    Backspace,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    /// Ctrl on Linux/Windows, Cmd on macOS.
    pub modifier: bool,
    pub shift: bool,
    pub in_text_field: bool,
}

impl KeyInput {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            modifier: false,
            shift: false,
            in_text_field: false,
        }
    }

    pub fn with_modifier(key: Key) -> Self {
        Self {
            modifier: true,
            ..Self::plain(key)
        }
    }

    pub fn with_shift(key: Key) -> Self {
        Self {
            shift: true,
            ..Self::plain(key)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shortcut {
    Save,
    Copy,
    /// 1-based slot.
    SelectSlot(usize),
    SetChartType(ChartType),
    ToggleGrid,
    ToggleDataLabels,
    ToggleAvgLine,
    DeleteAnnotation,
    Nudge { dx: f64, dy: f64 },
    Cancel,
}

/// Side effects the caller must perform after [`apply_shortcut`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutEffect {
    Save,
    Copy,
}

pub fn resolve_shortcut(input: KeyInput) -> Option<Shortcut> {
    if input.in_text_field {
        return None;
    }
    let step = if input.shift { 5.0 } else { 1.0 };
    match input.key {
        Key::Char(c) if input.modifier => match c.to_ascii_lowercase() {
            's' => Some(Shortcut::Save),
            'c' => Some(Shortcut::Copy),
            _ => None,
        },
        Key::Char(c @ '1'..='9') => Some(Shortcut::SelectSlot(c as usize - '0' as usize)),
        Key::Char(c) => match c.to_ascii_lowercase() {
            'l' => Some(Shortcut::SetChartType(ChartType::Line)),
            'b' => Some(Shortcut::SetChartType(ChartType::Bar)),
            'a' => Some(Shortcut::SetChartType(ChartType::Area)),
            'g' => Some(Shortcut::ToggleGrid),
            'd' => Some(Shortcut::ToggleDataLabels),
            'r' => Some(Shortcut::ToggleAvgLine),
            _ => None,
        },
        _ if input.modifier => None,
        Key::Delete | Key::Backspace => Some(Shortcut::DeleteAnnotation),
        Key::ArrowUp => Some(Shortcut::Nudge { dx: 0.0, dy: -step }),
        Key::ArrowDown => Some(Shortcut::Nudge { dx: 0.0, dy: step }),
        Key::ArrowLeft => Some(Shortcut::Nudge { dx: -step, dy: 0.0 }),
        Key::ArrowRight => Some(Shortcut::Nudge { dx: step, dy: 0.0 }),
        Key::Escape => Some(Shortcut::Cancel),
    }
}

/// Apply a shortcut to the studio state. Returns the effect the caller still has to run.
pub fn apply_shortcut(
    shortcut: Shortcut,
    settings: &mut SettingsState,
    annotations: &mut AnnotationEngine,
    templates: &[CustomTemplate],
) -> Option<ShortcutEffect> {
    let display = settings.settings().chart_display.clone();
    match shortcut {
        Shortcut::Save => return Some(ShortcutEffect::Save),
        Shortcut::Copy => return Some(ShortcutEffect::Copy),
        Shortcut::SelectSlot(slot) => {
            let idx = slot.saturating_sub(1);
            if let Some(preset) = Preset::ALL.get(idx) {
                settings.select_preset(*preset);
            } else if let Some(t) = templates.get(idx - Preset::ALL.len()) {
                log::debug!("applying template '{}' from slot {slot}", t.name);
                settings.apply_template(t.settings.clone());
            }
        }
        Shortcut::SetChartType(t) => settings.set_chart_type(t),
        Shortcut::ToggleGrid => settings.update_chart_display(ChartDisplayPatch {
            show_grid_lines: Some(!display.show_grid_lines),
            ..Default::default()
        }),
        Shortcut::ToggleDataLabels => settings.update_chart_display(ChartDisplayPatch {
            show_data_labels: Some(!display.show_data_labels),
            ..Default::default()
        }),
        Shortcut::ToggleAvgLine => settings.update_chart_display(ChartDisplayPatch {
            show_avg_line: Some(!display.show_avg_line),
            ..Default::default()
        }),
        Shortcut::DeleteAnnotation => {
            annotations.delete_selected();
        }
        Shortcut::Nudge { dx, dy } => {
            annotations.nudge_selected(dx, dy);
        }
        Shortcut::Cancel => {
            annotations.select(None);
            annotations.set_active_tool(None);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_fields_swallow_everything() {
        let mut k = KeyInput::with_modifier(Key::Char('s'));
        k.in_text_field = true;
        assert_eq!(resolve_shortcut(k), None);
    }

    #[test]
    fn shift_arrow_nudges_by_five() {
        assert_eq!(
            resolve_shortcut(KeyInput::with_shift(Key::ArrowLeft)),
            Some(Shortcut::Nudge { dx: -5.0, dy: 0.0 })
        );
    }

    #[test]
    fn modifier_digit_is_not_a_slot() {
        assert_eq!(resolve_shortcut(KeyInput::with_modifier(Key::Char('1'))), None);
    }
}
