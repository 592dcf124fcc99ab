//! Export settings, the preset table and the settings state machine.
//!
//! Selecting a preset replaces the whole record and clears `is_customized`.
//! Any individual setter merges into one sub-record and sets the flag while
//! leaving `settings.preset` pinned, so `reset_to_preset` always knows which
//! defaults to restore.

pub mod presets;
pub mod state;
pub mod types;

pub use presets::preset_settings;
pub use state::{
    BackgroundPatch, ChartDisplayPatch, ExportQualityPatch, FooterPatch, LogoPatch,
    SettingsAction, SettingsState, TitlePatch, WatermarkPatch,
};
pub use types::*;
