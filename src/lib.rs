//! chart_studio
//!
//! Fetch chain metrics, window and aggregate them, annotate the chart and export
//! it as a PNG, JPEG or SVG image. Pairs with the `chart-studio` CLI.
//!
//! ### Features
//! - Chain stats client and a multi-metric collage with latest-wins fetching
//! - Period aggregation (D/W/M/Q/Y) and a brush with named range presets
//! - Export settings with presets, a reducer and persisted custom templates
//! - Annotations (highlight, text, arrow, freehand, rectangle) in percent space
//! - Rendering with plotters, including themes, watermark and footer
//!
//! ### Example
//! ```no_run
//! use chart_studio::{Client, Period, RangePreset};
//! use chart_studio::brush::BrushController;
//! use chart_studio::collage::{extract_metric, metric_config};
//! use chart_studio::settings::{Preset, SettingsState};
//! use chart_studio::viz::Composition;
//! use chart_studio::api::MetricsSource;
//!
//! let client = Client::default();
//! let stats = client.fetch_chain_stats("43114")?;
//! let tx = metric_config("txCount").expect("registered metric");
//! let data = extract_metric(&stats, tx, Period::Monthly);
//!
//! let mut brush = BrushController::new(Period::Monthly);
//! brush.select_preset(RangePreset::OneYear, data.len());
//!
//! let state = SettingsState::new(Preset::SlideDeck);
//! let comp = Composition::single(state.settings(), "Transactions", brush.visible(&data));
//! let today = chrono::Local::now().date_naive();
//! let dir = std::path::Path::new("out");
//! chart_studio::export::render_to_file(&comp, dir, "transactions", today, None)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod aggregate;
pub mod annotations;
pub mod api;
pub mod brush;
pub mod collage;
pub mod config;
pub mod error;
pub mod export;
pub mod ids;
pub mod models;
pub mod settings;
pub mod shortcuts;
pub mod stats;
pub mod storage;
pub mod templates;
pub mod viz;

pub use api::{ChainStatsResponse, Client, MetricsSource};
pub use config::StudioConfig;
pub use error::{StoreError, StudioError};
pub use models::{ChartDataPoint, Period, RangePreset, ViewMode};
