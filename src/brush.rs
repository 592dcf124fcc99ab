//! Brush / date-range windowing over a reference series.

use crate::models::{ChartDataPoint, Period, RangePreset, ViewMode};
use serde::{Deserialize, Serialize};

/// Inclusive index window into a reference series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrushRange {
    pub start_index: usize,
    pub end_index: usize,
}

impl BrushRange {
    pub fn new(start_index: usize, end_index: usize) -> Self {
        Self {
            start_index,
            end_index,
        }
    }

    /// Number of points covered (inclusive bounds).
    pub fn span(&self) -> usize {
        self.end_index.saturating_sub(self.start_index) + 1
    }
}

/// Clamp `range` into `[0, len-1]` with `start <= end`. `None` for empty series.
pub fn safe_range(range: BrushRange, len: usize) -> Option<BrushRange> {
    if len == 0 {
        return None;
    }
    let last = len - 1;
    let a = range.start_index.min(last);
    let b = range.end_index.min(last);
    Some(BrushRange::new(a.min(b), a.max(b)))
}

/// Number of points a preset covers at a given granularity (at least one).
pub fn points_for_preset(preset: RangePreset, period: Period) -> Option<usize> {
    let days = preset.days()? as usize;
    let per_point = match period {
        Period::Daily => 1,
        Period::Weekly => 7,
        Period::Monthly => 30,
        Period::Quarterly => 91,
        Period::Yearly => 365,
    };
    Some(days.div_ceil(per_point).max(1))
}

/// Window for `preset`, anchored at the last index and extending backwards.
pub fn window_for_preset(len: usize, preset: RangePreset, period: Period) -> Option<BrushRange> {
    if len == 0 {
        return None;
    }
    let end = len - 1;
    match points_for_preset(preset, period) {
        None => Some(BrushRange::new(0, end)),
        Some(count) => Some(BrushRange::new(len.saturating_sub(count), end)),
    }
}

/// Why the reference series changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataChange {
    /// Single <-> collage switch: start over from the default 3M window.
    ModeSwitch(ViewMode),
    /// Aggregation period changed: keep the preset's logical duration.
    PeriodChange(Period),
    /// Same shape, new data (refetch): keep the current window, clamped.
    Reload,
}

/// Tracks the active preset and the brush window as the reference series changes.
#[derive(Debug, Clone)]
pub struct BrushController {
    preset: RangePreset,
    range: Option<BrushRange>,
    period: Period,
    mode: ViewMode,
}

impl Default for BrushController {
    fn default() -> Self {
        Self {
            preset: RangePreset::ThreeMonths,
            range: None,
            period: Period::Daily,
            mode: ViewMode::Single,
        }
    }
}

impl BrushController {
    pub fn new(period: Period) -> Self {
        Self {
            period,
            ..Default::default()
        }
    }

    pub fn preset(&self) -> RangePreset {
        self.preset
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Current window clamped to `len`.
    pub fn range(&self, len: usize) -> Option<BrushRange> {
        self.range.and_then(|r| safe_range(r, len))
    }

    /// Apply a named preset to the reference series of length `len`.
    pub fn select_preset(&mut self, preset: RangePreset, len: usize) -> Option<BrushRange> {
        self.preset = preset;
        self.range = window_for_preset(len, preset, self.period);
        self.range
    }

    /// The user dragged a brush handle: remember the window and drop the named preset.
    pub fn on_manual_drag(&mut self, start: usize, end: usize, len: usize) -> Option<BrushRange> {
        self.preset = RangePreset::All;
        self.range = safe_range(BrushRange::new(start, end), len);
        self.range
    }

    /// Recompute the window after the reference series changed to length `len`.
    pub fn on_data_changed(&mut self, change: DataChange, len: usize) -> Option<BrushRange> {
        match change {
            DataChange::ModeSwitch(mode) => {
                self.mode = mode;
                self.preset = RangePreset::ThreeMonths;
                self.range = window_for_preset(len, self.preset, self.period);
            }
            DataChange::PeriodChange(period) => {
                self.period = period;
                self.range = window_for_preset(len, self.preset, period);
            }
            DataChange::Reload => {
                self.range = match self.range {
                    Some(r) => safe_range(r, len),
                    None => window_for_preset(len, self.preset, self.period),
                };
            }
        }
        log::debug!(
            "brush: {:?} -> preset {} range {:?}",
            change,
            self.preset.label(),
            self.range
        );
        self.range
    }

    /// Slice of `data` under the brush (the whole series when no window is set).
    pub fn visible<'a>(&self, data: &'a [ChartDataPoint]) -> &'a [ChartDataPoint] {
        match self.range(data.len()) {
            Some(r) => &data[r.start_index..=r.end_index],
            None => data,
        }
    }

    /// First and last date strings under the brush.
    pub fn date_bounds(&self, data: &[ChartDataPoint]) -> Option<(String, String)> {
        let v = self.visible(data);
        let first = v.first()?.date_str()?.to_string();
        let last = v.last()?.date_str()?.to_string();
        Some((first, last))
    }
}

/// Keep points whose date string lies in `[from, to]` (lexicographic comparison).
///
/// All series share one key format per period, so string order is date order.
pub fn filter_by_date_range(data: &[ChartDataPoint], from: &str, to: &str) -> Vec<ChartDataPoint> {
    data.iter()
        .filter(|p| p.date_str().is_some_and(|d| d >= from && d <= to))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_point_counts() {
        assert_eq!(points_for_preset(RangePreset::OneMonth, Period::Daily), Some(30));
        assert_eq!(points_for_preset(RangePreset::ThreeMonths, Period::Weekly), Some(13));
        assert_eq!(points_for_preset(RangePreset::ThreeMonths, Period::Monthly), Some(3));
        assert_eq!(points_for_preset(RangePreset::OneMonth, Period::Yearly), Some(1));
        assert_eq!(points_for_preset(RangePreset::All, Period::Daily), None);
    }

    #[test]
    fn safe_range_clamps_and_orders() {
        let r = safe_range(BrushRange::new(50, 3), 10).unwrap();
        assert_eq!(r, BrushRange::new(3, 9));
        assert!(safe_range(BrushRange::new(0, 0), 0).is_none());
    }
}
