use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Time granularity of a series, ordered from finest to coarsest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "D")]
    Daily,
    #[serde(rename = "W")]
    Weekly,
    #[serde(rename = "M")]
    Monthly,
    #[serde(rename = "Q")]
    Quarterly,
    #[serde(rename = "Y")]
    Yearly,
}

impl Period {
    /// Parse `D/W/M/Q/Y` or the long names (`daily`, `weekly`, ...), case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "d" | "day" | "daily" => Some(Period::Daily),
            "w" | "week" | "weekly" => Some(Period::Weekly),
            "m" | "month" | "monthly" => Some(Period::Monthly),
            "q" | "quarter" | "quarterly" => Some(Period::Quarterly),
            "y" | "year" | "yearly" => Some(Period::Yearly),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Period::Daily => "D",
            Period::Weekly => "W",
            Period::Monthly => "M",
            Period::Quarterly => "Q",
            Period::Yearly => "Y",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Named date-range windows offered above the brush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangePreset {
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
    /// Whole series. Also used as the "no named preset" marker after a manual brush drag.
    #[serde(rename = "ALL")]
    All,
}

impl RangePreset {
    /// Length of the window in days; `None` for `ALL`.
    pub fn days(&self) -> Option<u32> {
        match self {
            RangePreset::OneMonth => Some(30),
            RangePreset::ThreeMonths => Some(90),
            RangePreset::SixMonths => Some(180),
            RangePreset::OneYear => Some(365),
            RangePreset::All => None,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "1M" => Some(RangePreset::OneMonth),
            "3M" => Some(RangePreset::ThreeMonths),
            "6M" => Some(RangePreset::SixMonths),
            "1Y" => Some(RangePreset::OneYear),
            "ALL" => Some(RangePreset::All),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RangePreset::OneMonth => "1M",
            RangePreset::ThreeMonths => "3M",
            RangePreset::SixMonths => "6M",
            RangePreset::OneYear => "1Y",
            RangePreset::All => "ALL",
        }
    }
}

/// Single chart vs. multi-metric collage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Single,
    Collage,
}

/// One row of a time series.
///
/// The date representation determines granularity: `YYYY`, `YYYY-Qn`, `YYYY-MM`
/// or `YYYY-MM-DD` (daily or weekly, depending on the caller). Extra numeric
/// series live in `series` and are flattened into the JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartDataPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(flatten)]
    pub series: BTreeMap<String, f64>,
}

impl ChartDataPoint {
    /// Point with a `date` and a `value`.
    pub fn new(date: impl Into<String>, value: f64) -> Self {
        Self {
            date: Some(date.into()),
            value: Some(value),
            ..Default::default()
        }
    }

    /// Builder-style helper to attach a named series value.
    pub fn with_series(mut self, key: impl Into<String>, value: f64) -> Self {
        self.series.insert(key.into(), value);
        self
    }

    /// `date`, falling back to `day`.
    pub fn date_str(&self) -> Option<&str> {
        self.date.as_deref().or(self.day.as_deref())
    }

    /// All numeric fields, `value` first.
    pub fn numeric_fields(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.value
            .map(|v| ("value", v))
            .into_iter()
            .chain(self.series.iter().map(|(k, v)| (k.as_str(), *v)))
    }

    /// Look up a numeric field by name (`"value"` or a series key).
    pub fn field(&self, name: &str) -> Option<f64> {
        if name == "value" {
            self.value
        } else {
            self.series.get(name).copied()
        }
    }

    /// Set a numeric field by name (`"value"` or a series key).
    pub fn set_field(&mut self, name: &str, v: f64) {
        if name == "value" {
            self.value = Some(v);
        } else {
            self.series.insert(name.to_string(), v);
        }
    }
}
