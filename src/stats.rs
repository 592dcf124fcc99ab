use crate::collage::CollageMetricData;
use crate::models::ChartDataPoint;
use serde::{Deserialize, Serialize};

/// Summary statistics for one numeric field of a series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub field: String,
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub total: Option<f64>,
    /// Last non-missing value in series order.
    pub latest: Option<f64>,
    /// Percent change from the first to the last non-missing value.
    pub change_pct: Option<f64>,
}

impl Summary {
    /// Direction of the trend indicator: `1` up, `-1` down, `0` flat or unknown.
    pub fn trend(&self) -> i8 {
        match self.change_pct {
            Some(c) if c > 0.0 => 1,
            Some(c) if c < 0.0 => -1,
            _ => 0,
        }
    }
}

/// Compute stats for `field` (`"value"` or a series key) over `data`.
pub fn series_summary(data: &[ChartDataPoint], field: &str) -> Summary {
    let ordered: Vec<f64> = data
        .iter()
        .filter_map(|p| p.field(field))
        .filter(|v| v.is_finite())
        .collect();
    let missing = data.len() - ordered.len();

    let mut vals = ordered.clone();
    vals.sort_by(f64::total_cmp);
    let count = vals.len();
    let min = vals.first().copied();
    let max = vals.last().copied();
    let total = (count > 0).then(|| vals.iter().sum::<f64>());
    let mean = total.map(|t| t / count as f64);
    let median = if count == 0 {
        None
    } else if count % 2 == 1 {
        Some(vals[count / 2])
    } else {
        Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
    };

    let first = ordered.first().copied();
    let latest = ordered.last().copied();
    let change_pct = match (first, latest) {
        (Some(a), Some(b)) if count > 1 && a != 0.0 => Some((b - a) / a.abs() * 100.0),
        _ => None,
    };

    Summary {
        field: field.to_string(),
        count,
        missing,
        min,
        max,
        mean,
        median,
        total,
        latest,
        change_pct,
    }
}

/// One summary per loaded collage metric, keyed by metric key. Failed and
/// still-loading metrics are skipped.
pub fn collage_summary(metrics: &[&CollageMetricData]) -> Vec<(String, Summary)> {
    metrics
        .iter()
        .filter(|m| !m.is_loading && m.error.is_none())
        .map(|m| (m.config.key.to_string(), series_summary(&m.data, "value")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_of_even_count_averages_middle_pair() {
        let data: Vec<_> = [4.0, 1.0, 3.0, 2.0]
            .iter()
            .enumerate()
            .map(|(i, v)| ChartDataPoint::new(format!("2024-01-0{}", i + 1), *v))
            .collect();
        let s = series_summary(&data, "value");
        assert_eq!(s.median, Some(2.5));
        assert_eq!(s.latest, Some(2.0));
        assert_eq!(s.change_pct, Some(-50.0));
        assert_eq!(s.trend(), -1);
    }
}
