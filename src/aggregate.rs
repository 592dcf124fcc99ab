//! Period aggregation: coarsen a dated series into weeks, months, quarters or years.
//!
//! Aggregation only ever coarsens. Data that is already at (or above) the
//! target granularity is returned unchanged, which makes the operation
//! idempotent.

use crate::models::{ChartDataPoint, Period};
use chrono::{Datelike, Duration, NaiveDate};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// How a numeric field is reduced inside one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationRule {
    Sum,
    Max,
    /// Arithmetic mean of the finite values in the bucket.
    Mean,
}

impl AggregationRule {
    /// Default rule derived from the field name: running totals (`cumulative*`) take the
    /// max of the bucket, everything else is summed.
    pub fn for_field(name: &str) -> Self {
        if name.to_ascii_lowercase().contains("cumulative") {
            AggregationRule::Max
        } else {
            AggregationRule::Sum
        }
    }
}

fn yearly_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}$").expect("static regex"))
}

fn quarterly_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-Q[1-4]$").expect("static regex"))
}

fn monthly_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}$").expect("static regex"))
}

/// Granularity implied by a single date string. `YYYY-MM-DD` reports daily; weekly data
/// shares that shape and can only be told apart by the caller.
pub fn granularity_of(date: &str) -> Option<Period> {
    if yearly_re().is_match(date) {
        Some(Period::Yearly)
    } else if quarterly_re().is_match(date) {
        Some(Period::Quarterly)
    } else if monthly_re().is_match(date) {
        Some(Period::Monthly)
    } else if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok() {
        Some(Period::Daily)
    } else {
        None
    }
}

/// Detect the granularity of a series from its first dated point (daily if unknown).
pub fn detect_granularity(data: &[ChartDataPoint]) -> Period {
    data.iter()
        .filter_map(|p| p.date_str())
        .find_map(granularity_of)
        .unwrap_or(Period::Daily)
}

/// Parse any supported date shape into the first day of the period it names.
///
/// Quarterly strings are split on the literal `-Q`. Anything unrecognised yields `None`.
pub fn parse_period_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Some((year, quarter)) = s.split_once("-Q") {
        let year: i32 = year.parse().ok()?;
        let q: u32 = quarter.parse().ok()?;
        if !(1..=4).contains(&q) {
            return None;
        }
        return NaiveDate::from_ymd_opt(year, (q - 1) * 3 + 1, 1);
    }
    let parts: Vec<&str> = s.split('-').collect();
    match parts.as_slice() {
        [y] if y.len() == 4 => NaiveDate::from_ymd_opt(y.parse().ok()?, 1, 1),
        [y, m] if y.len() == 4 => NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, 1),
        [_, _, _] => {
            // Tolerate timestamps such as `2024-01-05T00:00:00Z`.
            let day = s.get(..10).unwrap_or(s);
            NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
        }
        _ => {
            let day = s.get(..10)?;
            NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
        }
    }
}

/// Sunday on or before `d`.
pub fn week_start(d: NaiveDate) -> NaiveDate {
    d - Duration::days(d.weekday().num_days_from_sunday() as i64)
}

/// Bucket key for `d` at `period`. Keys are zero-padded, so sorting them as strings
/// sorts them chronologically.
pub fn period_key(d: NaiveDate, period: Period) -> String {
    match period {
        Period::Daily => d.format("%Y-%m-%d").to_string(),
        Period::Weekly => week_start(d).format("%Y-%m-%d").to_string(),
        Period::Monthly => format!("{:04}-{:02}", d.year(), d.month()),
        Period::Quarterly => format!("{:04}-Q{}", d.year(), d.month0() / 3 + 1),
        Period::Yearly => format!("{:04}", d.year()),
    }
}

/// Aggregate `data` to `target`, detecting the current granularity from the date shape.
///
/// ```
/// use chart_studio::aggregate::aggregate_data_by_period;
/// use chart_studio::models::{ChartDataPoint, Period};
///
/// let daily = vec![
///     ChartDataPoint::new("2024-01-01", 10.0),
///     ChartDataPoint::new("2024-01-02", 20.0),
/// ];
/// let monthly = aggregate_data_by_period(&daily, Period::Monthly);
/// assert_eq!(monthly, vec![ChartDataPoint::new("2024-01", 30.0)]);
/// ```
pub fn aggregate_data_by_period(data: &[ChartDataPoint], target: Period) -> Vec<ChartDataPoint> {
    let current = detect_granularity(data);
    aggregate_data_by_period_from(data, current, target)
}

/// Like [`aggregate_data_by_period`] but with the current granularity supplied by the caller,
/// for `YYYY-MM-DD` data that is known to be weekly.
pub fn aggregate_data_by_period_from(
    data: &[ChartDataPoint],
    current: Period,
    target: Period,
) -> Vec<ChartDataPoint> {
    aggregate_with_rules(data, current, target, AggregationRule::for_field)
}

/// Aggregate with an explicit rule per numeric field.
pub fn aggregate_with_rules<F>(
    data: &[ChartDataPoint],
    current: Period,
    target: Period,
    rule_for: F,
) -> Vec<ChartDataPoint>
where
    F: Fn(&str) -> AggregationRule,
{
    if target == Period::Daily || data.is_empty() || current >= target {
        return data.to_vec();
    }

    let mut groups: BTreeMap<String, ChartDataPoint> = BTreeMap::new();
    // Sample counts for `Mean` fields, keyed by (bucket, field).
    let mut counts: BTreeMap<(String, String), u32> = BTreeMap::new();
    let mut dropped = 0usize;
    for p in data {
        let Some(d) = p.date_str().and_then(parse_period_date) else {
            dropped += 1;
            continue;
        };
        let key = period_key(d, target);
        let bucket = groups.entry(key.clone()).or_insert_with(|| ChartDataPoint {
            date: Some(key.clone()),
            ..Default::default()
        });
        for (name, v) in p.numeric_fields() {
            if !v.is_finite() {
                continue;
            }
            let rule = rule_for(name);
            if rule == AggregationRule::Mean {
                *counts.entry((key.clone(), name.to_string())).or_insert(0) += 1;
            }
            let merged = match (bucket.field(name), rule) {
                (None, _) => v,
                (Some(acc), AggregationRule::Sum | AggregationRule::Mean) => acc + v,
                (Some(acc), AggregationRule::Max) => acc.max(v),
            };
            bucket.set_field(name, merged);
        }
    }
    for ((key, name), n) in counts {
        if let Some(bucket) = groups.get_mut(&key)
            && let Some(total) = bucket.field(&name)
        {
            bucket.set_field(&name, total / f64::from(n));
        }
    }
    if dropped > 0 {
        log::debug!("aggregate: dropped {dropped} point(s) with unparseable dates");
    }
    groups.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granularity_shapes() {
        assert_eq!(granularity_of("2024"), Some(Period::Yearly));
        assert_eq!(granularity_of("2024-Q3"), Some(Period::Quarterly));
        assert_eq!(granularity_of("2024-07"), Some(Period::Monthly));
        assert_eq!(granularity_of("2024-07-04"), Some(Period::Daily));
        assert_eq!(granularity_of("July 4th"), None);
    }

    #[test]
    fn week_start_is_sunday() {
        // 2024-01-03 is a Wednesday.
        let d = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        assert_eq!(week_start(d), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        assert_eq!(week_start(sunday), sunday);
    }

    #[test]
    fn quarter_keys() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(period_key(d, Period::Quarterly), "2024-Q1");
        let d = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        assert_eq!(period_key(d, Period::Quarterly), "2024-Q2");
    }

    #[test]
    fn parse_quarter_and_bad_input() {
        assert_eq!(
            parse_period_date("2023-Q4"),
            NaiveDate::from_ymd_opt(2023, 10, 1)
        );
        assert_eq!(parse_period_date("2023-Q9"), None);
        assert_eq!(parse_period_date("garbage"), None);
    }
}
