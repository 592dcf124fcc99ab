use chart_studio::aggregate::{
    AggregationRule, aggregate_data_by_period, aggregate_data_by_period_from, aggregate_with_rules,
    detect_granularity,
};
use chart_studio::{ChartDataPoint, Period};

fn daily(values: &[(&str, f64)]) -> Vec<ChartDataPoint> {
    values
        .iter()
        .map(|(d, v)| ChartDataPoint::new(*d, *v))
        .collect()
}

#[test]
fn daily_to_monthly_sums_values() {
    let data = daily(&[("2024-01-01", 10.0), ("2024-01-02", 20.0)]);
    let out = aggregate_data_by_period(&data, Period::Monthly);
    assert_eq!(out, vec![ChartDataPoint::new("2024-01", 30.0)]);
}

#[test]
fn cumulative_fields_take_the_max() {
    let data = vec![
        ChartDataPoint {
            date: Some("2024-01".into()),
            ..Default::default()
        }
        .with_series("cumulativeTotal", 100.0),
        ChartDataPoint {
            date: Some("2024-02".into()),
            ..Default::default()
        }
        .with_series("cumulativeTotal", 150.0),
    ];
    let out = aggregate_data_by_period(&data, Period::Quarterly);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].date.as_deref(), Some("2024-Q1"));
    assert_eq!(out[0].field("cumulativeTotal"), Some(150.0));
}

#[test]
fn daily_target_and_empty_input_are_no_ops() {
    let data = daily(&[("2024-01-01", 1.0), ("2024-01-09", 2.0)]);
    assert_eq!(aggregate_data_by_period(&data, Period::Daily), data);
    assert!(aggregate_data_by_period(&[], Period::Yearly).is_empty());
}

#[test]
fn never_refines_coarser_data() {
    let monthly = vec![
        ChartDataPoint::new("2024-01", 5.0),
        ChartDataPoint::new("2024-02", 7.0),
    ];
    assert_eq!(aggregate_data_by_period(&monthly, Period::Weekly), monthly);
    assert_eq!(aggregate_data_by_period(&monthly, Period::Monthly), monthly);
}

#[test]
fn aggregation_is_idempotent() {
    let data = daily(&[
        ("2023-12-30", 1.0),
        ("2024-01-02", 2.0),
        ("2024-02-15", 3.0),
        ("2024-04-01", 4.0),
    ]);
    let once = aggregate_data_by_period(&data, Period::Quarterly);
    let twice = aggregate_data_by_period(&once, Period::Quarterly);
    assert_eq!(once, twice);
    let keys: Vec<_> = once.iter().filter_map(|p| p.date.clone()).collect();
    assert_eq!(keys, vec!["2023-Q4", "2024-Q1", "2024-Q2"]);
}

#[test]
fn weekly_buckets_start_on_sunday() {
    // Wed 2024-01-03 and Sat 2024-01-06 share the week of Sun 2023-12-31.
    let data = daily(&[("2024-01-03", 1.0), ("2024-01-06", 2.0), ("2024-01-07", 4.0)]);
    let out = aggregate_data_by_period(&data, Period::Weekly);
    assert_eq!(
        out,
        vec![
            ChartDataPoint::new("2023-12-31", 3.0),
            ChartDataPoint::new("2024-01-07", 4.0),
        ]
    );
}

#[test]
fn weekly_data_is_recognised_when_the_caller_says_so() {
    let weekly = daily(&[("2023-12-31", 3.0), ("2024-01-07", 4.0)]);
    assert_eq!(detect_granularity(&weekly), Period::Daily);
    let monthly = aggregate_data_by_period_from(&weekly, Period::Weekly, Period::Monthly);
    assert_eq!(
        monthly,
        vec![
            ChartDataPoint::new("2023-12", 3.0),
            ChartDataPoint::new("2024-01", 4.0),
        ]
    );
    assert_eq!(
        aggregate_data_by_period_from(&weekly, Period::Weekly, Period::Weekly),
        weekly
    );
}

#[test]
fn malformed_dates_are_dropped_silently() {
    let data = daily(&[("2024-01-01", 1.0), ("not a date", 50.0), ("2024-01-20", 2.0)]);
    let out = aggregate_data_by_period(&data, Period::Monthly);
    assert_eq!(out, vec![ChartDataPoint::new("2024-01", 3.0)]);
}

#[test]
fn explicit_rules_override_the_name_heuristic() {
    let data = daily(&[("2024-01-01", 10.0), ("2024-01-02", 40.0)]);
    let out = aggregate_with_rules(&data, Period::Daily, Period::Yearly, |_| {
        AggregationRule::Max
    });
    assert_eq!(out, vec![ChartDataPoint::new("2024", 40.0)]);
}

#[test]
fn mean_rule_averages_each_bucket() {
    let data = daily(&[
        ("2024-01-01", 10.0),
        ("2024-01-02", 20.0),
        ("2024-01-03", f64::NAN),
        ("2024-01-20", 60.0),
        ("2024-02-01", 5.0),
    ]);
    let out = aggregate_with_rules(&data, Period::Daily, Period::Monthly, |_| {
        AggregationRule::Mean
    });
    assert_eq!(
        out,
        vec![ChartDataPoint::new("2024-01", 30.0), ChartDataPoint::new("2024-02", 5.0)]
    );
}

#[test]
fn extra_series_are_aggregated_per_field() {
    let data = vec![
        ChartDataPoint::new("2024-03-01", 1.0).with_series("fees", 0.5),
        ChartDataPoint::new("2024-03-02", 2.0).with_series("fees", 0.25),
    ];
    let out = aggregate_data_by_period(&data, Period::Monthly);
    assert_eq!(out[0].value, Some(3.0));
    assert_eq!(out[0].field("fees"), Some(0.75));
}
