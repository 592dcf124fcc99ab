use chart_studio::ChartDataPoint;
use chart_studio::collage::{CollageMetricData, metric_config};
use chart_studio::stats::{collage_summary, series_summary};

fn pts(values: &[Option<f64>]) -> Vec<ChartDataPoint> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| ChartDataPoint {
            date: Some(format!("2024-01-{:02}", i + 1)),
            value: *v,
            ..Default::default()
        })
        .collect()
}

#[test]
fn summary_skips_missing_values() {
    let data = pts(&[Some(10.0), None, Some(30.0), Some(20.0)]);
    let s = series_summary(&data, "value");
    assert_eq!(s.count, 3);
    assert_eq!(s.missing, 1);
    assert_eq!(s.min, Some(10.0));
    assert_eq!(s.max, Some(30.0));
    assert_eq!(s.mean, Some(20.0));
    assert_eq!(s.median, Some(20.0));
    assert_eq!(s.total, Some(60.0));
    assert_eq!(s.latest, Some(20.0));
    assert_eq!(s.change_pct, Some(100.0));
    assert_eq!(s.trend(), 1);
}

#[test]
fn empty_and_single_point_series() {
    let s = series_summary(&[], "value");
    assert_eq!(s.count, 0);
    assert!(s.mean.is_none() && s.median.is_none() && s.change_pct.is_none());
    assert_eq!(s.trend(), 0);

    let one = series_summary(&pts(&[Some(5.0)]), "value");
    assert_eq!(one.latest, Some(5.0));
    assert_eq!(one.change_pct, None);
}

#[test]
fn falling_series_trend_down() {
    let s = series_summary(&pts(&[Some(40.0), Some(30.0)]), "value");
    assert_eq!(s.change_pct, Some(-25.0));
    assert_eq!(s.trend(), -1);
}

#[test]
fn collage_summary_skips_failed_metrics() {
    let ok = CollageMetricData {
        config: metric_config("txCount").unwrap().clone(),
        data: pts(&[Some(1.0), Some(2.0)]),
        is_loading: false,
        error: None,
    };
    let failed = CollageMetricData {
        config: metric_config("gasUsed").unwrap().clone(),
        data: Vec::new(),
        is_loading: false,
        error: Some("Failed to load".into()),
    };
    let out = collage_summary(&[&ok, &failed]);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].0, "txCount");
    assert_eq!(out[0].1.total, Some(3.0));
}
