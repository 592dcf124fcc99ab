use chart_studio::ChartDataPoint;
use chart_studio::storage;
use std::fs;

fn sample() -> Vec<ChartDataPoint> {
    vec![
        ChartDataPoint::new("2024-01-01", 10.0).with_series("fees", 0.5),
        ChartDataPoint::new("2024-01-02", 12.5),
    ]
}

#[test]
fn save_csv_and_json() {
    let dir = tempfile::tempdir().unwrap();
    let rows = sample();

    let csv_path = dir.path().join("series.csv");
    storage::save_csv(&rows, &csv_path).unwrap();
    let csv_txt = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv_txt.lines().collect();
    assert_eq!(lines[0], "date,value,fees");
    assert_eq!(lines[1], "2024-01-01,10,0.5");
    assert_eq!(lines[2], "2024-01-02,12.5,");

    let json_path = dir.path().join("series.json");
    storage::save_json(&rows, &json_path).unwrap();
    let back = storage::load_json(&json_path).unwrap();
    assert_eq!(back, rows);
}

// Cells starting with = + - @ would run as formulas in a spreadsheet; they get a leading quote.
#[test]
fn csv_cells_are_prefixed_to_avoid_formulas() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("evil.csv");
    let rows = vec![ChartDataPoint::new("=HYPERLINK(\"x\")", 1.0).with_series("@sum", 2.0)];
    storage::save_csv(&rows, &path).unwrap();
    let txt = fs::read_to_string(&path).unwrap();
    assert!(txt.contains("'@sum"));
    assert!(txt.contains("'=HYPERLINK"));
    assert_eq!(storage::sanitize_cell("-1"), "'-1");
    assert_eq!(storage::sanitize_cell("2024"), "2024");
}

#[test]
fn load_json_accepts_api_shaped_payloads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("api.json");
    fs::write(
        &path,
        r#"{"data":[{"date":"2024-01-02","value":"7"},{"date":"2024-01-01","value":3}]}"#,
    )
    .unwrap();
    let points = storage::load_json(&path).unwrap();
    assert_eq!(
        points,
        vec![ChartDataPoint::new("2024-01-01", 3.0), ChartDataPoint::new("2024-01-02", 7.0)]
    );
    assert!(storage::load_json(dir.path().join("missing.json")).is_err());
}
