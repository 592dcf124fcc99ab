use crate::models::ChartDataPoint;
use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Prefix cells a spreadsheet would evaluate as a formula.
pub fn sanitize_cell(s: &str) -> String {
    if s.starts_with(['=', '+', '-', '@']) {
        format!("'{s}")
    } else {
        s.to_string()
    }
}

/// Numeric columns in output order: `value` first when any row has it, then series keys.
pub fn columns(points: &[ChartDataPoint]) -> Vec<String> {
    let mut cols = Vec::new();
    if points.iter().any(|p| p.value.is_some()) {
        cols.push("value".to_string());
    }
    let extra: BTreeSet<&str> = points
        .iter()
        .flat_map(|p| p.series.keys().map(String::as_str))
        .collect();
    cols.extend(extra.into_iter().map(str::to_string));
    cols
}

/// Save a series as CSV with a `date` column and one column per numeric field.
pub fn save_csv<P: AsRef<Path>>(points: &[ChartDataPoint], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    let cols = columns(points);
    let mut header = vec!["date".to_string()];
    header.extend(cols.iter().map(|c| sanitize_cell(c)));
    wtr.write_record(&header)?;
    for p in points {
        let mut row = vec![sanitize_cell(p.date_str().unwrap_or_default())];
        row.extend(
            cols.iter()
                .map(|c| p.field(c).map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save a series as a pretty JSON array.
pub fn save_json<P: AsRef<Path>>(points: &[ChartDataPoint], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let s = serde_json::to_string_pretty(points)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Read a series from a JSON array file.
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Vec<ChartDataPoint>> {
    let path = path.as_ref();
    let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let v: serde_json::Value = serde_json::from_str(&s).context("parse data file")?;
    // Accept either plain points or a `{data: [{date, value}]}` payload.
    if v.is_array() && serde_json::from_value::<Vec<ChartDataPoint>>(v.clone()).is_ok() {
        return Ok(serde_json::from_value(v)?);
    }
    Ok(crate::collage::normalize_series(&v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let jsonp = dir.path().join("x.json");
        let pts = vec![ChartDataPoint::new("2024-01", 1.5).with_series("fees", 2.0)];
        save_csv(&pts, &csvp).unwrap();
        save_json(&pts, &jsonp).unwrap();
        let csv = std::fs::read_to_string(&csvp).unwrap();
        assert_eq!(csv.lines().next(), Some("date,value,fees"));
        assert_eq!(load_json(&jsonp).unwrap(), pts);
    }
}
