use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("chart-studio").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("chart-studio"))
        .stdout(predicate::str::contains("collage"));
}

#[test]
fn presets_print_settings_json() {
    let mut cmd = Command::cargo_bin("chart-studio").unwrap();
    cmd.args(["presets", "slide-deck"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"preset\": \"slide-deck\""))
        .stdout(predicate::str::contains("\"aspectRatio\""));

    let mut cmd = Command::cargo_bin("chart-studio").unwrap();
    cmd.args(["presets", "poster"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown preset"));
}

#[test]
fn metrics_lists_the_registry() {
    let mut cmd = Command::cargo_bin("chart-studio").unwrap();
    cmd.arg("metrics");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("activeAddresses"))
        .stdout(predicate::str::contains("icmMessages"));
}

#[test]
fn render_from_a_data_file() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("series.json");
    let points: Vec<_> = (1..=20)
        .map(|d| serde_json::json!({"date": format!("2024-01-{d:02}"), "value": d * 10}))
        .collect();
    fs::write(&data, serde_json::Value::Array(points).to_string()).unwrap();

    let out = dir.path().join("out");
    let mut cmd = Command::cargo_bin("chart-studio").unwrap();
    cmd.args([
        "render",
        "--data",
        data.to_str().unwrap(),
        "--title",
        "January",
        "--range",
        "ALL",
        "--format",
        "svg",
        "--resolution",
        "1",
        "--name",
        "january",
        "--out-dir",
        out.to_str().unwrap(),
    ]);
    cmd.assert().success();

    let files: Vec<_> = fs::read_dir(&out).unwrap().filter_map(|e| e.ok()).collect();
    assert_eq!(files.len(), 1);
    let name = files[0].file_name().to_string_lossy().into_owned();
    assert!(name.starts_with("january-") && name.ends_with(".svg"));
}

#[test]
fn templates_round_trip_through_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("templates.json");
    let store_arg = store.to_str().unwrap();

    let mut cmd = Command::cargo_bin("chart-studio").unwrap();
    cmd.args([
        "--templates-file",
        store_arg,
        "templates",
        "save",
        "Deck",
        "--preset",
        "slide-deck",
    ]);
    cmd.assert().success().stdout(predicate::str::contains("Deck"));

    let exported = dir.path().join("bundle.json");
    let mut cmd = Command::cargo_bin("chart-studio").unwrap();
    cmd.args([
        "--templates-file",
        store_arg,
        "templates",
        "export",
        "--out",
        exported.to_str().unwrap(),
    ]);
    cmd.assert().success();

    let mut cmd = Command::cargo_bin("chart-studio").unwrap();
    cmd.args(["--templates-file", store_arg, "templates", "import", exported.to_str().unwrap()]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("imported 1 template(s), 0 failed"));

    let mut cmd = Command::cargo_bin("chart-studio").unwrap();
    cmd.args(["--templates-file", store_arg, "templates", "list"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Deck (imported)"));
}

// Live test (opt-in): cargo test --features online
#[cfg(feature = "online")]
#[test]
fn fetch_online_tx_count() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("tx.csv");
    let mut cmd = Command::cargo_bin("chart-studio").unwrap();
    cmd.args([
        "fetch",
        "--chain",
        "43114",
        "--metric",
        "txCount",
        "--period",
        "M",
        "--range",
        "1Y",
        "--out",
        out.to_str().unwrap(),
        "--stats",
    ]);
    cmd.assert().success();
    assert!(fs::read_to_string(&out).unwrap().starts_with("date,value"));
}
