use chart_studio::ChartDataPoint;
use chart_studio::annotations::AnnotationEngine;
use chart_studio::collage::{CollageMetricData, LOAD_ERROR, metric_config};
use chart_studio::export::{render, render_to_file};
use chart_studio::settings::{
    AspectRatio, BackgroundPatch, BackgroundType, ChartDisplayPatch, ExportQualityPatch,
    ImageFormat, Preset, Resolution, SettingsState, Theme,
};
use chart_studio::viz::{Composition, canvas_size};

fn series(n: usize) -> Vec<ChartDataPoint> {
    (0..n)
        .map(|i| {
            let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
            let day = start + chrono::Duration::days(i as i64);
            ChartDataPoint::new(day.format("%Y-%m-%d").to_string(), 1000.0 + (i * i) as f64)
        })
        .collect()
}

fn state(format: ImageFormat) -> SettingsState {
    let mut s = SettingsState::new(Preset::Default);
    s.update_export_quality(ExportQualityPatch {
        format: Some(format),
        resolution: Some(Resolution::X1),
        ..Default::default()
    });
    s
}

#[test]
fn png_has_the_canvas_size() {
    let data = series(30);
    let mut s = state(ImageFormat::Png);
    s.update_chart_display(ChartDisplayPatch {
        show_avg_line: Some(true),
        show_summary_stats: Some(true),
        show_trend_indicator: Some(true),
        ..Default::default()
    });
    let mut engine = AnnotationEngine::new();
    engine.add_highlight(80.0, 20.0);
    engine.add_arrow(20.0, 80.0, 70.0, 30.0);
    engine.add_text(50.0, 50.0, Some("Spike"));

    let comp = Composition::single(s.settings(), "Daily transactions", &data)
        .with_annotations(engine.annotations());
    let img = render(&comp, None).unwrap();
    assert_eq!((img.width, img.height), (1200, 675));
    assert_eq!(&img.bytes[..8], b"\x89PNG\r\n\x1a\n");

    let decoded = image::load_from_memory(&img.bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (1200, 675));
}

#[test]
fn jpeg_and_resolution_scale() {
    let data = series(10);
    let mut s = state(ImageFormat::Jpeg);
    s.set_aspect_ratio(AspectRatio::Square);
    s.update_export_quality(ExportQualityPatch {
        resolution: Some(Resolution::X2),
        jpeg_quality: Some(60),
        ..Default::default()
    });
    s.set_theme(Theme::Dark);
    assert_eq!(canvas_size(s.settings()), (2400, 2400));

    let comp = Composition::single(s.settings(), "Fees", &data);
    let img = render(&comp, None).unwrap();
    assert_eq!(&img.bytes[..2], &[0xFF, 0xD8]);
    assert_eq!((img.width, img.height), (2400, 2400));
}

#[test]
fn svg_keeps_transparency_and_size() {
    let data = series(12);
    let mut s = state(ImageFormat::Svg);
    s.update_background(BackgroundPatch {
        kind: Some(BackgroundType::Transparent),
        ..Default::default()
    });
    let comp = Composition::single(s.settings(), "Gas", &data);
    let img = render(&comp, None).unwrap();
    let svg = String::from_utf8(img.bytes).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("width=\"1200\""));
    assert!(svg.contains("height=\"675\""));
}

#[test]
fn collage_renders_failed_and_empty_tiles() {
    let data = series(40);
    let ok = |key: &str| CollageMetricData {
        config: metric_config(key).unwrap().clone(),
        data: data.clone(),
        is_loading: false,
        error: None,
    };
    let failed = CollageMetricData {
        config: metric_config("gasUsed").unwrap().clone(),
        data: Vec::new(),
        is_loading: false,
        error: Some(LOAD_ERROR.to_string()),
    };
    let metrics = [ok("txCount"), ok("activeAddresses"), ok("avgTps"), failed];
    let refs: Vec<&CollageMetricData> = metrics.iter().collect();

    let mut s = state(ImageFormat::Png);
    s.select_preset(Preset::Collage);
    s.update_export_quality(ExportQualityPatch {
        resolution: Some(Resolution::X1),
        ..Default::default()
    });
    let comp =
        Composition::collage(s.settings(), "Chain overview", &refs).with_chain_name("C-Chain");
    let img = render(&comp, None).unwrap();
    assert_eq!((img.width, img.height), canvas_size(s.settings()));
}

#[test]
fn render_to_file_names_the_output() {
    let dir = tempfile::tempdir().unwrap();
    let data = series(5);
    let s = state(ImageFormat::Png);
    let comp = Composition::single(s.settings(), "Tx", &data);
    let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    let path = render_to_file(&comp, dir.path(), "tx count", date, None).unwrap();
    assert_eq!(path.file_name().unwrap(), "tx-count-2024-03-05.png");
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}

#[test]
fn empty_series_still_renders() {
    let s = state(ImageFormat::Png);
    let comp = Composition::single(s.settings(), "Nothing yet", &[]);
    assert!(render(&comp, None).is_ok());
}
