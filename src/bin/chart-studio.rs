use anyhow::{Context, Result, anyhow, bail};
use chart_studio::aggregate::{aggregate_data_by_period_from, detect_granularity};
use chart_studio::annotations::{Annotation, parse_annotations};
use chart_studio::brush::{BrushController, DataChange, filter_by_date_range};
use chart_studio::collage::{
    COLLAGE_METRICS, CollageMetricData, CollageSession, extract_metric, metric_config,
};
use chart_studio::settings::{
    ChartType, ExportQualityPatch, ExportSettings, ImageFormat, Preset, Resolution, SettingsState,
    Theme, preset_settings,
};
use chart_studio::templates::{JsonFileRepository, TemplateStore, export_file_name};
use chart_studio::viz::{Composition, FooterInfo};
use chart_studio::{
    ChartDataPoint, Client, MetricsSource, Period, RangePreset, StudioConfig, StudioError, ViewMode,
    export, stats, storage,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "chart-studio",
    version,
    about = "Fetch chain metrics, annotate them and export chart images"
)]
struct Cli {
    /// API host (overrides CHART_STUDIO_BASE_URL).
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Template list file (overrides CHART_STUDIO_TEMPLATES).
    #[arg(long, global = true)]
    templates_file: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch one metric and save it as CSV or JSON (and optionally print stats).
    Fetch(FetchArgs),
    /// Render a single chart image.
    Render(RenderArgs),
    /// Render a collage of several metrics.
    Collage(CollageArgs),
    /// Manage saved templates.
    #[command(subcommand)]
    Templates(TemplatesCmd),
    /// Print a preset's settings as JSON (all presets when no name is given).
    Presets {
        name: Option<String>,
    },
    /// List the metrics available to `fetch`, `render` and `collage`.
    Metrics,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug, Clone)]
struct WindowArgs {
    /// Aggregation period: D, W, M, Q or Y.
    #[arg(long, default_value = "D")]
    period: String,
    /// Visible window: 1M, 3M, 6M, 1Y or ALL.
    #[arg(long, default_value = "3M")]
    range: String,
}

#[derive(Args, Debug)]
struct FetchArgs {
    /// Chain id, e.g. 43114.
    #[arg(short, long)]
    chain: String,
    /// Metric key (see `chart-studio metrics`).
    #[arg(short, long)]
    metric: String,
    #[command(flatten)]
    window: WindowArgs,
    /// Save results to file (format from --format or the extension).
    #[arg(long)]
    out: Option<PathBuf>,
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Print summary statistics to stdout.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

#[derive(Args, Debug, Clone)]
struct LookArgs {
    /// Preset name: default, social-media, slide-deck, collage, customize.
    #[arg(long)]
    preset: Option<String>,
    /// Saved template name or id; replaces the preset's settings.
    #[arg(long)]
    template: Option<String>,
    /// JSON file with a full settings object.
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Image format: png, jpeg or svg.
    #[arg(long)]
    format: Option<String>,
    /// Resolution factor 1-4.
    #[arg(long)]
    resolution: Option<u32>,
    #[arg(long, value_parser = ["light", "dark", "rich", "auto"])]
    theme: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// JSON file with an array of annotations.
    #[arg(long)]
    annotations: Option<PathBuf>,
    /// Output directory (overrides CHART_STUDIO_OUT_DIR).
    #[arg(long)]
    out_dir: Option<PathBuf>,
    /// File name stem; the date and extension are appended.
    #[arg(long)]
    name: Option<String>,
    /// TTF font for chart text (overrides CHART_STUDIO_FONT).
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[arg(short, long, required_unless_present = "data")]
    chain: Option<String>,
    #[arg(short, long, default_value = "txCount")]
    metric: String,
    /// Read the series from a JSON file instead of the API.
    #[arg(long, conflicts_with = "chain")]
    data: Option<PathBuf>,
    #[arg(long)]
    title: Option<String>,
    /// Chart type: line, bar or area.
    #[arg(long, value_parser = ["line", "bar", "area"])]
    chart_type: Option<String>,
    #[command(flatten)]
    window: WindowArgs,
    #[command(flatten)]
    look: LookArgs,
}

#[derive(Args, Debug)]
struct CollageArgs {
    #[arg(short, long)]
    chain: String,
    /// Metric keys separated by comma or semicolon.
    #[arg(short, long, default_value = "activeAddresses,txCount,gasUsed,feesPaid")]
    metrics: String,
    #[arg(long)]
    title: Option<String>,
    #[command(flatten)]
    window: WindowArgs,
    #[command(flatten)]
    look: LookArgs,
}

#[derive(Subcommand, Debug)]
enum TemplatesCmd {
    List,
    /// Save a template from a preset or a settings file.
    Save {
        name: String,
        #[arg(long)]
        preset: Option<String>,
        #[arg(long)]
        settings: Option<PathBuf>,
    },
    Delete {
        id: String,
    },
    Duplicate {
        id: String,
    },
    Rename {
        id: String,
        name: String,
    },
    /// Write templates to an exchange file (all when no ids are given).
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
        ids: Vec<String>,
    },
    Import {
        file: PathBuf,
    },
}

fn parse_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn parse_window(w: &WindowArgs) -> Result<(Period, RangePreset)> {
    let period = Period::parse(&w.period)
        .ok_or_else(|| anyhow!("invalid --period '{}', expected D, W, M, Q or Y", w.period))?;
    let range = RangePreset::parse(&w.range)
        .ok_or_else(|| anyhow!("invalid --range '{}', expected 1M, 3M, 6M, 1Y or ALL", w.range))?;
    Ok((period, range))
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

fn open_store(cfg: &StudioConfig) -> TemplateStore<JsonFileRepository> {
    TemplateStore::new(cfg.template_repository())
}

fn read_settings(path: &Path) -> Result<ExportSettings> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse settings {}", path.display()))
}

fn read_annotations(path: Option<&Path>) -> Result<Vec<Annotation>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_annotations(&s).with_context(|| format!("parse annotations {}", path.display()))
}

/// Settings from preset, then template or settings file, then individual flags.
fn build_settings(
    cfg: &StudioConfig,
    look: &LookArgs,
    default_preset: Preset,
) -> Result<SettingsState> {
    let preset = match look.preset.as_deref() {
        Some(p) => Preset::parse(p)?,
        None => default_preset,
    };
    let mut state = SettingsState::new(preset);
    if let Some(name) = look.template.as_deref() {
        let store = open_store(cfg);
        let t = store
            .find(name)
            .ok_or_else(|| StudioError::TemplateNotFound(name.to_string()))?;
        state.apply_template(t.settings.clone());
    }
    if let Some(path) = look.settings.as_deref() {
        state.apply_template(read_settings(path)?);
    }
    let format = match look.format.as_deref() {
        Some(f) => Some(ImageFormat::parse(f).ok_or_else(|| anyhow!("invalid --format '{f}'"))?),
        None => None,
    };
    let resolution = match look.resolution {
        Some(r) => Some(
            Resolution::from_factor(r).ok_or_else(|| anyhow!("--resolution must be 1-4"))?,
        ),
        None => None,
    };
    if format.is_some() || resolution.is_some() {
        state.update_export_quality(ExportQualityPatch {
            format,
            resolution,
            ..Default::default()
        });
    }
    if let Some(t) = look.theme.as_deref() {
        let theme: Theme = serde_json::from_value(serde_json::Value::String(t.to_string()))?;
        state.set_theme(theme);
    }
    if let Some(d) = look.description.as_ref() {
        state.set_description(Some(d.clone()));
    }
    Ok(state)
}

fn out_dir(cfg: &StudioConfig, look: &LookArgs) -> PathBuf {
    look.out_dir.clone().unwrap_or_else(|| cfg.out_dir.clone())
}

fn font_path<'a>(cfg: &'a StudioConfig, look: &'a LookArgs) -> Option<&'a Path> {
    look.font.as_deref().or(cfg.font_path.as_deref())
}

fn fetch_metric(
    client: &Client,
    chain: &str,
    metric: &str,
    period: Period,
) -> Result<Vec<ChartDataPoint>> {
    let config =
        metric_config(metric).ok_or_else(|| StudioError::UnknownMetric(metric.to_string()))?;
    let stats = client.fetch_chain_stats(chain)?;
    Ok(extract_metric(&stats, config, period))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut cfg = StudioConfig::from_env();
    if let Some(url) = cli.base_url {
        cfg.base_url = url;
    }
    if let Some(p) = cli.templates_file {
        cfg.templates_path = Some(p);
    }
    match cli.cmd {
        Command::Fetch(args) => cmd_fetch(&cfg, args),
        Command::Render(args) => cmd_render(&cfg, args),
        Command::Collage(args) => cmd_collage(&cfg, args),
        Command::Templates(cmd) => cmd_templates(&cfg, cmd),
        Command::Presets { name } => cmd_presets(name.as_deref()),
        Command::Metrics => {
            for m in COLLAGE_METRICS {
                println!("{:<22} {:<26} {}", m.key, m.label, m.unit);
            }
            Ok(())
        }
    }
}

fn cmd_fetch(cfg: &StudioConfig, args: FetchArgs) -> Result<()> {
    let (period, range) = parse_window(&args.window)?;
    let client = Client::new(&cfg.base_url);
    let data = fetch_metric(&client, &args.chain, &args.metric, period)?;
    let mut brush = BrushController::new(period);
    brush.select_preset(range, data.len());
    let points = brush.visible(&data);

    if let Some(path) = args.out.as_ref() {
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_csv(points, path)?,
            "json" => storage::save_json(points, path)?,
            other => bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} rows to {}", points.len(), path.display());
    }

    if args.stats {
        let s = stats::series_summary(points, "value");
        println!(
            "{} • {}  count={} missing={}  min={} max={} mean={} median={} total={} latest={} change={}%",
            args.chain,
            args.metric,
            s.count,
            s.missing,
            fmt_opt(s.min),
            fmt_opt(s.max),
            fmt_opt(s.mean),
            fmt_opt(s.median),
            fmt_opt(s.total),
            fmt_opt(s.latest),
            fmt_opt(s.change_pct),
        );
    }
    Ok(())
}

fn cmd_render(cfg: &StudioConfig, args: RenderArgs) -> Result<()> {
    let (period, range) = parse_window(&args.window)?;
    let mut state = build_settings(cfg, &args.look, Preset::Default)?;
    if let Some(t) = args.chart_type.as_deref() {
        let chart_type: ChartType =
            serde_json::from_value(serde_json::Value::String(t.to_string()))?;
        state.set_chart_type(chart_type);
    }

    let data = match (&args.data, &args.chain) {
        (Some(path), _) => {
            let raw = storage::load_json(path)?;
            let current = detect_granularity(&raw);
            aggregate_data_by_period_from(&raw, current, period)
        }
        (None, Some(chain)) => {
            fetch_metric(&Client::new(&cfg.base_url), chain, &args.metric, period)?
        }
        (None, None) => bail!("either --chain or --data is required"),
    };
    if data.is_empty() {
        return Err(StudioError::EmptyData.into());
    }

    let mut brush = BrushController::new(period);
    brush.select_preset(range, data.len());
    let visible = brush.visible(&data);
    let annotations = read_annotations(args.look.annotations.as_deref())?;

    let title = args.title.clone().unwrap_or_else(|| {
        metric_config(&args.metric)
            .map(|m| m.label.to_string())
            .unwrap_or_else(|| args.metric.clone())
    });
    let mut comp = Composition::single(state.settings(), &title, visible)
        .with_annotations(&annotations)
        .with_footer(FooterInfo::new(today()));
    if let Some(chain) = args.chain.as_deref() {
        comp = comp.with_chain_name(chain);
    }
    let name = args.look.name.clone().unwrap_or_else(|| args.metric.clone());
    let dir = out_dir(cfg, &args.look);
    let path = export::render_to_file(&comp, &dir, &name, today(), font_path(cfg, &args.look))?;
    eprintln!("Wrote chart to {}", path.display());
    Ok(())
}

fn cmd_collage(cfg: &StudioConfig, args: CollageArgs) -> Result<()> {
    let (period, range) = parse_window(&args.window)?;
    let state = build_settings(cfg, &args.look, Preset::Collage)?;
    let keys = parse_list(&args.metrics);
    if let Some(bad) = keys.iter().find(|k| metric_config(k).is_none()) {
        return Err(StudioError::UnknownMetric(bad.clone()).into());
    }

    let client = Client::new(&cfg.base_url);
    let mut session = CollageSession::new();
    session.load(&client, &args.chain, &keys, period);

    // The longest series drives the brush; every tile shows the same dates.
    let reference = session.reference_series();
    let mut brush = BrushController::new(period);
    brush.on_data_changed(DataChange::ModeSwitch(ViewMode::Collage), reference.len());
    brush.select_preset(range, reference.len());
    let bounds = brush.date_bounds(reference);

    let windowed: Vec<CollageMetricData> = session
        .ordered()
        .into_iter()
        .map(|m| {
            let mut m = m.clone();
            if let Some((from, to)) = bounds.as_ref() {
                m.data = filter_by_date_range(&m.data, from, to);
            }
            m
        })
        .collect();
    let refs: Vec<&CollageMetricData> = windowed.iter().collect();
    for (key, s) in stats::collage_summary(&refs) {
        log::info!("{key}: {} points, latest {}", s.count, fmt_opt(s.latest));
    }

    let annotations = read_annotations(args.look.annotations.as_deref())?;
    let title = args.title.clone().unwrap_or_else(|| format!("Chain {} overview", args.chain));
    let comp = Composition::collage(state.settings(), &title, &refs)
        .with_annotations(&annotations)
        .with_footer(FooterInfo::new(today()))
        .with_chain_name(args.chain.as_str());
    let name = args.look.name.clone().unwrap_or_else(|| "collage".to_string());
    let dir = out_dir(cfg, &args.look);
    let path = export::render_to_file(&comp, &dir, &name, today(), font_path(cfg, &args.look))?;
    eprintln!("Wrote collage to {}", path.display());
    Ok(())
}

fn cmd_templates(cfg: &StudioConfig, cmd: TemplatesCmd) -> Result<()> {
    let mut store = open_store(cfg);
    match cmd {
        TemplatesCmd::List => {
            for t in store.templates() {
                println!("{}  {}  ({})", t.id, t.name, t.settings.preset);
            }
        }
        TemplatesCmd::Save {
            name,
            preset,
            settings,
        } => {
            let snapshot = match (settings, preset) {
                (Some(path), _) => read_settings(&path)?,
                (None, Some(p)) => preset_settings(Preset::parse(&p)?),
                (None, None) => preset_settings(Preset::Default),
            };
            let t = store.save_template(&name, &snapshot);
            println!("{}  {}", t.id, t.name);
        }
        TemplatesCmd::Delete { id } => {
            let id = resolve_id(&store, &id)?;
            store.delete_template(&id);
        }
        TemplatesCmd::Duplicate { id } => {
            let id = resolve_id(&store, &id)?;
            match store.duplicate_template(&id) {
                Some(t) => println!("{}  {}", t.id, t.name),
                None => {
                    let limit = chart_studio::templates::MAX_TEMPLATES;
                    return Err(StudioError::TemplateLimit(limit).into());
                }
            }
        }
        TemplatesCmd::Rename { id, name } => {
            let id = resolve_id(&store, &id)?;
            store.rename_template(&id, &name);
        }
        TemplatesCmd::Export { out, ids } => {
            let selected = (!ids.is_empty())
                .then(|| ids.iter().map(|i| resolve_id(&store, i)).collect::<Result<Vec<_>>>())
                .transpose()?;
            let json = store.export_templates(selected.as_deref())?;
            let path = out.unwrap_or_else(|| cfg.out_dir.join(export_file_name(today())));
            fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
            eprintln!("Exported templates to {}", path.display());
        }
        TemplatesCmd::Import { file } => {
            let json = fs::read_to_string(&file)
                .with_context(|| format!("read {}", file.display()))?;
            let result = store.import_templates(&json);
            if let Some(err) = result.error {
                bail!("{err}");
            }
            println!("imported {} template(s), {} failed", result.success, result.failed);
        }
    }
    if let Some(e) = store.error() {
        bail!("{e}");
    }
    Ok(())
}

fn resolve_id(store: &TemplateStore<JsonFileRepository>, name_or_id: &str) -> Result<String> {
    store
        .find(name_or_id)
        .map(|t| t.id.clone())
        .ok_or_else(|| StudioError::TemplateNotFound(name_or_id.to_string()).into())
}

fn cmd_presets(name: Option<&str>) -> Result<()> {
    let json = match name {
        Some(n) => serde_json::to_string_pretty(&preset_settings(Preset::parse(n)?))?,
        None => {
            let all: serde_json::Map<String, serde_json::Value> = Preset::ALL
                .into_iter()
                .map(|p| Ok((p.name().to_string(), serde_json::to_value(preset_settings(p))?)))
                .collect::<Result<_>>()?;
            serde_json::to_string_pretty(&all)?
        }
    };
    println!("{json}");
    Ok(())
}
