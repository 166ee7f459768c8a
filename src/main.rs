use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args as ClapArgs, CommandFactory, Parser};
use clap_complete::Shell;
use tracing::info;
use tracing_subscriber::EnvFilter;

use trendmap::export::{OutputFormat, svg_to_pdf, svg_to_png};
use trendmap::render::{MapStyle, render_report};
use trendmap::{LayoutConfig, SurveyInput, TrendLayout};

/// Lay out survey places on a radial trend map
#[derive(Parser, Debug)]
#[command(name = "trendmap")]
#[command(version)]
#[command(about = "Lay out survey places as a radial trend map (JSON, SVG, PNG or PDF)", long_about = None)]
struct Args {
    /// Survey JSON file (use "-" for stdin)
    #[arg(value_name = "INPUT", required_unless_present = "completions")]
    input: Option<PathBuf>,

    /// Output file path (extension determines format: .json, .svg, .png or .pdf)
    #[arg(short, long, value_name = "OUTPUT", required_unless_present = "completions")]
    output: Option<PathBuf>,

    /// Layout config file (TOML or YAML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: LayoutOverrides,

    /// Image width in pixels
    #[arg(short, long, default_value_t = 1120.0)]
    width: f32,

    /// Raster scale multiplier for PNG output
    #[arg(long, default_value_t = 1.0)]
    png_scale: f32,

    /// Log per-place decisions
    #[arg(short, long)]
    verbose: bool,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

/// Per-run overrides applied on top of the config file.
#[derive(ClapArgs, Debug, Default)]
struct LayoutOverrides {
    /// Distance numerator: k / log10(metric)
    #[arg(long)]
    k: Option<f64>,
    #[arg(long)]
    min_d: Option<f64>,
    #[arg(long)]
    max_d: Option<f64>,
    /// Distance removed per extra vote
    #[arg(long)]
    vote_weight: Option<f64>,
    #[arg(long)]
    size_base: Option<f64>,
    #[arg(long)]
    size_scale: Option<f64>,
    #[arg(long)]
    size_alpha: Option<f64>,
    #[arg(long)]
    size_max: Option<f64>,
    /// Relaxation iterations
    #[arg(long)]
    iters: Option<usize>,
    #[arg(long)]
    padding: Option<f64>,
    #[arg(long)]
    repel_strength: Option<f64>,
    #[arg(long)]
    pull_strength: Option<f64>,
    /// Stop relaxing early once total push drops below this value
    #[arg(long)]
    settle_threshold: Option<f64>,
    /// Reasons listed per hover payload
    #[arg(long)]
    reason_limit: Option<usize>,
}

impl LayoutOverrides {
    fn apply(&self, config: &mut LayoutConfig) {
        fn set<T: Copy>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        set(&mut config.k, self.k);
        set(&mut config.min_d, self.min_d);
        set(&mut config.max_d, self.max_d);
        set(&mut config.vote_weight, self.vote_weight);
        set(&mut config.size_base, self.size_base);
        set(&mut config.size_scale, self.size_scale);
        set(&mut config.size_alpha, self.size_alpha);
        set(&mut config.size_max, self.size_max);
        set(&mut config.iters, self.iters);
        set(&mut config.padding, self.padding);
        set(&mut config.repel_strength, self.repel_strength);
        set(&mut config.pull_strength, self.pull_strength);
        set(&mut config.reason_limit, self.reason_limit);
        if self.settle_threshold.is_some() {
            config.settle_threshold = self.settle_threshold;
        }
    }
}

fn main() -> Result<(), String> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "trendmap", &mut std::io::stdout());
        return Ok(());
    }

    init_tracing(args.verbose);

    let (Some(input), Some(output)) = (args.input.as_deref(), args.output.as_deref()) else {
        return Err("Both INPUT and --output are required".to_string());
    };

    let mut config = match args.config {
        Some(ref config_path) => load_config(config_path)?,
        None => LayoutConfig::default(),
    };
    args.overrides.apply(&mut config);
    let engine = TrendLayout::new(config).map_err(|e| format!("Invalid layout config: {}", e))?;

    let survey = read_survey(input)?;
    let report = engine.layout_survey(&survey);
    info!(
        groups = report.groups.len(),
        plot_range = report.plot_range,
        "layout finished"
    );

    let output_ext = output
        .extension()
        .and_then(|e| e.to_str())
        .ok_or("Output file has no extension")?;
    let format = OutputFormat::from_extension(output_ext).ok_or_else(|| {
        format!(
            "Unsupported output format: .{} (use .json, .svg, .png or .pdf)",
            output_ext
        )
    })?;

    let style = MapStyle {
        width: args.width,
        ..MapStyle::default()
    };

    let bytes = match format {
        OutputFormat::Json => serde_json::to_vec_pretty(&report)
            .map_err(|e| format!("Failed to serialize layout: {}", e))?,
        OutputFormat::Svg => render_report(&report, &style).into_bytes(),
        OutputFormat::Png => svg_to_png(&render_report(&report, &style), args.png_scale)
            .map_err(|e| e.to_string())?,
        OutputFormat::Pdf => {
            svg_to_pdf(&render_report(&report, &style)).map_err(|e| e.to_string())?
        }
    };

    std::fs::write(output, bytes)
        .map_err(|e| format!("Failed to write {}: {}", output.display(), e))?;
    info!(path = %output.display(), ?format, "output saved");

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "trendmap=debug"
    } else {
        "trendmap=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn load_config(path: &Path) -> Result<LayoutConfig, String> {
    if !path.is_file() {
        return Err(format!("Config file not found: {}", path.display()));
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file: {}", e))?;
    LayoutConfig::from_str_any(&content).map_err(|e| e.to_string())
}

fn read_survey(input: &Path) -> Result<SurveyInput, String> {
    if input.to_str() == Some("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        SurveyInput::from_json(&buffer).map_err(|e| e.to_string())
    } else {
        SurveyInput::from_path(input).map_err(|e| e.to_string())
    }
}
