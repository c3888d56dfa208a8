//! asarprobe - audit installed Electron applications for ASAR integrity protections.

mod config;
mod pool;
mod render;

use anyhow::Context;
use asarprobe_common::Platform;
use asarprobe_detector::{Detector, Locator};
use asarprobe_schema::ScanReport;
use clap::{Parser, ValueEnum};
use config::{FileConfig, Overrides, ScanSettings};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "asarprobe")]
#[command(
    author,
    version,
    about = "Find installed Electron applications and report their ASAR integrity protections"
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// List .node files in Electron applications
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    node_files: Option<bool>,

    /// Maximum number of .node files to list per application (0 for unlimited)
    #[arg(long, value_name = "N")]
    max_node_files: Option<usize>,

    /// Bundle conventions to apply (macos, windows); defaults to the running host
    #[arg(long)]
    platform: Option<String>,

    /// Directory to search instead of the default locations (repeatable)
    #[arg(long = "root", value_name = "DIR")]
    roots: Vec<PathBuf>,

    /// YAML file with scan settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of applications inspected concurrently
    #[arg(long, short = 'j', value_name = "N")]
    jobs: Option<usize>,

    /// Write the report to a file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Log line format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn init_tracing(verbose: bool, format: LogFormat) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

fn load_settings(cli: &Cli) -> anyhow::Result<ScanSettings> {
    let file = match &cli.config {
        Some(path) => FileConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => FileConfig::default(),
    };
    let platform = cli
        .platform
        .as_deref()
        .map(str::parse::<Platform>)
        .transpose()?;

    let overrides = Overrides {
        platform,
        roots: cli.roots.clone(),
        node_files: cli.node_files,
        max_node_files: cli.max_node_files,
        jobs: cli.jobs,
    };
    Ok(ScanSettings::resolve(file, overrides)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_format);

    let settings = load_settings(&cli)?;
    let platform = settings.platform()?;

    let locator = if settings.roots.is_empty() {
        Locator::new(platform)
    } else {
        Locator::explicit(platform, settings.roots.clone())?
    };
    let detector = Detector::new(platform, settings.detector);

    info!("Scanning {} system for Electron applications...", platform);
    let results = pool::inspect_all(detector, locator, settings.jobs).await?;
    info!("Inspected {} candidate applications", results.len());

    let report = ScanReport::new(env!("CARGO_PKG_VERSION"), platform, results);
    let rendered = if cli.json {
        render::render_json(&report)?
    } else {
        render::render_text(&report)?
    };

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report written to {:?}", path);
        }
        None => println!("{}", rendered.trim_end()),
    }

    Ok(())
}
