//! Macrodex CLI — direction index reports from macro and price series.
//!
//! Commands:
//! - `current` — latest index reading as JSON
//! - `history` — index history as JSON or CSV
//! - `correlation` — index/price correlation summary
//! - `report` — save the full artifact bundle (JSON, CSV, Markdown)
//! - `demo` — full report on seeded synthetic data
//!
//! Logs go to stderr so stdout stays machine-readable.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use macrodex_core::{IndexHistoryBuilder, SystemClock};
use macrodex_runner::{
    build_report, export_history_csv, generate_summary, generate_synthetic, load_sources,
    run_report, save_report, MacroReport, ReportConfig, ReportOptions,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "macrodex",
    about = "Macrodex CLI — liquidity, PMI and price momentum direction index"
)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the latest index reading as JSON.
    Current {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,
    },
    /// Print or write the index history.
    History {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        #[arg(long, value_enum, default_value_t = HistoryFormat::Json)]
        format: HistoryFormat,

        /// Write to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Correlation between the index history and the price.
    Correlation {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// Compare the index with the price this many days later.
        #[arg(long, default_value_t = 30)]
        lag_days: u32,
    },
    /// Build a full report and save report.json, history.csv and summary.md.
    Report {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        #[arg(long, default_value_t = 30)]
        lag_days: u32,

        /// Output directory for the report bundle.
        #[arg(long, default_value = "reports")]
        output_dir: PathBuf,
    },
    /// Run a full report on synthetic data.
    Demo {
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Days of synthetic history.
        #[arg(long, default_value_t = 730)]
        days: u32,

        /// First synthetic date (YYYY-MM-DD).
        #[arg(long, default_value = "2023-01-01")]
        start: String,

        /// Also save the report bundle here.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum HistoryFormat {
    Json,
    Csv,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Current { config } => run_current(&config),
        Commands::History {
            config,
            format,
            output,
        } => run_history(&config, format, output.as_deref()),
        Commands::Correlation { config, lag_days } => run_correlation(&config, lag_days),
        Commands::Report {
            config,
            lag_days,
            output_dir,
        } => run_report_cmd(&config, lag_days, &output_dir),
        Commands::Demo {
            seed,
            days,
            start,
            output_dir,
        } => run_demo(seed, days, &start, output_dir.as_deref()),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: &Path) -> Result<ReportConfig> {
    ReportConfig::from_file(path)
        .with_context(|| format!("failed to load config {}", path.display()))
}

fn full_report(config_path: &Path, lag_days: u32) -> Result<MacroReport> {
    let config = load_config(config_path)?;
    run_report(&config, lag_days, &SystemClock).context("failed to build report")
}

fn run_current(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let data = load_sources(&config.sources)?;
    tracing::debug!(
        observations = data.sources.observation_count(),
        hash = %data.dataset_hash,
        "sources loaded"
    );
    let builder = IndexHistoryBuilder::new(&data.sources, config.history.history_config());
    let Some(current) = builder.current(&SystemClock) else {
        bail!("no date is covered by every liquidity and price source");
    };
    println!("{}", serde_json::to_string_pretty(&current)?);
    Ok(())
}

fn run_history(config_path: &Path, format: HistoryFormat, output: Option<&Path>) -> Result<()> {
    let report = full_report(config_path, 0)?;
    let content = match format {
        HistoryFormat::Json => serde_json::to_string_pretty(&report.history)?,
        HistoryFormat::Csv => export_history_csv(&report.history)?,
    };
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!(
                "Wrote {} history points to {}",
                report.history.len(),
                path.display()
            );
        }
        None => println!("{content}"),
    }
    Ok(())
}

fn run_correlation(config_path: &Path, lag_days: u32) -> Result<()> {
    let report = full_report(config_path, lag_days)?;
    let c = &report.correlation;
    println!("Samples:          {}", c.sample_size);
    println!("Pearson r:        {:.4}", c.coefficient);
    println!("Lagged r ({:>3}d): {:.4}", c.lag_days, c.lagged_coefficient);
    Ok(())
}

fn run_report_cmd(config_path: &Path, lag_days: u32, output_dir: &Path) -> Result<()> {
    let report = full_report(config_path, lag_days)?;
    let run_dir = save_report(&report, output_dir)?;
    print!("{}", generate_summary(&report));
    println!("Report saved to: {}", run_dir.display());
    Ok(())
}

fn run_demo(seed: u64, days: u32, start: &str, output_dir: Option<&Path>) -> Result<()> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d")
        .with_context(|| format!("invalid --start date '{start}'"))?;
    let data = generate_synthetic(seed, start, days);
    let report = build_report(&data, &ReportOptions::default(), &SystemClock);

    print!("{}", generate_summary(&report));
    if let Some(dir) = output_dir {
        let run_dir = save_report(&report, dir)?;
        println!("Report saved to: {}", run_dir.display());
    }
    Ok(())
}
