//! DualTrend CLI — run backtests, generate synthetic data, check configs.
//!
//! Commands:
//! - `run` — execute a backtest from a TOML config file
//! - `generate` — write synthetic CSV series for a universe file
//! - `check-config` — parse and validate a config, print its run id

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dualtrend_runner::providers::{provider_for, write_series_csv, SyntheticProvider};
use dualtrend_runner::universe::read_universe_csv;
use dualtrend_runner::{run_backtest, save_artifacts, BacktestConfig, BacktestReport, DataSource};

#[derive(Parser)]
#[command(
    name = "dualtrend",
    about = "DualTrend CLI — benchmark-filtered trend backtester"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a backtest from a TOML config file.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// Override `backtest.days`.
        #[arg(long)]
        days: Option<usize>,

        /// Use synthetic data instead of the configured source.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Override `data.seed` for synthetic data.
        #[arg(long)]
        seed: Option<u64>,

        /// Override `output.dir`.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Write synthetic `{SYMBOL}.csv` series for a universe file.
    Generate {
        /// Universe CSV (first column holds the symbol).
        #[arg(long)]
        universe: PathBuf,

        /// Directory to write the series into.
        #[arg(long, default_value = "data")]
        dir: PathBuf,

        /// Start date (YYYY-MM-DD).
        #[arg(long)]
        start: NaiveDate,

        /// End date (YYYY-MM-DD).
        #[arg(long)]
        end: NaiveDate,

        /// Benchmark symbol, written alongside the universe.
        #[arg(long, default_value = "SPY")]
        benchmark: String,

        /// Seed mixed into every symbol's random walk.
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Parse and validate a config file, then print its run id.
    CheckConfig {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            days,
            synthetic,
            seed,
            output_dir,
        } => run_backtest_cmd(&config, days, synthetic, seed, output_dir),
        Commands::Generate {
            universe,
            dir,
            start,
            end,
            benchmark,
            seed,
        } => run_generate(&universe, &dir, start, end, &benchmark, seed),
        Commands::CheckConfig { config } => run_check_config(&config),
    }
}

fn run_backtest_cmd(
    config_path: &Path,
    days: Option<usize>,
    synthetic: bool,
    seed: Option<u64>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let mut config = BacktestConfig::load(config_path)?;
    if let Some(days) = days {
        config.backtest.days = days;
    }
    if synthetic {
        config.data.source = DataSource::Synthetic;
    }
    if let Some(seed) = seed {
        config.data.seed = seed;
    }
    if let Some(dir) = output_dir {
        config.output.dir = dir;
    }
    config.validate()?;

    let provider = provider_for(&config.data);
    let report = run_backtest(&config, provider.as_ref())?;

    print_summary(&report);

    let run_dir = save_artifacts(&report, &config.output.dir)?;
    println!("Artifacts saved to: {}", run_dir.display());
    if let Some(logs) = &report.trade_logs {
        println!("Trade logs: {}, {}", logs.long.display(), logs.short.display());
    }

    Ok(())
}

fn print_summary(report: &BacktestReport) {
    let load = &report.load;
    let s = &report.summary;

    println!();
    println!(" Number of instruments dropped due to error: {}", load.dropped_errors);
    println!(
        " Number of instruments dropped due to missing data: {}",
        load.dropped_misaligned
    );
    println!(" Number of instruments successfully fetched: {}", load.fetched);
    println!();
    println!(" Period: {} to {} ({} days)", report.start_date, report.end_date, s.days);
    println!(" Number of long trades: {}", s.long_trades);
    println!(" Number of short trades: {}", s.short_trades);
    println!(" Total closed PnL: {:.4}", s.realized_total);
    if report.synthetic {
        println!(" (synthetic data)");
    }
    println!();
}

fn run_generate(
    universe: &Path,
    dir: &Path,
    start: NaiveDate,
    end: NaiveDate,
    benchmark: &str,
    seed: u64,
) -> Result<()> {
    if start >= end {
        bail!("--start ({start}) must be before --end ({end})");
    }

    let mut symbols = vec![benchmark.to_string()];
    symbols.extend(
        read_universe_csv(universe)?
            .into_iter()
            .filter(|s| s != benchmark),
    );

    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let provider = SyntheticProvider::new(seed);
    for symbol in &symbols {
        let path = dir.join(format!("{symbol}.csv"));
        write_series_csv(&path, &provider.generate(symbol, start, end))?;
    }

    info!(count = symbols.len(), dir = %dir.display(), "synthetic series written");
    println!("Wrote {} series to {}", symbols.len(), dir.display());
    Ok(())
}

fn run_check_config(config_path: &Path) -> Result<()> {
    let config = BacktestConfig::load(config_path)?;
    let universe = config.data.universe.resolve()?;

    println!("Config OK: {}", config_path.display());
    println!("  run id:    {}", config.run_id()?);
    println!("  benchmark: {}", config.backtest.benchmark);
    println!("  days:      {}", config.backtest.days);
    println!("  universe:  {} symbols", universe.len());
    println!(
        "  period:    {} to {}",
        config.data.start, config.data.end
    );
    Ok(())
}
