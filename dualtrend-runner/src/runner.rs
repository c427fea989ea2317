//! Backtest runner — wires together configuration, data, engine and logs.
//!
//! Two entry points:
//! - `run_backtest()`: loads data through a provider and writes the trade
//!   logs to the configured output directory. Used by the CLI.
//! - `run_backtest_from_data()`: takes pre-loaded data and any log sink.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

use dualtrend_core::{
    EngineError, HistoricalDataProvider, ResultSeries, RunSummary, SimulationEngine,
    StrategyParams, TradeLogSink,
};

use crate::config::{BacktestConfig, ConfigError, DataSource};
use crate::data_loader::{load_series, LoadError, LoadReport, LoadedData};
use crate::trade_log::{create_file_logs, TradeLogPaths};
use crate::universe::UniverseError;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("universe error: {0}")]
    Universe(#[from] UniverseError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
    #[error("failed to create trade logs in {dir}: {source}")]
    TradeLog {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub run_id: String,
    pub dataset_hash: String,
    pub synthetic: bool,
    pub benchmark: String,
    /// Instruments traded, in processing order.
    pub instruments: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub params: StrategyParams,
    pub load: LoadReport,
    pub summary: RunSummary,
    pub series: ResultSeries,
    /// Set when the logs went to files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_logs: Option<TradeLogPaths>,
}

/// Default schema version for JSON written before the field existed.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Load data through `provider` and run, writing trade logs to
/// `config.output.dir`.
pub fn run_backtest(
    config: &BacktestConfig,
    provider: &dyn HistoricalDataProvider,
) -> Result<BacktestReport, RunError> {
    config.validate()?;
    let universe = config.data.universe.resolve()?;
    let loaded = load_series(
        provider,
        &config.backtest.benchmark,
        &universe,
        config.data.start,
        config.data.end,
    )?;

    let output = &config.output;
    let (mut log, paths) = create_file_logs(&output.dir, &output.long_log, &output.short_log)
        .map_err(|source| RunError::TradeLog {
            dir: output.dir.clone(),
            source,
        })?;

    let mut report = run_backtest_from_data(config, &loaded, &mut log)?;
    report.trade_logs = Some(paths);
    Ok(report)
}

/// Run on already-loaded data.
///
/// The traded universe is the loaded instruments, preceded by the benchmark
/// when `backtest.trade_benchmark` is set.
pub fn run_backtest_from_data(
    config: &BacktestConfig,
    loaded: &LoadedData,
    log: &mut dyn TradeLogSink,
) -> Result<BacktestReport, RunError> {
    let benchmark = loaded.store.benchmark_symbol().to_string();
    let mut instruments = Vec::with_capacity(loaded.universe.len() + 1);
    if config.backtest.trade_benchmark {
        instruments.push(benchmark.clone());
    }
    instruments.extend(loaded.universe.iter().cloned());

    let params = config.strategy_params();
    let mut engine = SimulationEngine::new(&loaded.store, &instruments, params)?;
    let result = engine.run(config.backtest.days, log)?;

    let dates = loaded.store.dates();
    let summary = result.summary();
    info!(
        long_trades = summary.long_trades,
        short_trades = summary.short_trades,
        realized = summary.realized_total,
        "backtest complete"
    );

    Ok(BacktestReport {
        schema_version: SCHEMA_VERSION,
        run_id: config.run_id()?,
        dataset_hash: loaded.dataset_hash.clone(),
        synthetic: config.data.source == DataSource::Synthetic,
        benchmark,
        instruments,
        start_date: dates[result.start_index],
        end_date: dates[result.start_index + result.series.len() - 1],
        params,
        load: loaded.report.clone(),
        summary,
        series: result.series,
        trade_logs: None,
    })
}
