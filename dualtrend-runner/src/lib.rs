//! DualTrend Runner — backtest orchestration around `dualtrend-core`.
//!
//! This crate provides:
//! - TOML configuration with validation and a content-hash run id
//! - Instrument universe files
//! - CSV and synthetic data providers
//! - Data loading with per-reason drop counts
//! - Trade log files
//! - The single-backtest runner and JSON/CSV/Markdown export

pub mod config;
pub mod data_loader;
pub mod export;
pub mod providers;
pub mod runner;
pub mod trade_log;
pub mod universe;

pub use config::{BacktestConfig, ConfigError, DataSource, RunId};
pub use data_loader::{load_series, LoadError, LoadReport, LoadedData};
pub use export::{
    export_json, export_series_csv, export_summary_markdown, import_json, load_artifacts,
    save_artifacts,
};
pub use providers::{provider_for, write_series_csv, CsvProvider, SyntheticProvider};
pub use runner::{run_backtest, run_backtest_from_data, BacktestReport, RunError, SCHEMA_VERSION};
pub use trade_log::{create_file_logs, FileTradeLog, TradeLogPaths};
pub use universe::{UniverseError, UniverseSpec};
