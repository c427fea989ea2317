//! Serializable backtest configuration, read from TOML.
//!
//! ```toml
//! [backtest]
//! benchmark = "SPY"
//! days = 200
//!
//! [data]
//! source = "csv"
//! dir = "data"
//! universe = "constituents.csv"
//! start = "2016-12-19"
//! end = "2017-12-18"
//! ```
//!
//! `[strategy.benchmark]`, `[strategy.instrument]`, `[stops]` and `[output]`
//! are optional and fall back to the defaults of the core rule types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use dualtrend_core::{BenchmarkTrend, InstrumentTrend, StopPolicy, StopPolicyError, StrategyParams};

use crate::universe::UniverseSpec;

/// Unique identifier for a backtest run (content-addressable hash).
pub type RunId = String;

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("invalid config: {0}")]
    Stops(#[from] StopPolicyError),
}

/// Where instrument series come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// One `{SYMBOL}.csv` file per instrument under `data.dir`.
    #[default]
    Csv,
    /// Deterministic random walks; no files needed.
    Synthetic,
}

/// Complete configuration for one backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BacktestConfig {
    pub backtest: BacktestSection,
    pub data: DataSection,
    #[serde(default)]
    pub strategy: StrategySection,
    #[serde(default)]
    pub stops: StopPolicy,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BacktestSection {
    /// Market-wide filter instrument.
    #[serde(default = "default_benchmark")]
    pub benchmark: String,

    /// Number of days simulated back from the last loaded day.
    #[serde(default = "default_days")]
    pub days: usize,

    /// Also trade the benchmark as an instrument.
    #[serde(default = "default_true")]
    pub trade_benchmark: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataSection {
    #[serde(default)]
    pub source: DataSource,

    /// Directory holding the per-symbol CSV files.
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,

    /// Universe file (first column holds the symbol) or inline list.
    pub universe: UniverseSpec,

    pub start: NaiveDate,
    pub end: NaiveDate,

    /// Seed for `source = "synthetic"`; matches `dualtrend generate --seed`.
    #[serde(default)]
    pub seed: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrategySection {
    pub benchmark: BenchmarkTrend,
    pub instrument: InstrumentTrend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    /// Directory for trade logs and result artifacts.
    pub dir: PathBuf,
    pub long_log: String,
    pub short_log: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("results"),
            long_log: "BacktestLog_long.txt".into(),
            short_log: "BacktestLog_short.txt".into(),
        }
    }
}

fn default_benchmark() -> String {
    "SPY".into()
}

fn default_days() -> usize {
    200
}

fn default_true() -> bool {
    true
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl BacktestConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check every constraint the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backtest.benchmark.trim().is_empty() {
            return Err(ConfigError::Invalid("backtest.benchmark is empty".into()));
        }
        if self.backtest.days == 0 {
            return Err(ConfigError::Invalid("backtest.days must be > 0".into()));
        }
        if self.data.start >= self.data.end {
            return Err(ConfigError::Invalid(format!(
                "data.start ({}) must be before data.end ({})",
                self.data.start, self.data.end
            )));
        }

        let b = &self.strategy.benchmark;
        check_windows("strategy.benchmark", b.lookback, b.fast_span, b.slow_span)?;
        let i = &self.strategy.instrument;
        check_windows("strategy.instrument", i.lookback, i.fast_span, i.slow_span)?;

        self.stops.validate()?;

        if self.output.long_log == self.output.short_log {
            return Err(ConfigError::Invalid(
                "output.long_log and output.short_log must differ".into(),
            ));
        }
        Ok(())
    }

    /// Rule and stop parameters handed to the engine.
    pub fn strategy_params(&self) -> StrategyParams {
        StrategyParams {
            benchmark: self.strategy.benchmark,
            instrument: self.strategy.instrument,
            stops: self.stops,
        }
    }

    /// Deterministic hash of the full configuration.
    ///
    /// Two runs with identical configs share a RunId.
    pub fn run_id(&self) -> Result<RunId, ConfigError> {
        let json = serde_json::to_string(self)
            .map_err(|e| ConfigError::Invalid(format!("config is not serializable: {e}")))?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }
}

fn check_windows(
    section: &str,
    lookback: usize,
    fast_span: usize,
    slow_span: usize,
) -> Result<(), ConfigError> {
    if lookback == 0 || fast_span == 0 || slow_span == 0 {
        return Err(ConfigError::Invalid(format!(
            "{section}: lookback, fast_span and slow_span must be >= 1"
        )));
    }
    if fast_span >= slow_span {
        return Err(ConfigError::Invalid(format!(
            "{section}: fast_span ({fast_span}) must be < slow_span ({slow_span})"
        )));
    }
    Ok(())
}
