//! Series acquisition for the runner.
//!
//! Fetches the benchmark first, then every universe symbol, and builds a
//! `SeriesStore` on the benchmark's calendar. The benchmark is required; an
//! instrument that fails to fetch or does not line up with the benchmark is
//! dropped and counted, and the run goes on without it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use dualtrend_core::{DataError, HistoricalDataProvider, InstrumentSeries, SeriesStore};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to load benchmark '{symbol}': {source}")]
    Benchmark {
        symbol: String,
        #[source]
        source: DataError,
    },

    #[error("benchmark '{symbol}' has no bars between {start} and {end}")]
    EmptyBenchmark {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },
}

/// What happened to the requested universe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Universe symbols asked for, benchmark excluded.
    pub requested: usize,
    /// Instruments that made it into the store.
    pub fetched: usize,
    /// Instruments dropped because the provider failed.
    pub dropped_errors: usize,
    /// Instruments dropped because their dates differ from the benchmark's.
    pub dropped_misaligned: usize,
}

/// Result of loading series.
#[derive(Debug)]
pub struct LoadedData {
    pub store: SeriesStore,
    /// Instruments in the store, in universe order, benchmark excluded.
    pub universe: Vec<String>,
    pub report: LoadReport,
    /// BLAKE3 over every loaded bar, in store order.
    pub dataset_hash: String,
}

/// Load the benchmark and the universe from `provider`.
pub fn load_series(
    provider: &dyn HistoricalDataProvider,
    benchmark: &str,
    universe: &[String],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<LoadedData, LoadError> {
    info!(
        provider = provider.name(),
        benchmark,
        instruments = universe.len(),
        %start,
        %end,
        "fetching data"
    );

    let benchmark_bars =
        provider
            .fetch(benchmark, start, end)
            .map_err(|source| LoadError::Benchmark {
                symbol: benchmark.to_string(),
                source,
            })?;
    if benchmark_bars.is_empty() {
        return Err(LoadError::EmptyBenchmark {
            symbol: benchmark.to_string(),
            start,
            end,
        });
    }

    let mut store = SeriesStore::new(InstrumentSeries::new(benchmark, benchmark_bars));
    let mut loaded = Vec::new();
    let mut report = LoadReport::default();

    for symbol in universe.iter().filter(|s| s.as_str() != benchmark) {
        report.requested += 1;
        let bars = match provider.fetch(symbol, start, end) {
            Ok(bars) => bars,
            Err(e) => {
                warn!(%symbol, error = %e, "dropping instrument");
                report.dropped_errors += 1;
                continue;
            }
        };

        match store.insert(InstrumentSeries::new(symbol.clone(), bars)) {
            Ok(()) => {
                loaded.push(symbol.clone());
                report.fetched += 1;
            }
            Err(e) => {
                warn!(%symbol, error = %e, "dropping instrument");
                report.dropped_misaligned += 1;
            }
        }
    }

    info!(
        fetched = report.fetched,
        dropped_errors = report.dropped_errors,
        dropped_misaligned = report.dropped_misaligned,
        days = store.len(),
        "data loaded"
    );

    let dataset_hash = compute_dataset_hash(&store);
    Ok(LoadedData {
        store,
        universe: loaded,
        report,
        dataset_hash,
    })
}

/// Deterministic BLAKE3 hash over all bar data in store order.
fn compute_dataset_hash(store: &SeriesStore) -> String {
    let mut hasher = blake3::Hasher::new();
    for series in store.iter() {
        hasher.update(series.symbol.as_bytes());
        for bar in &series.bars {
            hasher.update(bar.date.to_string().as_bytes());
            hasher.update(&bar.close.to_le_bytes());
            hasher.update(&bar.volume.to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}
