//! CSV series files: one `{SYMBOL}.csv` per instrument.
//!
//! Header `date,close,volume`; capitalised `Date,Close,Volume` (as in vendor
//! downloads) is accepted and any extra columns are ignored. Dates are
//! `YYYY-MM-DD`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use dualtrend_core::data::provider::validate_bars;
use dualtrend_core::{DailyBar, DataError, HistoricalDataProvider};

#[derive(Debug, Serialize, Deserialize)]
struct SeriesRow {
    #[serde(alias = "Date")]
    date: NaiveDate,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(alias = "Volume")]
    volume: u64,
}

/// Reads series from a directory of CSV files.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }
}

impl HistoricalDataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyBar>, DataError> {
        let path = self.path_for(symbol);
        let file = std::fs::File::open(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                }
            } else {
                DataError::Io {
                    symbol: symbol.to_string(),
                    source,
                }
            }
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(file);
        let mut bars = Vec::new();
        for (line, row) in rdr.deserialize::<SeriesRow>().enumerate() {
            let row = row.map_err(|e| DataError::Parse {
                symbol: symbol.to_string(),
                reason: format!("row {}: {e}", line + 1),
            })?;
            if row.date >= start && row.date <= end {
                bars.push(DailyBar::new(row.date, row.close, row.volume));
            }
        }

        validate_bars(symbol, &bars)?;
        Ok(bars)
    }
}

/// Write bars in the format `CsvProvider` reads.
pub fn write_series_csv(path: &Path, bars: &[DailyBar]) -> anyhow::Result<()> {
    use anyhow::Context;

    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for bar in bars {
        wtr.serialize(SeriesRow {
            date: bar.date,
            close: bar.close,
            volume: bar.volume,
        })?;
    }
    wtr.flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    Ok(())
}
