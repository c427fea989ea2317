//! In-memory store of aligned daily series, keyed by symbol.
//!
//! Every series shares the benchmark's date index: same length, same dates.
//! Alignment is checked on insert; providers are expected to drop misaligned
//! instruments before they get here, so a rejection is reported back to the
//! loader rather than papered over.

use chrono::NaiveDate;
use std::collections::HashMap;
use thiserror::Error;

use crate::domain::DailyBar;

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("series for '{symbol}' has {actual} bars, benchmark has {expected}")]
    LengthMismatch {
        symbol: String,
        expected: usize,
        actual: usize,
    },

    #[error("series for '{symbol}' diverges from the benchmark calendar at index {index}")]
    CalendarMismatch { symbol: String, index: usize },

    #[error("duplicate series for '{symbol}'")]
    Duplicate { symbol: String },
}

/// One instrument's daily bars.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentSeries {
    pub symbol: String,
    pub bars: Vec<DailyBar>,
}

impl InstrumentSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<DailyBar>) -> Self {
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.bars.iter().map(|b| b.date)
    }
}

/// Aligned series for the benchmark and the instrument universe.
#[derive(Debug, Clone)]
pub struct SeriesStore {
    benchmark: String,
    dates: Vec<NaiveDate>,
    series: Vec<InstrumentSeries>,
    index: HashMap<String, usize>,
}

impl SeriesStore {
    /// Create a store whose calendar is the benchmark's.
    pub fn new(benchmark: InstrumentSeries) -> Self {
        let dates = benchmark.dates().collect();
        let mut index = HashMap::new();
        index.insert(benchmark.symbol.clone(), 0);
        Self {
            benchmark: benchmark.symbol.clone(),
            dates,
            series: vec![benchmark],
            index,
        }
    }

    /// Check a series against the benchmark calendar without inserting it.
    pub fn check_alignment(&self, series: &InstrumentSeries) -> Result<(), StoreError> {
        if series.len() != self.dates.len() {
            return Err(StoreError::LengthMismatch {
                symbol: series.symbol.clone(),
                expected: self.dates.len(),
                actual: series.len(),
            });
        }
        if let Some(index) = series
            .dates()
            .zip(self.dates.iter())
            .position(|(a, b)| a != *b)
        {
            return Err(StoreError::CalendarMismatch {
                symbol: series.symbol.clone(),
                index,
            });
        }
        Ok(())
    }

    /// Add an instrument series. Rejects duplicates and misaligned series.
    pub fn insert(&mut self, series: InstrumentSeries) -> Result<(), StoreError> {
        if self.index.contains_key(&series.symbol) {
            return Err(StoreError::Duplicate {
                symbol: series.symbol,
            });
        }
        self.check_alignment(&series)?;
        self.index.insert(series.symbol.clone(), self.series.len());
        self.series.push(series);
        Ok(())
    }

    pub fn benchmark_symbol(&self) -> &str {
        &self.benchmark
    }

    pub fn benchmark(&self) -> &InstrumentSeries {
        &self.series[0]
    }

    pub fn get(&self, symbol: &str) -> Option<&InstrumentSeries> {
        self.index.get(symbol).map(|&i| &self.series[i])
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.index.contains_key(symbol)
    }

    /// All symbols in insertion order, benchmark first.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.symbol.as_str())
    }

    /// The shared calendar.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of days in the calendar.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Index of the last day, `None` for an empty calendar.
    pub fn last_index(&self) -> Option<usize> {
        self.dates.len().checked_sub(1)
    }

    /// Number of series held, benchmark included.
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InstrumentSeries> {
        self.series.iter()
    }
}
