//! Data provider trait and structured error types.
//!
//! The HistoricalDataProvider trait abstracts over data sources (CSV files,
//! synthetic generators, remote vendors) so the runner can swap
//! implementations and mock them in tests. The engine never calls a provider
//! directly; it only sees the `SeriesStore` built from provider output.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::DailyBar;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("I/O error for {symbol}: {source}")]
    Io {
        symbol: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error for {symbol}: {reason}")]
    Parse { symbol: String, reason: String },

    #[error("validation error for {symbol}: {reason}")]
    Validation { symbol: String, reason: String },

    #[error("data error: {0}")]
    Other(String),
}

/// Trait for historical data providers.
///
/// Implementations return daily bars in ascending date order, restricted to
/// `start ..= end`.
pub trait HistoricalDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily close/volume bars for a symbol over a date range.
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyBar>, DataError>;
}

/// Check the ordering and price sanity that every provider promises.
pub fn validate_bars(symbol: &str, bars: &[DailyBar]) -> Result<(), DataError> {
    if let Some(bad) = bars.iter().find(|b| !b.is_valid()) {
        return Err(DataError::Validation {
            symbol: symbol.to_string(),
            reason: format!("invalid close {} on {}", bad.close, bad.date),
        });
    }
    if let Some(w) = bars.windows(2).find(|w| w[1].date <= w[0].date) {
        return Err(DataError::Validation {
            symbol: symbol.to_string(),
            reason: format!("dates not ascending at {} -> {}", w[0].date, w[1].date),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: &str, close: f64) -> DailyBar {
        DailyBar::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            close,
            100,
        )
    }

    #[test]
    fn accepts_ascending_positive_bars() {
        let bars = vec![bar("2017-01-03", 10.0), bar("2017-01-04", 11.0)];
        assert!(validate_bars("X", &bars).is_ok());
    }

    #[test]
    fn rejects_out_of_order_dates() {
        let bars = vec![bar("2017-01-04", 10.0), bar("2017-01-03", 11.0)];
        let err = validate_bars("X", &bars).unwrap_err();
        assert!(matches!(err, DataError::Validation { .. }));
    }

    #[test]
    fn rejects_non_positive_close() {
        let bars = vec![bar("2017-01-03", 10.0), bar("2017-01-04", 0.0)];
        let err = validate_bars("X", &bars).unwrap_err();
        assert!(err.to_string().contains("invalid close"));
    }
}
