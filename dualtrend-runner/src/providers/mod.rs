//! Data providers: per-symbol CSV files and a synthetic generator.

pub mod csv_files;
pub mod synthetic;

pub use csv_files::{write_series_csv, CsvProvider};
pub use synthetic::SyntheticProvider;

use dualtrend_core::HistoricalDataProvider;

use crate::config::{DataSection, DataSource};

/// Build the provider a config asks for.
pub fn provider_for(data: &DataSection) -> Box<dyn HistoricalDataProvider> {
    match data.source {
        DataSource::Csv => Box::new(CsvProvider::new(&data.dir)),
        DataSource::Synthetic => Box::new(SyntheticProvider::new(data.seed)),
    }
}
