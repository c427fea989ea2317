//! Historical series store and the data-provider boundary.

pub mod provider;
pub mod store;

pub use provider::{DataError, HistoricalDataProvider};
pub use store::{InstrumentSeries, SeriesStore, StoreError};
