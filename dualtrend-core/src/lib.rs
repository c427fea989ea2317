//! DualTrend Core — domain types, signal rules, position book, simulation engine.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (daily bars, signals, directions, trade events)
//! - Trailing-window indicators (moving averages, momentum, volume)
//! - Benchmark and per-instrument signal rules
//! - Position book state machine with ratcheting stops
//! - Day-by-day simulation engine producing the PnL result series
//! - Historical series store and the data-provider boundary
//! - Trade log sinks

pub mod book;
pub mod data;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod log;
pub mod signal;

pub use book::{DayContext, Position, PositionBook, StopPolicy, StopPolicyError, Transition};
pub use data::{DataError, HistoricalDataProvider, InstrumentSeries, SeriesStore, StoreError};
pub use domain::{CloseReason, DailyBar, Direction, Signal, TradeEvent, TradeEventKind};
pub use engine::{
    DailySnapshot, EngineError, ResultSeries, RunResult, RunSummary, SimulationEngine,
    StrategyParams,
};
pub use log::{NullTradeLog, RecordingTradeLog, TextTradeLog, TradeLogSink};
pub use signal::{BenchmarkTrend, InstrumentTrend, SignalRule};
