//! Simulation engine — the day-by-day loop over the aligned calendar.
//!
//! For each simulated day, in chronological order:
//! 1. Write the date header to the trade logs
//! 2. Look up the benchmark signal (computed once per day)
//! 3. Step every instrument through the position book
//! 4. Fold closes into the cumulative realized counters and survivors into
//!    the day's unrealized buckets
//! 5. Append the day's snapshot to the result series
//!
//! Signals are precomputed for the whole window before the loop. Days cannot
//! be reordered: stops carry over from one day to the next.

pub mod result;

pub use result::{DailySnapshot, ResultSeries, RunResult, RunSummary};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::book::{DayContext, PositionBook, StopPolicy, Transition};
use crate::data::{InstrumentSeries, SeriesStore};
use crate::domain::Direction;
use crate::log::TradeLogSink;
use crate::signal::{
    precompute_signals, precompute_universe, BenchmarkTrend, InstrumentTrend, SignalRule,
};

/// Errors from a simulation run.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(
        "insufficient history: simulating {days} days back from the last of {len} days \
         needs a start index >= {warmup}"
    )]
    InsufficientHistory {
        days: usize,
        len: usize,
        warmup: usize,
    },

    #[error("instrument '{symbol}' is in the universe but has no series in the store")]
    UnknownInstrument { symbol: String },

    #[error("instrument '{symbol}' appears more than once in the universe")]
    DuplicateInstrument { symbol: String },

    #[error("trade log write failed: {0}")]
    Log(#[from] std::io::Error),
}

/// Rule and stop parameters for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyParams {
    pub benchmark: BenchmarkTrend,
    pub instrument: InstrumentTrend,
    pub stops: StopPolicy,
}

impl StrategyParams {
    /// Smallest day index at which both rules can be evaluated.
    pub fn warmup(&self) -> usize {
        self.benchmark.warmup().max(self.instrument.warmup())
    }
}

/// Owns the position book and PnL counters for one universe.
///
/// Every `run` starts from an empty book and zero counters, and the final
/// simulated day liquidates everything, so nothing carries between runs.
#[derive(Debug)]
pub struct SimulationEngine<'a> {
    store: &'a SeriesStore,
    universe: Vec<&'a InstrumentSeries>,
    params: StrategyParams,
    book: PositionBook,
    long_realized: f64,
    short_realized: f64,
    long_trades: usize,
    short_trades: usize,
}

impl<'a> SimulationEngine<'a> {
    /// Bind the engine to a store and the instruments it trades.
    ///
    /// Every symbol must have a series in the store; a missing one means the
    /// caller built an inconsistent universe, and is reported rather than
    /// skipped.
    pub fn new<S: AsRef<str>>(
        store: &'a SeriesStore,
        universe: &[S],
        params: StrategyParams,
    ) -> Result<Self, EngineError> {
        let mut resolved: Vec<&'a InstrumentSeries> = Vec::with_capacity(universe.len());
        for symbol in universe {
            let symbol = symbol.as_ref();
            let series = store
                .get(symbol)
                .ok_or_else(|| EngineError::UnknownInstrument {
                    symbol: symbol.to_string(),
                })?;
            if resolved.iter().any(|s| s.symbol == symbol) {
                return Err(EngineError::DuplicateInstrument {
                    symbol: symbol.to_string(),
                });
            }
            resolved.push(series);
        }

        Ok(Self {
            store,
            universe: resolved,
            params,
            book: PositionBook::new(params.stops),
            long_realized: 0.0,
            short_realized: 0.0,
            long_trades: 0,
            short_trades: 0,
        })
    }

    pub fn params(&self) -> &StrategyParams {
        &self.params
    }

    pub fn book(&self) -> &PositionBook {
        &self.book
    }

    /// Symbols traded, in processing order.
    pub fn universe(&self) -> impl Iterator<Item = &str> {
        self.universe.iter().map(|s| s.symbol.as_str())
    }

    /// Clear the book, the realized counters and the trade counts.
    pub fn reset(&mut self) {
        self.book = PositionBook::new(self.params.stops);
        self.long_realized = 0.0;
        self.short_realized = 0.0;
        self.long_trades = 0;
        self.short_trades = 0;
    }

    /// First simulated day for a `days`-day run, or `InsufficientHistory`.
    pub fn start_index(&self, days: usize) -> Result<usize, EngineError> {
        let warmup = self.params.warmup();
        self.store
            .last_index()
            .and_then(|last| last.checked_sub(days))
            .filter(|&start| start >= warmup)
            .ok_or(EngineError::InsufficientHistory {
                days,
                len: self.store.len(),
                warmup,
            })
    }

    /// Simulate `last_index - days ..= last_index`.
    ///
    /// Resets the engine first. On error nothing is returned; a later run
    /// starts clean again.
    pub fn run(
        &mut self,
        days: usize,
        log: &mut dyn TradeLogSink,
    ) -> Result<RunResult, EngineError> {
        let start = self.start_index(days)?;
        let last = start + days;
        self.reset();

        info!(
            start_date = %self.store.dates()[start],
            end_date = %self.store.dates()[last],
            instruments = self.universe.len(),
            "starting simulation"
        );

        // ─── Precompute signals for the whole window ───
        let benchmark_signals = precompute_signals(
            &self.params.benchmark,
            &self.store.benchmark().bars,
            start..=last,
        );
        let instrument_signals =
            precompute_universe(&self.params.instrument, &self.universe, start..=last);

        let universe = self.universe.clone();
        let mut series = ResultSeries::with_capacity(days + 1);

        // ─── Day loop ───
        for k in start..=last {
            let offset = k - start;
            let day = DayContext {
                index: k,
                date: self.store.dates()[k],
                is_final_day: k == last,
                benchmark_signal: benchmark_signals[offset],
            };
            log.begin_day(day.date)?;

            let mut long_unrealized = 0.0;
            let mut short_unrealized = 0.0;

            for (instrument, signals) in universe.iter().zip(&instrument_signals) {
                let price = instrument.bars[k].close;
                let transition = self
                    .book
                    .step(&instrument.symbol, price, &day, signals[offset]);

                match transition.unrealized {
                    Some((Direction::Long, pnl)) => long_unrealized += pnl,
                    Some((Direction::Short, pnl)) => short_unrealized += pnl,
                    None => {}
                }
                self.book_transition(&transition, log)?;
            }

            series.push(DailySnapshot {
                date: day.date,
                long_realized: self.long_realized,
                short_realized: self.short_realized,
                long_unrealized,
                short_unrealized,
            });
        }

        log.finish()?;
        debug_assert!(self.book.is_empty(), "final day must liquidate the book");

        let result = RunResult {
            series,
            long_trades: self.long_trades,
            short_trades: self.short_trades,
            start_index: start,
        };
        let summary = result.summary();
        info!(
            long_trades = summary.long_trades,
            short_trades = summary.short_trades,
            realized = summary.realized_total,
            "simulation complete"
        );
        Ok(result)
    }

    /// Fold a transition into the counters and write its events.
    fn book_transition(
        &mut self,
        transition: &Transition,
        log: &mut dyn TradeLogSink,
    ) -> Result<(), EngineError> {
        match transition.realized() {
            Some((Direction::Long, pnl)) => self.long_realized += pnl,
            Some((Direction::Short, pnl)) => self.short_realized += pnl,
            None => {}
        }
        if let Some(opened) = &transition.opened {
            match opened.direction {
                Direction::Long => self.long_trades += 1,
                Direction::Short => self.short_trades += 1,
            }
        }
        for event in transition.events() {
            debug!(date = %event.date, symbol = %event.symbol, "{event}");
            log.record(event)?;
        }
        Ok(())
    }
}
