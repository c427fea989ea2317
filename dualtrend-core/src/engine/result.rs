//! Result series — the per-day PnL accumulation produced by a run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// PnL figures for one simulated day.
///
/// Realized figures are cumulative over the run (closed trades so far,
/// today's closes included). Unrealized figures cover positions that
/// survived today.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailySnapshot {
    pub date: NaiveDate,
    pub long_realized: f64,
    pub short_realized: f64,
    pub long_unrealized: f64,
    pub short_unrealized: f64,
}

impl DailySnapshot {
    pub fn total_realized(&self) -> f64 {
        self.long_realized + self.short_realized
    }

    pub fn total_unrealized(&self) -> f64 {
        self.long_unrealized + self.short_unrealized
    }

    pub fn total_pnl(&self) -> f64 {
        self.total_unrealized() + self.total_realized()
    }
}

/// Seven parallel PnL series plus their dates. Index `i` of every vector is
/// the same simulated day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSeries {
    pub dates: Vec<NaiveDate>,
    pub long_realized: Vec<f64>,
    pub short_realized: Vec<f64>,
    pub total_realized: Vec<f64>,
    pub long_unrealized: Vec<f64>,
    pub short_unrealized: Vec<f64>,
    pub total_unrealized: Vec<f64>,
    pub total_pnl: Vec<f64>,
}

impl ResultSeries {
    pub fn with_capacity(days: usize) -> Self {
        Self {
            dates: Vec::with_capacity(days),
            long_realized: Vec::with_capacity(days),
            short_realized: Vec::with_capacity(days),
            total_realized: Vec::with_capacity(days),
            long_unrealized: Vec::with_capacity(days),
            short_unrealized: Vec::with_capacity(days),
            total_unrealized: Vec::with_capacity(days),
            total_pnl: Vec::with_capacity(days),
        }
    }

    /// Append one day to every series.
    pub fn push(&mut self, snapshot: DailySnapshot) {
        let total_realized = snapshot.total_realized();
        let total_unrealized = snapshot.total_unrealized();
        self.dates.push(snapshot.date);
        self.long_realized.push(snapshot.long_realized);
        self.short_realized.push(snapshot.short_realized);
        self.total_realized.push(total_realized);
        self.long_unrealized.push(snapshot.long_unrealized);
        self.short_unrealized.push(snapshot.short_unrealized);
        self.total_unrealized.push(total_unrealized);
        self.total_pnl.push(total_unrealized + total_realized);
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// First series whose length differs from `dates`, if any.
    ///
    /// Always `None` for a series built with `push`. Deserialized series
    /// should be checked before indexing.
    pub fn misaligned_series(&self) -> Option<&'static str> {
        let n = self.dates.len();
        [
            ("long_realized", self.long_realized.len()),
            ("short_realized", self.short_realized.len()),
            ("total_realized", self.total_realized.len()),
            ("long_unrealized", self.long_unrealized.len()),
            ("short_unrealized", self.short_unrealized.len()),
            ("total_unrealized", self.total_unrealized.len()),
            ("total_pnl", self.total_pnl.len()),
        ]
        .into_iter()
        .find(|&(_, len)| len != n)
        .map(|(name, _)| name)
    }

    /// Rebuild the snapshot for day `i`.
    pub fn snapshot(&self, i: usize) -> Option<DailySnapshot> {
        Some(DailySnapshot {
            date: *self.dates.get(i)?,
            long_realized: *self.long_realized.get(i)?,
            short_realized: *self.short_realized.get(i)?,
            long_unrealized: *self.long_unrealized.get(i)?,
            short_unrealized: *self.short_unrealized.get(i)?,
        })
    }

    pub fn last(&self) -> Option<DailySnapshot> {
        self.len().checked_sub(1).and_then(|i| self.snapshot(i))
    }
}

/// Output of `SimulationEngine::run`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub series: ResultSeries,
    pub long_trades: usize,
    pub short_trades: usize,
    /// First simulated day index.
    pub start_index: usize,
}

impl RunResult {
    pub fn summary(&self) -> RunSummary {
        RunSummary::compute(self)
    }
}

/// Headline figures of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub days: usize,
    pub long_trades: usize,
    pub short_trades: usize,
    pub realized_long: f64,
    pub realized_short: f64,
    pub realized_total: f64,
    pub final_total_pnl: f64,
    /// Highest total PnL reached, never below zero.
    pub peak_total_pnl: f64,
    /// Largest fall of total PnL from a prior peak (zero baseline included).
    pub max_drawdown: f64,
}

impl RunSummary {
    pub fn compute(result: &RunResult) -> Self {
        let series = &result.series;
        let last = series.last();

        let mut peak = 0.0_f64;
        let mut max_drawdown = 0.0_f64;
        for &pnl in &series.total_pnl {
            peak = peak.max(pnl);
            max_drawdown = max_drawdown.max(peak - pnl);
        }

        Self {
            days: series.len(),
            long_trades: result.long_trades,
            short_trades: result.short_trades,
            realized_long: last.map_or(0.0, |s| s.long_realized),
            realized_short: last.map_or(0.0, |s| s.short_realized),
            realized_total: last.map_or(0.0, |s| s.total_realized()),
            final_total_pnl: last.map_or(0.0, |s| s.total_pnl()),
            peak_total_pnl: peak,
            max_drawdown,
        }
    }
}
