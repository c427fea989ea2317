//! Signal precomputation over the simulated window.
//!
//! Signals depend only on bar history, so they are computed once before the
//! day loop. Instruments are independent of each other and are fanned out
//! across the rayon pool; each output vector is indexed by
//! `day - range.start()`.

use rayon::prelude::*;
use std::ops::RangeInclusive;

use super::SignalRule;
use crate::data::InstrumentSeries;
use crate::domain::{DailyBar, Signal};

/// Evaluate `rule` for every day in `range`.
pub fn precompute_signals(
    rule: &dyn SignalRule,
    bars: &[DailyBar],
    range: RangeInclusive<usize>,
) -> Vec<Signal> {
    range.map(|k| rule.evaluate(bars, k)).collect()
}

/// Evaluate `rule` for every instrument, in the order given.
pub fn precompute_universe(
    rule: &dyn SignalRule,
    universe: &[&InstrumentSeries],
    range: RangeInclusive<usize>,
) -> Vec<Vec<Signal>> {
    universe
        .par_iter()
        .map(|series| precompute_signals(rule, &series.bars, range.clone()))
        .collect()
}
