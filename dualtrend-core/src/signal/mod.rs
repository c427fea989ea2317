//! Signal rules — turn a trailing window of closes and volumes into BUY/SELL/NONE.
//!
//! Both rules share the same momentum/volume gate: today's one-day move must
//! be larger than the typical move over the lookback window, and today's
//! volume must exceed the window's mean volume. The move's sign gives the
//! bias. Each rule then adds its own trend filter on moving averages.
//!
//! Rules are portfolio-agnostic: they see only bar history, never the
//! position book.

pub mod benchmark;
pub mod instrument;
pub mod precompute;

pub use benchmark::BenchmarkTrend;
pub use instrument::InstrumentTrend;
pub use precompute::{precompute_signals, precompute_universe};

use crate::domain::{DailyBar, Signal};
use crate::indicators::{momentum_stats, trailing_mean_volume};

/// Trait for signal rules.
///
/// # Look-ahead guard
/// `evaluate` must only read `bars[..=k]`.
pub trait SignalRule: Send + Sync {
    /// Human-readable name (e.g., "benchmark_trend").
    fn name(&self) -> &str;

    /// Smallest day index the rule can be evaluated at.
    fn warmup(&self) -> usize;

    /// Evaluate the rule at day `k`.
    ///
    /// Returns `Signal::None` when `k` is inside the warmup or past the end of
    /// `bars`.
    fn evaluate(&self, bars: &[DailyBar], k: usize) -> Signal;
}

/// Momentum/volume gate shared by both rules.
///
/// `Buy` for an outsized up-move on elevated volume, `Sell` for an outsized
/// down-move on elevated volume, `None` otherwise or when history is short.
pub(crate) fn momentum_volume_bias(bars: &[DailyBar], k: usize, lookback: usize) -> Signal {
    let Some(momentum) = momentum_stats(bars, k, lookback) else {
        return Signal::None;
    };
    let Some(mean_volume) = trailing_mean_volume(bars, k, lookback) else {
        return Signal::None;
    };

    let elevated_volume = bars[k].volume as f64 > mean_volume;
    if !momentum.is_outsized() || !elevated_volume {
        return Signal::None;
    }

    if momentum.today < 0.0 {
        Signal::Sell
    } else if momentum.today > 0.0 {
        Signal::Buy
    } else {
        Signal::None
    }
}

/// Bars shaped to trip the momentum/volume gate on the last day.
///
/// `len - 1` flat days at 100.0 with volume 1000, then one day at
/// `100.0 + jump` with volume 5000.
#[cfg(test)]
pub(crate) fn spike_bars(len: usize, jump: f64) -> Vec<DailyBar> {
    let mut closes = vec![100.0; len];
    closes[len - 1] = 100.0 + jump;
    let mut bars = crate::indicators::make_bars(&closes);
    bars[len - 1].volume = 5000;
    bars
}
