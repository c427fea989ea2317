//! One-day momentum: close-to-close change and its typical magnitude.
//!
//! change[j] = close[j] - close[j-1]
//! The magnitude window covers change[k - lookback ..= k], i.e. `lookback + 1`
//! changes spanning `lookback + 2` closes.

use crate::domain::DailyBar;

/// Today's one-day change and the mean absolute change over the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumStats {
    /// close[k] - close[k-1]
    pub today: f64,
    /// Mean of |change| over the window, today included.
    pub mean_abs: f64,
}

impl MomentumStats {
    /// Today's move is larger than the typical move over the window.
    pub fn is_outsized(&self) -> bool {
        self.today.abs() > self.mean_abs
    }
}

/// Momentum statistics for day `k` over a `lookback`-day window.
pub fn momentum_stats(bars: &[DailyBar], k: usize, lookback: usize) -> Option<MomentumStats> {
    if k >= bars.len() || k < lookback + 1 {
        return None;
    }
    let sum_abs: f64 = bars[k - lookback - 1..=k]
        .windows(2)
        .map(|w| (w[1].close - w[0].close).abs())
        .sum();
    Some(MomentumStats {
        today: bars[k].close - bars[k - 1].close,
        mean_abs: sum_abs / (lookback + 1) as f64,
    })
}
