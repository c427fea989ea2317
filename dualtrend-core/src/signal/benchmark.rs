//! Benchmark trend rule — the market-wide filter evaluated on the index fund.
//!
//! SELL when all hold:
//! - today's move is down and larger than the mean absolute move
//! - today's volume is above the mean volume
//! - the fast average fell since yesterday
//! - the fast average is below the slow average
//!
//! BUY is the mirror image.

use serde::{Deserialize, Serialize};

use super::{momentum_volume_bias, SignalRule};
use crate::domain::{DailyBar, Signal};
use crate::indicators::trailing_mean_close;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkTrend {
    /// Momentum and volume window length in days.
    pub lookback: usize,
    /// Fast average span; the window is `close[k - fast_span ..= k]`.
    pub fast_span: usize,
    /// Slow average span.
    pub slow_span: usize,
}

impl BenchmarkTrend {
    pub fn new(lookback: usize, fast_span: usize, slow_span: usize) -> Self {
        assert!(lookback >= 1, "lookback must be >= 1");
        assert!(fast_span >= 1, "fast_span must be >= 1");
        assert!(slow_span > fast_span, "slow_span must be > fast_span");
        Self {
            lookback,
            fast_span,
            slow_span,
        }
    }

    fn trend(&self, bars: &[DailyBar], k: usize) -> Option<Signal> {
        let fast = trailing_mean_close(bars, k, self.fast_span)?;
        let fast_prev = trailing_mean_close(bars, k.checked_sub(1)?, self.fast_span)?;
        let slow = trailing_mean_close(bars, k, self.slow_span)?;
        let fast_delta = fast - fast_prev;

        let signal = if fast_delta < 0.0 && fast < slow {
            Signal::Sell
        } else if fast_delta > 0.0 && fast > slow {
            Signal::Buy
        } else {
            Signal::None
        };
        Some(signal)
    }
}

impl Default for BenchmarkTrend {
    fn default() -> Self {
        Self {
            lookback: 50,
            fast_span: 10,
            slow_span: 50,
        }
    }
}

impl SignalRule for BenchmarkTrend {
    fn name(&self) -> &str {
        "benchmark_trend"
    }

    fn warmup(&self) -> usize {
        (self.lookback + 1)
            .max(self.fast_span + 1)
            .max(self.slow_span)
    }

    fn evaluate(&self, bars: &[DailyBar], k: usize) -> Signal {
        if k < self.warmup() || k >= bars.len() {
            return Signal::None;
        }
        let bias = momentum_volume_bias(bars, k, self.lookback);
        if bias == Signal::None {
            return Signal::None;
        }
        match self.trend(bars, k) {
            Some(trend) if trend == bias => bias,
            _ => Signal::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::spike_bars;

    #[test]
    fn default_warmup_is_51() {
        assert_eq!(BenchmarkTrend::default().warmup(), 51);
    }

    #[test]
    fn buy_on_up_spike_after_flat_history() {
        let bars = spike_bars(52, 1.0);
        assert_eq!(BenchmarkTrend::default().evaluate(&bars, 51), Signal::Buy);
    }

    #[test]
    fn sell_on_down_spike_after_flat_history() {
        let bars = spike_bars(52, -1.0);
        assert_eq!(BenchmarkTrend::default().evaluate(&bars, 51), Signal::Sell);
    }

    #[test]
    fn up_spike_below_slow_average_is_none() {
        // Decline for 45 days, then a rally: fast average still below slow.
        let mut closes: Vec<f64> = (0..51).map(|i| 200.0 - i as f64).collect();
        closes.push(160.0);
        let mut bars = crate::indicators::make_bars(&closes);
        bars[51].volume = 5000;
        let rule = BenchmarkTrend::default();
        assert_eq!(momentum_volume_bias(&bars, 51, 50), Signal::Buy);
        assert_eq!(rule.evaluate(&bars, 51), Signal::None);
    }

    #[test]
    fn inside_warmup_is_none() {
        let bars = spike_bars(51, 1.0);
        assert_eq!(BenchmarkTrend::default().evaluate(&bars, 50), Signal::None);
    }

    #[test]
    fn out_of_range_is_none() {
        let bars = spike_bars(52, 1.0);
        assert_eq!(BenchmarkTrend::default().evaluate(&bars, 52), Signal::None);
    }

    #[test]
    #[should_panic(expected = "slow_span must be > fast_span")]
    fn rejects_inverted_spans() {
        BenchmarkTrend::new(50, 20, 10);
    }
}
