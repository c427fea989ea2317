//! Per-instrument trend rule.
//!
//! Same momentum/volume gate as the benchmark rule, with a plain fast-vs-slow
//! average comparison as the trend filter (no slope term).

use serde::{Deserialize, Serialize};

use super::{momentum_volume_bias, SignalRule};
use crate::domain::{DailyBar, Signal};
use crate::indicators::trailing_mean_close;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstrumentTrend {
    pub lookback: usize,
    pub fast_span: usize,
    pub slow_span: usize,
}

impl InstrumentTrend {
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
}

impl Default for InstrumentTrend {
    fn default() -> Self {
        Self {
            lookback: 50,
            fast_span: 5,
            slow_span: 20,
        }
    }
}

impl SignalRule for InstrumentTrend {
    fn name(&self) -> &str {
        "instrument_trend"
    }

    fn warmup(&self) -> usize {
        (self.lookback + 1).max(self.slow_span)
    }

    fn evaluate(&self, bars: &[DailyBar], k: usize) -> Signal {
        if k < self.warmup() || k >= bars.len() {
            return Signal::None;
        }
        let bias = momentum_volume_bias(bars, k, self.lookback);
        let (Some(fast), Some(slow)) = (
            trailing_mean_close(bars, k, self.fast_span),
            trailing_mean_close(bars, k, self.slow_span),
        ) else {
            return Signal::None;
        };

        match bias {
            Signal::Sell if fast < slow => Signal::Sell,
            Signal::Buy if fast > slow => Signal::Buy,
            _ => Signal::None,
        }
    }
}
