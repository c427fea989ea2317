//! Trailing simple moving average of closes.
//!
//! `span` counts the days back from `k`, so the window is
//! `close[k - span ..= k]` and holds `span + 1` closes.

use crate::domain::DailyBar;

/// Mean close over `bars[k - span ..= k]`.
pub fn trailing_mean_close(bars: &[DailyBar], k: usize, span: usize) -> Option<f64> {
    if k >= bars.len() || k < span {
        return None;
    }
    let window = &bars[k - span..=k];
    let sum: f64 = window.iter().map(|b| b.close).sum();
    Some(sum / window.len() as f64)
}
