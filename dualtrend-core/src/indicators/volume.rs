//! Trailing mean volume over `volume[k - lookback ..= k]`.

use crate::domain::DailyBar;

pub fn trailing_mean_volume(bars: &[DailyBar], k: usize, lookback: usize) -> Option<f64> {
    if k >= bars.len() || k < lookback {
        return None;
    }
    let window = &bars[k - lookback..=k];
    let sum: f64 = window.iter().map(|b| b.volume as f64).sum();
    Some(sum / window.len() as f64)
}
