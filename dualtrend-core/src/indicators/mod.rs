//! Trailing-window statistics used by the signal rules.
//!
//! Every helper looks at a window that ends at (and includes) day `k` and
//! never reads past it. A window that would reach below index 0 or past the
//! end of the series yields `None` instead of panicking.

pub mod momentum;
pub mod sma;
pub mod volume;

pub use momentum::{momentum_stats, MomentumStats};
pub use sma::trailing_mean_close;
pub use volume::trailing_mean_volume;

/// Create synthetic bars from close prices for testing. Volume is 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::DailyBar> {
    use crate::domain::DailyBar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            DailyBar::new(base_date + chrono::Duration::days(i as i64), close, 1000)
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
