//! DailyBar — the unit of historical data the engine consumes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Close and volume for a single instrument on a single trading day.
///
/// Only the close is traded on and only close and volume feed the signal
/// rules, so no open/high/low columns are carried.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: u64,
}

impl DailyBar {
    pub fn new(date: NaiveDate, close: f64, volume: u64) -> Self {
        Self {
            date,
            close,
            volume,
        }
    }

    /// A bar is usable when its close is a positive, finite price.
    pub fn is_valid(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }
}
