//! Synthetic series for demos and tests.
//!
//! A random walk from 100.0 on weekdays only, seeded from the symbol so the
//! same symbol always gets the same path. Every symbol shares one weekday
//! calendar, so synthetic universes are always aligned with the benchmark.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use dualtrend_core::{DailyBar, DataError, HistoricalDataProvider};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyntheticProvider {
    /// Mixed into every symbol's seed; change it for a different market.
    pub seed: u64,
}

impl SyntheticProvider {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn rng_for(&self, symbol: &str) -> StdRng {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seed.to_le_bytes());
        hasher.update(symbol.as_bytes());
        StdRng::from_seed(*hasher.finalize().as_bytes())
    }

    /// Bars for `symbol` on every weekday in `start ..= end`.
    pub fn generate(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<DailyBar> {
        let mut rng = self.rng_for(symbol);
        let mut bars = Vec::new();
        let mut price = 100.0_f64;
        let mut current = start;

        while current <= end {
            if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
                current += chrono::Duration::days(1);
                continue;
            }

            // Occasional larger moves on heavier volume.
            let shock = rng.gen_bool(0.08);
            let daily_return: f64 = if shock {
                rng.gen_range(-0.05..0.05)
            } else {
                rng.gen_range(-0.015..0.015)
            };
            let volume = if shock {
                rng.gen_range(3_000_000..8_000_000u64)
            } else {
                rng.gen_range(500_000..3_000_000u64)
            };

            price *= 1.0 + daily_return;
            bars.push(DailyBar::new(current, price, volume));
            current += chrono::Duration::days(1);
        }

        bars
    }
}

impl HistoricalDataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyBar>, DataError> {
        Ok(self.generate(symbol, start, end))
    }
}
