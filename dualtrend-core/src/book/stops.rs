//! Stop distances for entries and trailing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Direction;

/// A stop fraction outside (0, 1).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("stops.{field} must be in (0, 1), got {value}")]
pub struct StopPolicyError {
    pub field: &'static str,
    pub value: f64,
}

/// Stop distances as fractions of price.
///
/// The defaults keep the asymmetric entry stops of the strategy this engine
/// reproduces: 10% below a long entry, 1% above a short entry. Once a
/// position makes a new favorable extreme the stop trails 5% behind it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopPolicy {
    pub long_initial: f64,
    pub short_initial: f64,
    pub long_trail: f64,
    pub short_trail: f64,
}

impl Default for StopPolicy {
    fn default() -> Self {
        Self {
            long_initial: 0.10,
            short_initial: 0.01,
            long_trail: 0.05,
            short_trail: 0.05,
        }
    }
}

impl StopPolicy {
    /// Stop placed when a position opens at `price`.
    pub fn initial_stop(&self, direction: Direction, price: f64) -> f64 {
        match direction {
            Direction::Long => price - self.long_initial * price,
            Direction::Short => price + self.short_initial * price,
        }
    }

    /// Stop proposed when the position makes a new favorable extreme at `price`.
    pub fn trailing_stop(&self, direction: Direction, price: f64) -> f64 {
        match direction {
            Direction::Long => price - self.long_trail * price,
            Direction::Short => price + self.short_trail * price,
        }
    }

    /// Every fraction must lie strictly between 0 and 1.
    pub fn validate(&self) -> Result<(), StopPolicyError> {
        let fields = [
            ("long_initial", self.long_initial),
            ("short_initial", self.short_initial),
            ("long_trail", self.long_trail),
            ("short_trail", self.short_trail),
        ];
        for (field, value) in fields {
            if !(value > 0.0 && value < 1.0) {
                return Err(StopPolicyError { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn default_entry_stops_are_asymmetric() {
        let stops = StopPolicy::default();
        assert_approx(stops.initial_stop(Direction::Long, 200.0), 180.0, DEFAULT_EPSILON);
        assert_approx(stops.initial_stop(Direction::Short, 200.0), 202.0, DEFAULT_EPSILON);
    }

    #[test]
    fn default_trailing_stops_are_five_percent() {
        let stops = StopPolicy::default();
        assert_approx(stops.trailing_stop(Direction::Long, 200.0), 190.0, DEFAULT_EPSILON);
        assert_approx(stops.trailing_stop(Direction::Short, 200.0), 210.0, DEFAULT_EPSILON);
    }

    #[test]
    fn validate_rejects_out_of_range() {
        assert!(StopPolicy::default().validate().is_ok());
        let bad = StopPolicy {
            short_trail: 1.5,
            ..StopPolicy::default()
        };
        let err = bad.validate().unwrap_err();
        assert_eq!(
            err,
            StopPolicyError {
                field: "short_trail",
                value: 1.5
            }
        );
        assert_eq!(err.to_string(), "stops.short_trail must be in (0, 1), got 1.5");

        let nan = StopPolicy {
            long_initial: f64::NAN,
            ..StopPolicy::default()
        };
        assert_eq!(nan.validate().unwrap_err().field, "long_initial");
    }
}
