//! Discrete trading signal produced by the signal rules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-valued signal: go long, go short, or do nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    Buy,
    Sell,
    #[default]
    None,
}

impl Signal {
    pub fn is_buy(self) -> bool {
        self == Signal::Buy
    }

    pub fn is_sell(self) -> bool {
        self == Signal::Sell
    }

    /// True when both signals point the same way and neither is `None`.
    pub fn agrees_with(self, other: Signal) -> bool {
        self != Signal::None && self == other
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::None => "NONE",
        };
        f.write_str(s)
    }
}
