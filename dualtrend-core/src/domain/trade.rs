//! Trade direction and the open/close events written to the trade logs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// Lower-case label used in log lines ("long" / "short").
    pub fn label(self) -> &'static str {
        match self {
            Direction::Long => "long",
            Direction::Short => "short",
        }
    }

    /// +1 for long, -1 for short.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }

    /// Profit of holding this direction from `entry` to `price`, per share.
    pub fn pnl(self, entry: f64, price: f64) -> f64 {
        match self {
            Direction::Long => price - entry,
            Direction::Short => entry - price,
        }
    }
}

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    /// The close crossed the position's stop.
    StopBreached,
    /// Forced liquidation on the last simulated day.
    FinalDay,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TradeEventKind {
    Open,
    Close { pnl: f64, reason: CloseReason },
}

/// One line of a trade log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    pub date: NaiveDate,
    pub symbol: String,
    pub direction: Direction,
    pub price: f64,
    pub kind: TradeEventKind,
}

impl TradeEvent {
    pub fn is_open(&self) -> bool {
        matches!(self.kind, TradeEventKind::Open)
    }

    /// Realized PnL for close events, `None` for opens.
    pub fn realized_pnl(&self) -> Option<f64> {
        match self.kind {
            TradeEventKind::Open => None,
            TradeEventKind::Close { pnl, .. } => Some(pnl),
        }
    }
}

impl fmt::Display for TradeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TradeEventKind::Open => write!(
                f,
                "Open {} position in {} at {}.",
                self.direction.label(),
                self.symbol,
                self.price
            ),
            TradeEventKind::Close { pnl, .. } => write!(
                f,
                "Close {} position in {} at {} with PL {}.",
                self.direction.label(),
                self.symbol,
                self.price,
                pnl
            ),
        }
    }
}
