//! Position book — per-instrument position state machine.
//!
//! States per instrument: no position, LONG, SHORT. Each simulated day every
//! instrument goes through `PositionBook::step` exactly once:
//!
//! 1. An existing position is closed if the close breaches its stop or the day
//!    is the final simulated day. Otherwise it contributes unrealized PnL and
//!    its stop trails a new favorable extreme.
//! 2. If the instrument held no position at the start of the day, a position
//!    opens when the instrument signal agrees with the benchmark signal and
//!    the day is not the final day.
//!
//! An instrument closed in step 1 does not reopen the same day.

pub mod ratchet;
pub mod stops;

pub use ratchet::tighten;
pub use stops::{StopPolicy, StopPolicyError};

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::domain::{CloseReason, Direction, Signal, TradeEvent, TradeEventKind};

/// Per-day inputs shared by every instrument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayContext {
    pub index: usize,
    pub date: NaiveDate,
    pub is_final_day: bool,
    pub benchmark_signal: Signal,
}

/// An open position.
///
/// `entry_price` is fixed at open. `stop_price` only ever tightens and
/// `reference_price` tracks the most favorable close seen since entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    direction: Direction,
    entry_price: f64,
    stop_price: f64,
    reference_price: f64,
    opened_on: NaiveDate,
    opened_index: usize,
}

impl Position {
    pub fn open(direction: Direction, price: f64, day: &DayContext, stops: &StopPolicy) -> Self {
        Self {
            direction,
            entry_price: price,
            stop_price: stops.initial_stop(direction, price),
            reference_price: price,
            opened_on: day.date,
            opened_index: day.index,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn entry_price(&self) -> f64 {
        self.entry_price
    }

    pub fn stop_price(&self) -> f64 {
        self.stop_price
    }

    pub fn reference_price(&self) -> f64 {
        self.reference_price
    }

    pub fn opened_on(&self) -> NaiveDate {
        self.opened_on
    }

    pub fn opened_index(&self) -> usize {
        self.opened_index
    }

    /// The close is on the wrong side of the stop (strict inequality).
    pub fn is_stop_breached(&self, price: f64) -> bool {
        match self.direction {
            Direction::Long => price < self.stop_price,
            Direction::Short => price > self.stop_price,
        }
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.direction.pnl(self.entry_price, price)
    }

    /// Trail the stop behind a new favorable extreme.
    ///
    /// A close at or beyond the reference price becomes the new reference and
    /// proposes a trailing stop; the ratchet keeps the tighter of the current
    /// and proposed levels. Returns true if the reference moved.
    pub fn trail(&mut self, price: f64, stops: &StopPolicy) -> bool {
        let new_extreme = match self.direction {
            Direction::Long => price >= self.reference_price,
            Direction::Short => price <= self.reference_price,
        };
        if !new_extreme {
            return false;
        }
        self.reference_price = price;
        let proposed = stops.trailing_stop(self.direction, price);
        self.stop_price = tighten(self.direction, self.stop_price, proposed);
        true
    }

    fn close_reason(&self, price: f64, is_final_day: bool) -> Option<CloseReason> {
        if self.is_stop_breached(price) {
            Some(CloseReason::StopBreached)
        } else if is_final_day {
            Some(CloseReason::FinalDay)
        } else {
            None
        }
    }
}

/// What happened to one instrument on one day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transition {
    /// Close event, if the held position was closed.
    pub closed: Option<TradeEvent>,
    /// Open event, if a new position was opened.
    pub opened: Option<TradeEvent>,
    /// Unrealized PnL of a position that survived the day.
    pub unrealized: Option<(Direction, f64)>,
}

impl Transition {
    /// Close event first, then open event.
    pub fn events(&self) -> impl Iterator<Item = &TradeEvent> {
        self.closed.iter().chain(self.opened.iter())
    }

    /// Realized PnL booked today, with its direction.
    pub fn realized(&self) -> Option<(Direction, f64)> {
        self.closed
            .as_ref()
            .and_then(|e| e.realized_pnl().map(|pnl| (e.direction, pnl)))
    }
}

/// Open positions keyed by symbol. At most one position per symbol.
#[derive(Debug, Clone, Default)]
pub struct PositionBook {
    positions: HashMap<String, Position>,
    stops: StopPolicy,
}

impl PositionBook {
    pub fn new(stops: StopPolicy) -> Self {
        Self {
            positions: HashMap::new(),
            stops,
        }
    }

    pub fn stops(&self) -> &StopPolicy {
        &self.stops
    }

    pub fn get(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.positions.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Position)> {
        self.positions.iter().map(|(s, p)| (s.as_str(), p))
    }

    /// Run one day of the state machine for `symbol` at close `price`.
    pub fn step(
        &mut self,
        symbol: &str,
        price: f64,
        day: &DayContext,
        signal: Signal,
    ) -> Transition {
        let mut transition = Transition::default();
        let held_at_start = self.positions.contains_key(symbol);

        // ─── Existing position: close, or hold and trail ───
        if let Some(position) = self.positions.get_mut(symbol) {
            match position.close_reason(price, day.is_final_day) {
                Some(reason) => {
                    let direction = position.direction;
                    let pnl = position.unrealized_pnl(price);
                    self.positions.remove(symbol);
                    transition.closed = Some(TradeEvent {
                        date: day.date,
                        symbol: symbol.to_string(),
                        direction,
                        price,
                        kind: TradeEventKind::Close { pnl, reason },
                    });
                }
                None => {
                    transition.unrealized =
                        Some((position.direction, position.unrealized_pnl(price)));
                    position.trail(price, &self.stops);
                }
            }
        }

        // ─── No position at start of day: open on agreement ───
        if !held_at_start && !day.is_final_day && signal.agrees_with(day.benchmark_signal) {
            let direction = if signal.is_buy() {
                Direction::Long
            } else {
                Direction::Short
            };
            let position = Position::open(direction, price, day, &self.stops);
            self.positions.insert(symbol.to_string(), position);
            transition.opened = Some(TradeEvent {
                date: day.date,
                symbol: symbol.to_string(),
                direction,
                price,
                kind: TradeEventKind::Open,
            });
        }

        transition
    }
}
