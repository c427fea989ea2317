//! Domain types for the dual-filter backtester.

pub mod bar;
pub mod signal;
pub mod trade;

pub use bar::DailyBar;
pub use signal::Signal;
pub use trade::{CloseReason, Direction, TradeEvent, TradeEventKind};
