//! Trade log sinks.
//!
//! The engine writes two append-only streams, one for long trades and one for
//! short trades. Each simulated day opens with a date header on both streams,
//! followed by one line per open/close event on the stream of its direction:
//!
//! ```text
//!
//! 2017-03-01:
//! Open long position in AAPL at 139.79.
//! Close long position in MSFT at 64.94 with PL -1.2.
//! ```

use chrono::NaiveDate;
use std::io::{self, Write};

use crate::domain::{Direction, TradeEvent};

/// Destination for trade log lines.
pub trait TradeLogSink {
    /// Start a new day's section.
    fn begin_day(&mut self, date: NaiveDate) -> io::Result<()>;

    /// Append one open/close event.
    fn record(&mut self, event: &TradeEvent) -> io::Result<()>;

    /// Called once after the last day.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Human-readable text log over any pair of writers.
#[derive(Debug)]
pub struct TextTradeLog<W: Write> {
    long: W,
    short: W,
}

impl<W: Write> TextTradeLog<W> {
    pub fn new(long: W, short: W) -> Self {
        Self { long, short }
    }

    /// Return the (long, short) writers.
    pub fn into_inner(self) -> (W, W) {
        (self.long, self.short)
    }

    fn stream(&mut self, direction: Direction) -> &mut W {
        match direction {
            Direction::Long => &mut self.long,
            Direction::Short => &mut self.short,
        }
    }
}

impl TextTradeLog<Vec<u8>> {
    /// Log that keeps both streams in memory.
    pub fn in_memory() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn long_text(&self) -> String {
        String::from_utf8_lossy(&self.long).into_owned()
    }

    pub fn short_text(&self) -> String {
        String::from_utf8_lossy(&self.short).into_owned()
    }
}

impl<W: Write> TradeLogSink for TextTradeLog<W> {
    fn begin_day(&mut self, date: NaiveDate) -> io::Result<()> {
        write!(self.long, "\n{date}:\n")?;
        write!(self.short, "\n{date}:\n")
    }

    fn record(&mut self, event: &TradeEvent) -> io::Result<()> {
        writeln!(self.stream(event.direction), "{event}")
    }

    fn finish(&mut self) -> io::Result<()> {
        self.long.flush()?;
        self.short.flush()
    }
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTradeLog;

impl TradeLogSink for NullTradeLog {
    fn begin_day(&mut self, _date: NaiveDate) -> io::Result<()> {
        Ok(())
    }

    fn record(&mut self, _event: &TradeEvent) -> io::Result<()> {
        Ok(())
    }
}

/// Sink that keeps the structured events, for inspection after a run.
#[derive(Debug, Clone, Default)]
pub struct RecordingTradeLog {
    pub days: Vec<NaiveDate>,
    pub events: Vec<TradeEvent>,
}

impl RecordingTradeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events for one symbol, in the order they were recorded.
    pub fn events_for<'a>(&'a self, symbol: &'a str) -> impl Iterator<Item = &'a TradeEvent> {
        self.events.iter().filter(move |e| e.symbol == symbol)
    }
}

impl TradeLogSink for RecordingTradeLog {
    fn begin_day(&mut self, date: NaiveDate) -> io::Result<()> {
        self.days.push(date);
        Ok(())
    }

    fn record(&mut self, event: &TradeEvent) -> io::Result<()> {
        self.events.push(event.clone());
        Ok(())
    }
}
