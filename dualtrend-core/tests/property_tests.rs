//! Property tests for engine invariants.
//!
//! Uses proptest to verify, over random walks:
//! 1. PnL identity — total = unrealized + realized on every day
//! 2. Liquidation — the book is empty after a run and every open has a close
//! 3. Realized counters — they move only on days with closes
//! 4. One position per instrument — opens and closes alternate per symbol
//! 5. Ratchet monotonicity — stops may only tighten, never loosen

use chrono::NaiveDate;
use dualtrend_core::{
    DailyBar, DayContext, Direction, InstrumentSeries, PositionBook, RecordingTradeLog,
    RunResult, SeriesStore, Signal, SimulationEngine, StopPolicy, StrategyParams, TradeEventKind,
};
use proptest::prelude::*;
use std::collections::HashMap;

const SYMBOLS: [&str; 2] = ["AAA", "BBB"];

// ── Strategies (proptest) ────────────────────────────────────────────

/// One day of (return, volume) for the benchmark and two instruments.
///
/// Returns are wide enough and volumes uneven enough that the momentum gate
/// fires on a fair share of days.
fn arb_day() -> impl Strategy<Value = [(f64, u64); 3]> {
    let leg = || (-0.04..0.04_f64, 200u64..6000);
    (leg(), leg(), leg()).prop_map(|(a, b, c)| [a, b, c])
}

fn arb_market() -> impl Strategy<Value = Vec<[(f64, u64); 3]>> {
    prop::collection::vec(arb_day(), 60..140)
}

fn arb_prices() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-0.05..0.05_f64, 1..60).prop_map(|returns| {
        let mut price = 100.0;
        returns
            .into_iter()
            .map(|r| {
                price *= 1.0 + r;
                price
            })
            .collect()
    })
}

// ── Helpers ──────────────────────────────────────────────────────────

fn build_store(market: &[[(f64, u64); 3]]) -> SeriesStore {
    let start = NaiveDate::from_ymd_opt(2016, 1, 4).unwrap();
    let mut legs: Vec<Vec<DailyBar>> = vec![Vec::new(); 3];
    let mut prices = [100.0_f64; 3];
    for (i, day) in market.iter().enumerate() {
        let date = start + chrono::Duration::days(i as i64);
        for (leg, &(ret, volume)) in day.iter().enumerate() {
            prices[leg] *= 1.0 + ret;
            legs[leg].push(DailyBar::new(date, prices[leg], volume));
        }
    }
    let mut legs = legs.into_iter();
    let mut store = SeriesStore::new(InstrumentSeries::new("SPY", legs.next().unwrap()));
    for (symbol, bars) in SYMBOLS.iter().zip(legs) {
        store.insert(InstrumentSeries::new(*symbol, bars)).unwrap();
    }
    store
}

fn run_full(store: &SeriesStore) -> (RunResult, RecordingTradeLog, bool) {
    let params = StrategyParams::default();
    let days = store.len() - 1 - params.warmup();
    let mut engine = SimulationEngine::new(store, &SYMBOLS, params).unwrap();
    let mut log = RecordingTradeLog::new();
    let result = engine.run(days, &mut log).unwrap();
    let book_empty = engine.book().is_empty();
    (result, log, book_empty)
}

// ── 1. PnL identity ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn total_is_unrealized_plus_realized(market in arb_market()) {
        let store = build_store(&market);
        let (result, _, _) = run_full(&store);
        let s = &result.series;
        for i in 0..s.len() {
            prop_assert_eq!(s.total_pnl[i], s.total_unrealized[i] + s.total_realized[i]);
            prop_assert_eq!(s.total_realized[i], s.long_realized[i] + s.short_realized[i]);
            prop_assert_eq!(s.total_unrealized[i], s.long_unrealized[i] + s.short_unrealized[i]);
        }
    }
}

// ── 2. Liquidation ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn final_day_liquidates_everything(market in arb_market()) {
        let store = build_store(&market);
        let (result, log, book_empty) = run_full(&store);
        prop_assert!(book_empty);

        let s = &result.series;
        let last = s.len() - 1;
        prop_assert_eq!(s.long_unrealized[last], 0.0);
        prop_assert_eq!(s.short_unrealized[last], 0.0);

        let opens = log.events.iter().filter(|e| e.is_open()).count();
        let closes = log.events.len() - opens;
        prop_assert_eq!(opens, closes);
        prop_assert_eq!(opens, result.long_trades + result.short_trades);

        let final_date = s.dates[last];
        prop_assert!(log.events.iter().all(|e| !(e.is_open() && e.date == final_date)));
    }
}

// ── 3. Realized counters ─────────────────────────────────────────────

proptest! {
    #[test]
    fn realized_moves_only_on_close_days(market in arb_market()) {
        let store = build_store(&market);
        let (result, log, _) = run_full(&store);
        let s = &result.series;

        let mut closed: HashMap<(NaiveDate, Direction), f64> = HashMap::new();
        for event in &log.events {
            if let Some(pnl) = event.realized_pnl() {
                *closed.entry((event.date, event.direction)).or_default() += pnl;
            }
        }

        let mut long_prev = 0.0;
        let mut short_prev = 0.0;
        for i in 0..s.len() {
            let date = s.dates[i];
            let long_delta = closed.get(&(date, Direction::Long)).copied().unwrap_or(0.0);
            let short_delta = closed.get(&(date, Direction::Short)).copied().unwrap_or(0.0);
            if !closed.contains_key(&(date, Direction::Long)) {
                prop_assert_eq!(s.long_realized[i], long_prev);
            }
            if !closed.contains_key(&(date, Direction::Short)) {
                prop_assert_eq!(s.short_realized[i], short_prev);
            }
            prop_assert!((s.long_realized[i] - long_prev - long_delta).abs() < 1e-9);
            prop_assert!((s.short_realized[i] - short_prev - short_delta).abs() < 1e-9);
            long_prev = s.long_realized[i];
            short_prev = s.short_realized[i];
        }
    }
}

// ── 4. One position per instrument ───────────────────────────────────

proptest! {
    #[test]
    fn opens_and_closes_alternate_per_symbol(market in arb_market()) {
        let store = build_store(&market);
        let (_, log, _) = run_full(&store);

        for symbol in SYMBOLS {
            let mut held: Option<Direction> = None;
            let mut last_close: Option<NaiveDate> = None;
            for event in log.events_for(symbol) {
                match event.kind {
                    TradeEventKind::Open => {
                        prop_assert!(held.is_none(), "{} opened twice", symbol);
                        prop_assert_ne!(Some(event.date), last_close, "{} reopened same day", symbol);
                        held = Some(event.direction);
                    }
                    TradeEventKind::Close { .. } => {
                        prop_assert_eq!(held, Some(event.direction));
                        held = None;
                        last_close = Some(event.date);
                    }
                }
            }
            prop_assert!(held.is_none());
        }
    }
}

// ── 5. Ratchet monotonicity ──────────────────────────────────────────

proptest! {
    /// Driving one position through random closes, its stop never loosens.
    #[test]
    fn stop_only_tightens(prices in arb_prices(), long in any::<bool>()) {
        let signal = if long { Signal::Buy } else { Signal::Sell };
        let mut book = PositionBook::new(StopPolicy::default());
        let start = NaiveDate::from_ymd_opt(2016, 1, 4).unwrap();
        let day = |index: usize, benchmark_signal: Signal| DayContext {
            index,
            date: start + chrono::Duration::days(index as i64),
            is_final_day: false,
            benchmark_signal,
        };

        book.step("AAA", 100.0, &day(0, signal), signal);
        let mut stop = book.get("AAA").unwrap().stop_price();

        for (i, &price) in prices.iter().enumerate() {
            book.step("AAA", price, &day(i + 1, Signal::None), Signal::None);
            let Some(position) = book.get("AAA") else { break };
            let next = position.stop_price();
            if long {
                prop_assert!(next >= stop, "long stop loosened: {} -> {}", stop, next);
            } else {
                prop_assert!(next <= stop, "short stop loosened: {} -> {}", stop, next);
            }
            stop = next;
        }
    }
}
