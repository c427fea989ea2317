//! End-to-end engine scenarios on hand-built series.
//!
//! The "spike" shape is 51 flat days at 100.0 with volume 1000, then a single
//! high-volume move on day 51. With the default rules that move is outsized
//! (mean absolute move ≈ move / 51), the volume is above the 51-day mean, and
//! both moving-average filters agree with its direction, so day 51 fires on
//! the benchmark and on any instrument sharing the shape.

use chrono::NaiveDate;
use dualtrend_core::{
    CloseReason, DailyBar, Direction, EngineError, InstrumentSeries, RecordingTradeLog,
    SeriesStore, SimulationEngine, StrategyParams, TextTradeLog, TradeEventKind,
};

const LEN: usize = 60;

fn date(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2017, 1, 2).unwrap() + chrono::Duration::days(i as i64)
}

fn series(symbol: &str, closes: &[f64], volumes: &[u64]) -> InstrumentSeries {
    let bars = closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&c, &v))| DailyBar::new(date(i), c, v))
        .collect();
    InstrumentSeries::new(symbol, bars)
}

/// Flat at 100 through day 50, day 51 at `100 + jump` on volume 5000, then
/// each later day moves by `drift` on ordinary volume.
fn spike_then_drift(jump: f64, drift: f64) -> (Vec<f64>, Vec<u64>) {
    let mut closes = vec![100.0; LEN];
    let mut volumes = vec![1000; LEN];
    closes[51] = 100.0 + jump;
    volumes[51] = 5000;
    for i in 52..LEN {
        closes[i] = closes[i - 1] + drift;
    }
    (closes, volumes)
}

fn store_with(instruments: &[(&str, &[f64], &[u64])]) -> SeriesStore {
    let (closes, volumes) = spike_then_drift(1.0, 1.0);
    let mut store = SeriesStore::new(series("SPY", &closes, &volumes));
    for (symbol, c, v) in instruments {
        store.insert(series(symbol, c, v)).unwrap();
    }
    store
}

// ── Long position held to the final day ─────────────────────────────

#[test]
fn long_opened_on_signal_day_and_force_closed_on_final_day() {
    let (closes, volumes) = spike_then_drift(1.0, 1.0);
    let store = store_with(&[("AAA", &closes[..], &volumes[..])]);
    let mut engine = SimulationEngine::new(&store, &["AAA"], StrategyParams::default()).unwrap();
    let mut log = RecordingTradeLog::new();

    let result = engine.run(8, &mut log).unwrap();

    assert_eq!(result.start_index, 51);
    assert_eq!(result.series.len(), 9);
    assert_eq!(result.long_trades, 1);
    assert_eq!(result.short_trades, 0);

    let events: Vec<_> = log.events_for("AAA").collect();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, TradeEventKind::Open);
    assert_eq!(events[0].direction, Direction::Long);
    assert_eq!(events[0].date, date(51));
    assert_eq!(events[0].price, closes[51]);

    let expected_pnl = closes[59] - closes[51];
    assert!(expected_pnl > 0.0);
    assert_eq!(events[1].date, date(59));
    assert_eq!(
        events[1].kind,
        TradeEventKind::Close {
            pnl: expected_pnl,
            reason: CloseReason::FinalDay
        }
    );

    // Unrealized PnL tracks the rise while held; realized lands on day 59.
    let s = &result.series;
    assert_eq!(s.long_unrealized[0], 0.0);
    for i in 1..8 {
        assert_eq!(s.long_unrealized[i], closes[51 + i] - closes[51]);
        assert_eq!(s.long_realized[i], 0.0);
    }
    assert_eq!(s.long_unrealized[8], 0.0);
    assert_eq!(s.long_realized[8], expected_pnl);
    assert_eq!(s.total_pnl[8], expected_pnl);
    assert!(engine.book().is_empty());
}

#[test]
fn text_log_has_a_header_per_day_and_one_line_per_event() {
    let (closes, volumes) = spike_then_drift(1.0, 1.0);
    let store = store_with(&[("AAA", &closes[..], &volumes[..])]);
    let mut engine = SimulationEngine::new(&store, &["AAA"], StrategyParams::default()).unwrap();
    let mut log = TextTradeLog::in_memory();

    engine.run(8, &mut log).unwrap();

    let long = log.long_text();
    assert_eq!(long.matches(":\n").count(), 9);
    assert!(long.starts_with("\n2017-02-22:\nOpen long position in AAA at 101.\n"));
    assert!(long.ends_with("\n2017-03-02:\nClose long position in AAA at 109 with PL 8.\n"));

    let short = log.short_text();
    assert_eq!(short.lines().filter(|l| l.contains("position")).count(), 0);
    assert_eq!(short.matches(":\n").count(), 9);
}

// ── Short position stopped out ──────────────────────────────────────

#[test]
fn short_stopped_out_by_narrow_entry_stop() {
    let (mut closes, volumes) = spike_then_drift(-1.0, 0.0);
    // Day 52 rallies through the 1% entry stop (99 * 1.01 = 99.99).
    for c in closes.iter_mut().skip(52) {
        *c = 100.5;
    }
    let mut store = SeriesStore::new(series("SPY", &closes, &volumes));
    store.insert(series("BBB", &closes, &volumes)).unwrap();
    let mut engine = SimulationEngine::new(&store, &["BBB"], StrategyParams::default()).unwrap();
    let mut log = RecordingTradeLog::new();

    let result = engine.run(8, &mut log).unwrap();

    assert_eq!(result.short_trades, 1);
    assert_eq!(result.long_trades, 0);
    let events: Vec<_> = log.events_for("BBB").collect();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].direction, Direction::Short);
    assert_eq!(events[1].date, date(52));
    assert_eq!(
        events[1].kind,
        TradeEventKind::Close {
            pnl: 99.0 - 100.5,
            reason: CloseReason::StopBreached
        }
    );
    assert_eq!(result.series.short_realized[1], -1.5);
    assert_eq!(*result.series.short_realized.last().unwrap(), -1.5);
    assert_eq!(*result.series.total_pnl.last().unwrap(), -1.5);
}

// ── Window boundary ─────────────────────────────────────────────────

#[test]
fn start_index_of_exactly_51_runs() {
    let (closes, volumes) = spike_then_drift(1.0, 1.0);
    let store = store_with(&[("AAA", &closes[..], &volumes[..])]);
    let mut engine = SimulationEngine::new(&store, &["AAA"], StrategyParams::default()).unwrap();
    let mut log = RecordingTradeLog::new();
    assert!(engine.run(LEN - 1 - 51, &mut log).is_ok());
}

#[test]
fn start_index_of_50_is_insufficient_history() {
    let (closes, volumes) = spike_then_drift(1.0, 1.0);
    let store = store_with(&[("AAA", &closes[..], &volumes[..])]);
    let mut engine = SimulationEngine::new(&store, &["AAA"], StrategyParams::default()).unwrap();
    let mut log = RecordingTradeLog::new();

    let err = engine.run(LEN - 1 - 50, &mut log).unwrap_err();
    assert!(matches!(
        err,
        EngineError::InsufficientHistory {
            days: 9,
            len: 60,
            warmup: 51
        }
    ));
    // Nothing was written.
    assert!(log.days.is_empty());
    assert!(log.events.is_empty());
}

// ── Instrument that never qualifies ─────────────────────────────────

#[test]
fn quiet_instrument_never_trades_and_adds_nothing() {
    let (closes, volumes) = spike_then_drift(1.0, 1.0);
    let quiet_closes = vec![50.0; LEN];
    let quiet_volumes = vec![1000; LEN];
    let store = store_with(&[
        ("AAA", &closes[..], &volumes[..]),
        ("QUIET", &quiet_closes[..], &quiet_volumes[..]),
    ]);

    let mut with_quiet =
        SimulationEngine::new(&store, &["AAA", "QUIET"], StrategyParams::default()).unwrap();
    let mut log = RecordingTradeLog::new();
    let result = with_quiet.run(8, &mut log).unwrap();

    let mut without = SimulationEngine::new(&store, &["AAA"], StrategyParams::default()).unwrap();
    let baseline = without.run(8, &mut RecordingTradeLog::new()).unwrap();

    assert_eq!(log.events_for("QUIET").count(), 0);
    assert_eq!(result.series, baseline.series);
    assert_eq!(result.long_trades, baseline.long_trades);
    assert_eq!(result.short_trades, baseline.short_trades);
}

// ── Benchmark filter ────────────────────────────────────────────────

#[test]
fn instrument_buy_without_benchmark_buy_does_not_open() {
    let (closes, volumes) = spike_then_drift(1.0, 1.0);
    let flat = vec![100.0; LEN];
    let flat_volume = vec![1000; LEN];
    let mut store = SeriesStore::new(series("SPY", &flat, &flat_volume));
    store.insert(series("AAA", &closes[..], &volumes[..])).unwrap();

    let mut engine = SimulationEngine::new(&store, &["AAA"], StrategyParams::default()).unwrap();
    let mut log = RecordingTradeLog::new();
    let result = engine.run(8, &mut log).unwrap();

    assert!(log.events.is_empty());
    assert_eq!(result.long_trades, 0);
}

#[test]
fn benchmark_can_trade_itself() {
    let store = store_with(&[]);
    let mut engine = SimulationEngine::new(&store, &["SPY"], StrategyParams::default()).unwrap();
    let mut log = RecordingTradeLog::new();
    let result = engine.run(8, &mut log).unwrap();
    assert_eq!(result.long_trades, 1);
    assert_eq!(log.events_for("SPY").count(), 2);
}

// ── Reset between runs ──────────────────────────────────────────────

#[test]
fn repeated_runs_are_identical() {
    let (closes, volumes) = spike_then_drift(1.0, 1.0);
    let store = store_with(&[("AAA", &closes[..], &volumes[..])]);
    let mut engine = SimulationEngine::new(&store, &["AAA"], StrategyParams::default()).unwrap();

    let first = engine.run(8, &mut RecordingTradeLog::new()).unwrap();
    let second = engine.run(8, &mut RecordingTradeLog::new()).unwrap();
    assert_eq!(first, second);
}
