//! Integration tests for the backtest event loop.
//!
//! 1. Trend-following runs: no cross on a pure rise, exit only after reversal
//! 2. Sizing and the single in-flight order rule
//! 3. Equity identity and end-flat invariant on a choppy series
//! 4. Determinism: identical inputs give identical curves and reports
//! 5. Drawdown on a known equity path

use barlab_core::analysis::{AnalyzerConfig, Frequency, PerformanceAnalyzer};
use barlab_core::data::BarStore;
use barlab_core::domain::{Bar, OrderSide, OrderStatus, Position, RejectReason};
use barlab_core::engine::{
    BacktestEngine, Broker, EngineConfig, EquitySnapshot, OrderLifecycle, RecordingObserver,
    Submission,
};
use barlab_core::enrich::{EnrichedTable, IndicatorEngine, TableView, WarmupPolicy};
use barlab_core::strategy::{Decision, EmaCross, RsiReversion, Strategy};
use chrono::{NaiveDate, NaiveDateTime};

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(16, 0, 0)
        .unwrap()
}

fn daily_bars(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                timestamp: start() + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 0.5,
                low: (open.min(close) - 0.5).max(0.0),
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

fn enrich(closes: &[f64]) -> EnrichedTable {
    let store = BarStore::from_bars("TEST", daily_bars(closes)).unwrap();
    IndicatorEngine::default().compute(&store)
}

fn choppy(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + (i as f64 * 0.25).sin() * 12.0 + (i as f64 * 0.05).cos() * 4.0)
        .collect()
}

fn engine() -> BacktestEngine {
    BacktestEngine::new(EngineConfig::new(600.0, 0.001, 0.95).unwrap())
}

#[test]
fn rising_series_never_crosses() {
    let closes: Vec<f64> = (0..30).map(|i| 10.0 + i as f64 * 0.5).collect();
    let table = enrich(&closes);
    let result = engine().run(&table, &EmaCross::default());

    assert!(result.fills.is_empty());
    assert!(result.orders.is_empty());
    assert!(!result.forced_exit);
    assert_eq!(result.final_cash, 600.0);
}

fn ema_gap(table: &EnrichedTable, row: usize) -> f64 {
    table.value("ema_9", row).unwrap() - table.value("ema_26", row).unwrap()
}

#[test]
fn exit_waits_for_the_reversal() {
    // Slide, rally, then sell-off.
    let closes: Vec<f64> = (0..20)
        .map(|i| 100.0 - i as f64)
        .chain((0..40).map(|i| 81.0 + i as f64 * 1.5))
        .chain((0..40).map(|i| 139.5 - i as f64 * 1.5))
        .collect();
    let table = enrich(&closes);
    let result = engine().run(&table, &EmaCross::default());
    let row_of = |ts: NaiveDateTime| table.bars().iter().position(|b| b.timestamp == ts).unwrap();

    assert_eq!(result.fills.len(), 2);
    assert!(!result.forced_exit);
    let entry = row_of(result.fills[0].timestamp);
    let exit = row_of(result.fills[1].timestamp);
    assert_eq!(result.fills[0].side, OrderSide::Buy);
    assert_eq!(result.fills[1].side, OrderSide::Close);
    assert!(entry > 20 && entry < 60);
    assert!(exit > 60);

    assert!(ema_gap(&table, entry - 1) <= 0.0);
    assert!(ema_gap(&table, entry) > 0.0);
    for row in entry..exit {
        assert!(ema_gap(&table, row) >= 0.0, "sold early at row {row}");
    }
    assert!(ema_gap(&table, exit) < 0.0);
}

#[test]
fn entry_size_from_cash_and_stake() {
    let broker = Broker::new(600.0, 0.001);
    assert_eq!(broker.entry_size(0.95, 10.0), 57.0);
}

#[test]
fn second_enter_before_fill_is_ignored() {
    let mut lifecycle = OrderLifecycle::new();
    let mut broker = Broker::new(600.0, 0.001);
    let size = broker.entry_size(0.95, 10.0);

    let first = lifecycle.submit(OrderSide::Buy, size, start());
    let second = lifecycle.submit(OrderSide::Buy, size, start());
    assert!(matches!(first, Submission::Accepted(_)));
    assert!(matches!(second, Submission::Ignored { .. }));

    lifecycle.resolve(&mut broker, 10.0, start());
    assert_eq!(lifecycle.history().len(), 1);
    assert_eq!(broker.position().size, 57.0);
}

#[test]
fn equity_identity_and_flat_finish() {
    let table = enrich(&choppy(300));
    let result = engine().run(&table, &EmaCross::default());

    assert_eq!(result.equity_curve.len(), 300);
    for (snap, bar) in result.equity_curve.iter().zip(table.bars()) {
        assert!(
            (snap.equity - (snap.cash + snap.position_size * bar.close)).abs() < 1e-9,
            "equity identity broken at {}",
            snap.timestamp
        );
        assert!(snap.cash >= 0.0);
    }

    let held: f64 = result
        .fills
        .iter()
        .map(|f| match f.side {
            OrderSide::Buy => f.size,
            OrderSide::Sell | OrderSide::Close => -f.size,
        })
        .sum();
    assert_eq!(held, 0.0);
    let last = result.equity_curve.last().unwrap();
    assert_eq!(last.position_size, 0.0);
    assert_eq!(last.equity, result.final_cash);
    assert!(!result.trades.is_empty());
    let pnl: f64 = result.trades.iter().map(|t| t.net_pnl).sum();
    assert!((result.initial_cash + pnl - result.final_cash).abs() < 1e-6);
}

#[test]
fn runs_are_deterministic() {
    let table = enrich(&choppy(250)).trim_warmup(WarmupPolicy::MaxLookback);
    let analyzer = PerformanceAnalyzer::new(AnalyzerConfig::new(Frequency::Day, None).unwrap());

    let a = engine().run(&table, &RsiReversion::default());
    let b = engine().run(&table, &RsiReversion::default());
    assert_eq!(a.equity_curve, b.equity_curve);
    assert_eq!(a.fills, b.fills);
    assert_eq!(
        analyzer.analyze_run(&a).to_string(),
        analyzer.analyze_run(&b).to_string()
    );
}

#[test]
fn observer_receives_every_fill() {
    let table = enrich(&choppy(200));
    let mut observer = RecordingObserver::default();
    let result = engine().run_with_observer(&table, &EmaCross::default(), &mut observer);
    assert_eq!(observer.fills, result.fills);
}

/// Emits Enter on every bar regardless of position.
struct AlwaysEnter;

impl Strategy for AlwaysEnter {
    fn name(&self) -> &str {
        "always_enter"
    }

    fn decide(&self, _view: &TableView<'_>, _position: &Position) -> Decision {
        Decision::enter()
    }
}

#[test]
fn rejections_do_not_stop_the_run() {
    let table = enrich(&[10.0; 6]);
    let result = engine().run(&table, &AlwaysEnter);
    // 57 units, then every further entry is refused while long.
    let buys: Vec<f64> = result
        .fills
        .iter()
        .filter(|f| f.side == OrderSide::Buy)
        .map(|f| f.size)
        .collect();
    assert_eq!(buys, vec![57.0]);
    assert_eq!(result.rejected_orders().count(), 5);
    assert!(result.rejected_orders().all(|o| matches!(
        o.status,
        OrderStatus::Rejected {
            reason: RejectReason::AlreadyLong { .. }
        }
    )));
    assert_eq!(result.equity_curve.len(), 6);
}

#[test]
fn drawdown_of_known_path() {
    let curve: Vec<EquitySnapshot> = [100.0, 110.0, 90.0, 120.0]
        .iter()
        .enumerate()
        .map(|(i, &equity)| EquitySnapshot {
            timestamp: start() + chrono::Duration::days(i as i64),
            equity,
            cash: equity,
            position_size: 0.0,
            close: 1.0,
        })
        .collect();
    let report = PerformanceAnalyzer::default().analyze(&curve);
    assert!((report.max_drawdown_pct - 18.1818).abs() < 1e-3);
}
