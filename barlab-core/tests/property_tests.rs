//! Property tests for indicator and engine invariants.
//!
//! Uses proptest to verify:
//! 1. EMA follows its recurrence from the seed onward
//! 2. RSI and MFI stay within [0, 100]
//! 3. OBV never falls while closes never fall
//! 4. Equity identity holds at every snapshot under arbitrary decisions
//! 5. Every run ends flat
//! 6. At most one order is in flight
//! 7. Enrichment fingerprints are reproducible

use barlab_core::data::BarStore;
use barlab_core::domain::{Bar, OrderSide, Position};
use barlab_core::engine::{BacktestEngine, EngineConfig, OrderLifecycle, Submission};
use barlab_core::enrich::{IndicatorEngine, TableView};
use barlab_core::indicators::{Ema, Indicator, Mfi, Obv, Rsi};
use barlab_core::strategy::{Decision, Strategy as TradingStrategy};
use chrono::NaiveDate;
use proptest::prelude::*;

// ── Generators ───────────────────────────────────────────────────────

fn arb_closes(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(10.0..200.0_f64, 2..max_len)
}

fn arb_volumes(len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0..1_000_000.0_f64, len)
}

fn bars_from(closes: &[f64], volumes: &[f64]) -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(16, 0, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                timestamp: start + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) * 1.01,
                low: open.min(close) * 0.99,
                close,
                volume: volumes.get(i).copied().unwrap_or(1000.0),
            }
        })
        .collect()
}

/// Plays back a fixed decision per bar index, cycling.
struct Replay(Vec<u8>);

impl TradingStrategy for Replay {
    fn name(&self) -> &str {
        "replay"
    }

    fn decide(&self, view: &TableView<'_>, _position: &Position) -> Decision {
        match self.0[view.index() % self.0.len()] % 3 {
            0 => Decision::Hold,
            1 => Decision::enter(),
            _ => Decision::Exit,
        }
    }
}

// ── 1–3. Indicators ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn ema_follows_recurrence(closes in arb_closes(80), span in 1usize..30) {
        let bars = bars_from(&closes, &[]);
        let ema = Ema::new(span).compute(&bars);
        let alpha = 2.0 / (span as f64 + 1.0);

        prop_assert_eq!(ema[0], closes[0]);
        for i in 1..closes.len() {
            let expected = alpha * closes[i] + (1.0 - alpha) * ema[i - 1];
            prop_assert!((ema[i] - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn oscillators_are_bounded(
        (closes, volumes) in arb_closes(120).prop_flat_map(|c| {
            let n = c.len();
            (Just(c), arb_volumes(n))
        }),
        period in 2usize..20,
    ) {
        let bars = bars_from(&closes, &volumes);
        for values in [Rsi::new(period).compute(&bars), Mfi::new(period).compute(&bars)] {
            for v in values.into_iter().filter(|v| !v.is_nan()) {
                prop_assert!((0.0..=100.0).contains(&v), "out of range: {}", v);
            }
        }
    }

    #[test]
    fn obv_monotone_for_rising_closes(
        steps in prop::collection::vec(0.0..5.0_f64, 2..100),
        volume in 0.0..10_000.0_f64,
    ) {
        let closes: Vec<f64> = steps
            .iter()
            .scan(50.0, |price, step| {
                *price += step;
                Some(*price)
            })
            .collect();
        let bars = bars_from(&closes, &vec![volume; closes.len()]);
        let obv = Obv::new().compute(&bars);
        for pair in obv.windows(2) {
            prop_assert!(pair[1] >= pair[0]);
        }
    }
}

// ── 4–5. Engine accounting ───────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn equity_identity_and_flat_end(
        closes in arb_closes(150),
        script in prop::collection::vec(any::<u8>(), 1..40),
        stake in 0.1..1.0_f64,
    ) {
        let store = BarStore::from_bars("PROP", bars_from(&closes, &[])).unwrap();
        let table = IndicatorEngine::new(Vec::new()).compute(&store);
        let config = EngineConfig::new(10_000.0, 0.001, stake).unwrap();
        let result = BacktestEngine::new(config).run(&table, &Replay(script));

        prop_assert_eq!(result.equity_curve.len(), closes.len());
        for snap in &result.equity_curve {
            prop_assert!(snap.cash >= -1e-9);
            let identity = snap.cash + snap.position_size * snap.close;
            prop_assert!((snap.equity - identity).abs() < 1e-6);
        }

        if let Some(last) = result.equity_curve.last() {
            prop_assert_eq!(last.position_size, 0.0);
            prop_assert_eq!(last.equity, result.final_cash);
        }

        let mut held = 0.0;
        for fill in &result.fills {
            match fill.side {
                OrderSide::Buy => {
                    prop_assert_eq!(held, 0.0);
                    held += fill.size;
                }
                OrderSide::Sell | OrderSide::Close => {
                    prop_assert!(fill.size <= held);
                    held -= fill.size;
                }
            }
        }
        prop_assert_eq!(held, 0.0);
        prop_assert!(result.final_cash >= 0.0);
    }
}

// ── 6–7. Order slot and fingerprints ─────────────────────────────────

proptest! {
    #[test]
    fn only_first_submission_is_accepted(attempts in 2usize..10) {
        let mut lifecycle = OrderLifecycle::new();
        let at = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(16, 0, 0)
            .unwrap();
        let accepted = (0..attempts)
            .map(|_| lifecycle.submit(OrderSide::Buy, 1.0, at))
            .filter(|s| matches!(s, Submission::Accepted(_)))
            .count();
        prop_assert_eq!(accepted, 1);
        prop_assert!(lifecycle.is_pending());
    }

    #[test]
    fn fingerprint_is_reproducible(closes in arb_closes(60)) {
        let store = BarStore::from_bars("PROP", bars_from(&closes, &[])).unwrap();
        let engine = IndicatorEngine::default();
        prop_assert_eq!(engine.compute(&store).fingerprint(), engine.compute(&store).fingerprint());
    }
}
