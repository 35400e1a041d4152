//! Indicator library.
//!
//! Every indicator implements `Indicator`: bar history in, one aligned
//! `Vec<f64>` out, with `f64::NAN` marking rows that are undefined
//! (insufficient warmup). Multi-series indicators (MACD, Bollinger, ADX,
//! Stochastic) are exposed as one named instance per output line, so the
//! single-series trait stays unchanged.
//!
//! The `*_of_series` / `rolling_*` helpers are the building blocks the
//! indicators compose, and can be applied to any derived series.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod kama;
pub mod macd;
pub mod mfi;
pub mod obv;
pub mod returns;
pub mod rma;
pub mod rolling;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod vwap;

pub use adx::{Adx, AdxLine};
pub use atr::{true_range, Atr, HighLowRange};
pub use bollinger::{Bollinger, BollingerBand};
pub use ema::{ema_of_series, Ema};
pub use kama::Kama;
pub use macd::{Macd, MacdLine};
pub use mfi::Mfi;
pub use obv::Obv;
pub use returns::{LogReturn, Volatility};
pub use rma::{rma_of_series, Rma};
pub use rsi::{ratio_oscillator, Rsi};
pub use sma::Sma;
pub use stochastic::{Stochastic, StochasticLine};
pub use vwap::Vwap;

use crate::domain::Bar;

/// A pure, stateless-per-call transform from bars to one aligned series.
///
/// # Look-ahead contamination guard
/// No value at row t may depend on bars after t: computing on `bars[..=t]`
/// and on the full series must agree on every row up to t.
pub trait Indicator: Send + Sync {
    /// Column name in the enriched table (e.g. "ema_9", "rsi_14").
    fn name(&self) -> &str;

    /// Number of leading rows that are undefined or conventionally unreliable.
    ///
    /// Rolling-window indicators return `window - 1` (their first defined
    /// row); self-seeded EMA/RMA-family indicators are defined earlier but
    /// still report their span so warmup trimming can drop the unreliable prefix.
    fn lookback(&self) -> usize;

    /// Compute the series for the whole bar slice.
    ///
    /// The result has exactly `bars.len()` entries.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

pub(crate) fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Create synthetic daily bars from close prices for testing.
///
/// open = prev close (or close for the first bar), high = max(open, close) + 1,
/// low = min(open, close) - 1, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(16, 0, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                timestamp: base + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Build bars from explicit (open, high, low, close, volume) tuples, one day apart.
#[cfg(test)]
pub fn make_ohlcv_bars(data: &[(f64, f64, f64, f64, f64)]) -> Vec<Bar> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(16, 0, 0)
        .unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close, volume))| Bar {
            timestamp: base + chrono::Duration::days(i as i64),
            open,
            high,
            low,
            close,
            volume,
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
