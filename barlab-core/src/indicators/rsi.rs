//! Relative Strength Index (RSI).
//!
//! Simple trailing averages of gains and losses over `period` close deltas:
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss).
//! Lookback: period (the first delta exists at row 1).
//! Saturation: avg_loss == 0 → RSI = 100, including a flat window.

use super::rolling::rolling_mean;
use super::{closes, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes = closes(bars);
        let n = closes.len();
        let mut gains = vec![f64::NAN; n];
        let mut losses = vec![f64::NAN; n];
        for i in 1..n {
            let delta = closes[i] - closes[i - 1];
            gains[i] = if delta > 0.0 { delta } else { 0.0 };
            losses[i] = if delta < 0.0 { -delta } else { 0.0 };
        }

        let avg_gain = rolling_mean(&gains, self.period);
        let avg_loss = rolling_mean(&losses, self.period);
        avg_gain
            .iter()
            .zip(&avg_loss)
            .map(|(&g, &l)| {
                if g.is_nan() || l.is_nan() {
                    f64::NAN
                } else {
                    ratio_oscillator(g, l)
                }
            })
            .collect()
    }
}

/// Map a positive/negative pair onto [0, 100]: `100 - 100 / (1 + pos / neg)`.
///
/// `neg == 0` saturates to 100 instead of dividing by zero. Shared by RSI and MFI.
pub fn ratio_oscillator(positive: f64, negative: f64) -> f64 {
    if negative == 0.0 {
        return 100.0;
    }
    100.0 - 100.0 / (1.0 + positive / negative)
}
