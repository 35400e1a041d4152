//! Log returns and rolling realized volatility.

use super::rolling::rolling_std;
use super::{closes, Indicator};
use crate::domain::Bar;

/// ln(close[t] / close[t-1]); undefined at row 0.
#[derive(Debug, Clone, Default)]
pub struct LogReturn;

impl LogReturn {
    pub fn new() -> Self {
        Self
    }
}

pub(crate) fn log_returns(closes: &[f64]) -> Vec<f64> {
    let mut out = vec![f64::NAN; closes.len()];
    for i in 1..closes.len() {
        out[i] = (closes[i] / closes[i - 1]).ln();
    }
    out
}

impl Indicator for LogReturn {
    fn name(&self) -> &str {
        "log_return"
    }

    fn lookback(&self) -> usize {
        1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        log_returns(&closes(bars))
    }
}

/// Sample standard deviation of log returns over a trailing window.
#[derive(Debug, Clone)]
pub struct Volatility {
    window: usize,
    name: String,
}

impl Volatility {
    pub fn new(window: usize) -> Self {
        assert!(window >= 2, "volatility window must be >= 2");
        Self {
            window,
            name: format!("volatility_{window}"),
        }
    }
}

impl Indicator for Volatility {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        rolling_std(&log_returns(&closes(bars)), self.window)
    }
}
