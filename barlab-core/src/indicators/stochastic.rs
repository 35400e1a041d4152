//! Stochastic oscillator.
//!
//! %K = 100 * (close - lowest_low) / (highest_high - lowest_low) over `period`
//! bars, 50 when the range is zero. %D = SMA(%K, smoothing).
//! Lookback: period - 1 for %K, period + smoothing - 2 for %D.

use super::rolling::{rolling_max, rolling_mean, rolling_min};
use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StochasticLine {
    K,
    D,
}

#[derive(Debug, Clone)]
pub struct Stochastic {
    period: usize,
    smoothing: usize,
    line: StochasticLine,
    name: String,
}

impl Stochastic {
    pub fn new(period: usize, smoothing: usize, line: StochasticLine) -> Self {
        assert!(period >= 1, "stochastic period must be >= 1");
        assert!(smoothing >= 1, "stochastic smoothing must be >= 1");
        let prefix = match line {
            StochasticLine::K => "stoch_k",
            StochasticLine::D => "stoch_d",
        };
        Self {
            period,
            smoothing,
            line,
            name: format!("{prefix}_{period}_{smoothing}"),
        }
    }
}

fn percent_k(bars: &[Bar], period: usize) -> Vec<f64> {
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let hh = rolling_max(&highs, period);
    let ll = rolling_min(&lows, period);
    bars.iter()
        .zip(hh.iter().zip(&ll))
        .map(|(bar, (&h, &l))| {
            if h.is_nan() || l.is_nan() {
                f64::NAN
            } else if h - l == 0.0 {
                50.0
            } else {
                100.0 * (bar.close - l) / (h - l)
            }
        })
        .collect()
}

impl Indicator for Stochastic {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.line {
            StochasticLine::K => self.period - 1,
            StochasticLine::D => self.period + self.smoothing - 2,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let k = percent_k(bars, self.period);
        match self.line {
            StochasticLine::K => k,
            StochasticLine::D => rolling_mean(&k, self.smoothing),
        }
    }
}
