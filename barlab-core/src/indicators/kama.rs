//! Kaufman Adaptive Moving Average (KAMA).
//!
//! ER = |close[t] - close[t-w]| / sum(|close[j] - close[j-1]|) over the last w
//! changes, with w = min(t, period) so the series is defined from row 0.
//! sc = (ER * (fast_sc - slow_sc) + slow_sc)^2, fast_sc = 2/(fast+1), slow_sc = 2/(slow+1).
//! KAMA[0] = close[0]; KAMA[t] = KAMA[t-1] + sc * (close[t] - KAMA[t-1]).
//! Lookback: period.

use super::{closes, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Kama {
    period: usize,
    fast_sc: f64,
    slow_sc: f64,
    name: String,
}

impl Kama {
    pub fn new(period: usize, fast: usize, slow: usize) -> Self {
        assert!(period >= 1, "KAMA period must be >= 1");
        assert!(fast >= 1 && fast < slow, "KAMA needs 1 <= fast < slow");
        Self {
            period,
            fast_sc: 2.0 / (fast as f64 + 1.0),
            slow_sc: 2.0 / (slow as f64 + 1.0),
            name: format!("kama_{period}_{fast}_{slow}"),
        }
    }

    fn efficiency_ratio(closes: &[f64], i: usize, window: usize) -> f64 {
        let change = (closes[i] - closes[i - window]).abs();
        let volatility: f64 = (i + 1 - window..=i)
            .map(|j| (closes[j] - closes[j - 1]).abs())
            .sum();
        if volatility == 0.0 {
            0.0
        } else {
            change / volatility
        }
    }
}

impl Indicator for Kama {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes = closes(bars);
        let mut result = Vec::with_capacity(closes.len());
        let Some(&first) = closes.first() else {
            return result;
        };
        result.push(first);
        let mut kama = first;
        for i in 1..closes.len() {
            let window = i.min(self.period);
            let er = Self::efficiency_ratio(&closes, i, window);
            let sc = (er * (self.fast_sc - self.slow_sc) + self.slow_sc).powi(2);
            kama += sc * (closes[i] - kama);
            result.push(kama);
        }
        result
    }
}
