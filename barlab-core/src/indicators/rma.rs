//! Wilder's moving average (RMA): EMA with alpha = 1 / period, self-seeded.

use super::ema::exponential_smooth;
use super::{closes, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Rma {
    period: usize,
    name: String,
}

impl Rma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RMA period must be >= 1");
        Self {
            period,
            name: format!("rma_{period}"),
        }
    }
}

impl Indicator for Rma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        rma_of_series(&closes(bars), self.period)
    }
}

/// RMA of an arbitrary series (true range, directional movement, DX).
pub fn rma_of_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return vec![f64::NAN; values.len()];
    }
    exponential_smooth(values, 1.0 / period as f64)
}
