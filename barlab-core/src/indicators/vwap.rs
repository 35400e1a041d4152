//! Volume-Weighted Average Price, reset at each calendar day.
//!
//! VWAP[t] = sum(typical_price * volume) / sum(volume) over the bars of t's
//! day up to and including t. Undefined while the day's volume is zero.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone, Default)]
pub struct Vwap;

impl Vwap {
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for Vwap {
    fn name(&self) -> &str {
        "vwap"
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let mut day = None;
        let mut pv = 0.0;
        let mut vol = 0.0;
        bars.iter()
            .map(|bar| {
                let date = bar.timestamp.date();
                if day != Some(date) {
                    day = Some(date);
                    pv = 0.0;
                    vol = 0.0;
                }
                pv += bar.typical_price() * bar.volume;
                vol += bar.volume;
                if vol > 0.0 {
                    pv / vol
                } else {
                    f64::NAN
                }
            })
            .collect()
    }
}
