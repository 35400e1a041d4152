//! Money Flow Index (MFI).
//!
//! Raw flow = typical_price * volume, signed by the change in typical price
//! (zero change contributes to neither side). Sums over `period` flows then
//! MFI = 100 - 100 / (1 + positive / negative), 100 when negative flow is 0.
//! Lookback: period.

use super::rolling::rolling_sum;
use super::rsi::ratio_oscillator;
use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Mfi {
    period: usize,
    name: String,
}

impl Mfi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "MFI period must be >= 1");
        Self {
            period,
            name: format!("mfi_{period}"),
        }
    }
}

impl Indicator for Mfi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut positive = vec![f64::NAN; n];
        let mut negative = vec![f64::NAN; n];
        for i in 1..n {
            let tp = bars[i].typical_price();
            let prev_tp = bars[i - 1].typical_price();
            let flow = tp * bars[i].volume;
            positive[i] = if tp > prev_tp { flow } else { 0.0 };
            negative[i] = if tp < prev_tp { flow } else { 0.0 };
        }

        let pos_sum = rolling_sum(&positive, self.period);
        let neg_sum = rolling_sum(&negative, self.period);
        pos_sum
            .iter()
            .zip(&neg_sum)
            .map(|(&p, &m)| {
                if p.is_nan() || m.is_nan() {
                    f64::NAN
                } else {
                    ratio_oscillator(p, m)
                }
            })
            .collect()
    }
}
