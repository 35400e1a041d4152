//! Average True Range (ATR) and the high-low range mean.
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|), TR[0] = high-low.
//! ATR = RMA(TR, period), seeded with TR[0].
//! Lookback: period.

use super::rma::rma_of_series;
use super::rolling::rolling_mean;
use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("atr_{period}"),
        }
    }
}

/// Compute the True Range series from bars.
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let hl = bar.high - bar.low;
            if i == 0 {
                return hl;
            }
            let pc = bars[i - 1].close;
            hl.max((bar.high - pc).abs()).max((bar.low - pc).abs())
        })
        .collect()
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        rma_of_series(&true_range(bars), self.period)
    }
}

/// Trailing mean of `high - low`, a cheap volatility proxy that ignores gaps.
#[derive(Debug, Clone)]
pub struct HighLowRange {
    window: usize,
    name: String,
}

impl HighLowRange {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "range window must be >= 1");
        Self {
            window,
            name: format!("hl_range_{window}"),
        }
    }
}

impl Indicator for HighLowRange {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let ranges: Vec<f64> = bars.iter().map(|b| b.high - b.low).collect();
        rolling_mean(&ranges, self.window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlcv_bars, DEFAULT_EPSILON};

    fn sample() -> Vec<Bar> {
        make_ohlcv_bars(&[
            (100.0, 105.0, 95.0, 102.0, 1.0),  // TR = 10
            (102.0, 108.0, 100.0, 106.0, 1.0), // TR = max(8, 6, 2) = 8
            (106.0, 107.0, 98.0, 99.0, 1.0),   // TR = max(9, 1, 8) = 9
            (99.0, 103.0, 97.0, 101.0, 1.0),   // TR = max(6, 4, 2) = 6
        ])
    }

    #[test]
    fn true_range_basic() {
        let tr = true_range(&sample());
        assert_eq!(tr, vec![10.0, 8.0, 9.0, 6.0]);
    }

    #[test]
    fn true_range_gap_up() {
        let bars = make_ohlcv_bars(&[
            (98.0, 102.0, 97.0, 100.0, 1.0),
            (110.0, 115.0, 108.0, 112.0, 1.0), // max(7, 15, 8) = 15
        ]);
        assert_approx(true_range(&bars)[1], 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_is_rma_of_true_range() {
        // alpha = 1/2: 10, 9, 9, 7.5
        let result = Atr::new(2).compute(&sample());
        assert_approx(result[0], 10.0, DEFAULT_EPSILON);
        assert_approx(result[1], 9.0, DEFAULT_EPSILON);
        assert_approx(result[2], 9.0, DEFAULT_EPSILON);
        assert_approx(result[3], 7.5, DEFAULT_EPSILON);
    }

    #[test]
    fn high_low_range_mean() {
        // ranges 10, 8, 9, 6
        let result = HighLowRange::new(2).compute(&sample());
        assert!(result[0].is_nan());
        assert_approx(result[1], 9.0, DEFAULT_EPSILON);
        assert_approx(result[3], 7.5, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_lookback() {
        assert_eq!(Atr::new(14).lookback(), 14);
        assert_eq!(HighLowRange::new(12).lookback(), 11);
    }
}
