//! On-Balance Volume (OBV).
//!
//! OBV[0] = 0; OBV[t] = OBV[t-1] ± volume[t] by the sign of the close change,
//! unchanged when the close is flat.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone, Default)]
pub struct Obv;

impl Obv {
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for Obv {
    fn name(&self) -> &str {
        "obv"
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let mut running = 0.0;
        bars.iter()
            .enumerate()
            .map(|(i, bar)| {
                if i > 0 {
                    let prev = bars[i - 1].close;
                    if bar.close > prev {
                        running += bar.volume;
                    } else if bar.close < prev {
                        running -= bar.volume;
                    }
                }
                running
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_ohlcv_bars;

    #[test]
    fn obv_accumulates_signed_volume() {
        let bars = make_ohlcv_bars(&[
            (10.0, 11.0, 9.0, 10.0, 100.0),
            (10.0, 12.0, 9.0, 11.0, 200.0),
            (11.0, 12.0, 9.0, 10.0, 50.0),
            (10.0, 11.0, 9.0, 10.0, 400.0),
        ]);
        assert_eq!(Obv::new().compute(&bars), vec![0.0, 200.0, 150.0, 150.0]);
    }
}
