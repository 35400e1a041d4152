//! Bollinger Bands.
//!
//! Middle = SMA(close, window); Upper/Lower = Middle ± k * sample_std(close, window).
//! Width = (Upper - Lower) / Middle.
//! Lookback: window - 1.

use super::rolling::{rolling_mean, rolling_std};
use super::{closes, Indicator};
use crate::domain::Bar;

/// Which Bollinger output line to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
    Width,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    window: usize,
    multiplier: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    pub fn new(window: usize, multiplier: f64, band: BollingerBand) -> Self {
        assert!(window >= 2, "Bollinger window must be >= 2");
        let prefix = match band {
            BollingerBand::Upper => "bb_upper",
            BollingerBand::Middle => "bb_middle",
            BollingerBand::Lower => "bb_lower",
            BollingerBand::Width => "bb_width",
        };
        Self {
            window,
            multiplier,
            band,
            name: format!("{prefix}_{window}_{multiplier}"),
        }
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes = closes(bars);
        let middle = rolling_mean(&closes, self.window);
        if self.band == BollingerBand::Middle {
            return middle;
        }
        let std = rolling_std(&closes, self.window);
        let k = self.multiplier;
        middle
            .iter()
            .zip(&std)
            .map(|(&m, &s)| match self.band {
                BollingerBand::Upper => m + k * s,
                BollingerBand::Lower => m - k * s,
                BollingerBand::Width => 2.0 * k * s / m,
                BollingerBand::Middle => m,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn bands_use_sample_std() {
        // closes 1, 2, 3 → mean 2, sample std 1
        let bars = make_bars(&[1.0, 2.0, 3.0]);
        let upper = Bollinger::new(3, 2.0, BollingerBand::Upper).compute(&bars);
        let middle = Bollinger::new(3, 2.0, BollingerBand::Middle).compute(&bars);
        let lower = Bollinger::new(3, 2.0, BollingerBand::Lower).compute(&bars);
        let width = Bollinger::new(3, 2.0, BollingerBand::Width).compute(&bars);
        assert!(upper[1].is_nan());
        assert_approx(upper[2], 4.0, DEFAULT_EPSILON);
        assert_approx(middle[2], 2.0, DEFAULT_EPSILON);
        assert_approx(lower[2], 0.0, DEFAULT_EPSILON);
        assert_approx(width[2], 2.0, DEFAULT_EPSILON);
    }

    #[test]
    fn flat_series_collapses_bands() {
        let bars = make_bars(&[50.0; 5]);
        let upper = Bollinger::new(3, 2.0, BollingerBand::Upper).compute(&bars);
        let lower = Bollinger::new(3, 2.0, BollingerBand::Lower).compute(&bars);
        assert_approx(upper[4], 50.0, DEFAULT_EPSILON);
        assert_approx(lower[4], 50.0, DEFAULT_EPSILON);
    }

    #[test]
    fn names_and_lookback() {
        let bb = Bollinger::new(20, 2.0, BollingerBand::Upper);
        assert_eq!(bb.name(), "bb_upper_20_2");
        assert_eq!(bb.lookback(), 19);
    }
}
