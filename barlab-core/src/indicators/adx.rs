//! ADX: Average Directional Index (Wilder), with the +DI / -DI lines.
//!
//! 1. +DM / -DM from consecutive high/low deltas (undefined at row 0)
//! 2. RMA-smooth +DM, -DM and TR over `period`
//! 3. ±DI = 100 * smoothed(±DM) / smoothed(TR), 0 when smoothed TR is 0
//! 4. DX = 100 * |+DI - -DI| / (+DI + -DI), 0 when both DI are 0
//! 5. ADX = RMA(DX, period)
//!
//! Lookback: period for the DI lines, 2 * period for ADX.

use super::atr::true_range;
use super::rma::rma_of_series;
use super::Indicator;
use crate::domain::Bar;

/// Which ADX output line to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdxLine {
    PlusDi,
    MinusDi,
    Adx,
}

#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
    line: AdxLine,
    name: String,
}

impl Adx {
    pub fn new(period: usize, line: AdxLine) -> Self {
        assert!(period >= 1, "ADX period must be >= 1");
        let prefix = match line {
            AdxLine::PlusDi => "plus_di",
            AdxLine::MinusDi => "minus_di",
            AdxLine::Adx => "adx",
        };
        Self {
            period,
            line,
            name: format!("{prefix}_{period}"),
        }
    }

    pub fn adx(period: usize) -> Self {
        Self::new(period, AdxLine::Adx)
    }
}

/// All three directional lines, aligned with `bars`.
pub struct DirectionalLines {
    pub plus_di: Vec<f64>,
    pub minus_di: Vec<f64>,
    pub adx: Vec<f64>,
}

pub fn directional_lines(bars: &[Bar], period: usize) -> DirectionalLines {
    let n = bars.len();
    let mut plus_dm = vec![f64::NAN; n];
    let mut minus_dm = vec![f64::NAN; n];
    for i in 1..n {
        let up = bars[i].high - bars[i - 1].high;
        let down = bars[i - 1].low - bars[i].low;
        plus_dm[i] = if up > down && up > 0.0 { up } else { 0.0 };
        minus_dm[i] = if down > up && down > 0.0 { down } else { 0.0 };
    }

    // Align the TR seed with the DM seed at row 1.
    let mut tr = true_range(bars);
    if let Some(first) = tr.first_mut() {
        *first = f64::NAN;
    }

    let smooth_tr = rma_of_series(&tr, period);
    let smooth_plus = rma_of_series(&plus_dm, period);
    let smooth_minus = rma_of_series(&minus_dm, period);

    let mut plus_di = vec![f64::NAN; n];
    let mut minus_di = vec![f64::NAN; n];
    let mut dx = vec![f64::NAN; n];
    for i in 0..n {
        if smooth_tr[i].is_nan() || smooth_plus[i].is_nan() || smooth_minus[i].is_nan() {
            continue;
        }
        let (p, m) = if smooth_tr[i] > 0.0 {
            (
                100.0 * smooth_plus[i] / smooth_tr[i],
                100.0 * smooth_minus[i] / smooth_tr[i],
            )
        } else {
            (0.0, 0.0)
        };
        plus_di[i] = p;
        minus_di[i] = m;
        dx[i] = if p + m > 0.0 {
            100.0 * (p - m).abs() / (p + m)
        } else {
            0.0
        };
    }

    DirectionalLines {
        plus_di,
        minus_di,
        adx: rma_of_series(&dx, period),
    }
}

impl Indicator for Adx {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.line {
            AdxLine::PlusDi | AdxLine::MinusDi => self.period,
            AdxLine::Adx => 2 * self.period,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let lines = directional_lines(bars, self.period);
        match self.line {
            AdxLine::PlusDi => lines.plus_di,
            AdxLine::MinusDi => lines.minus_di,
            AdxLine::Adx => lines.adx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlcv_bars, DEFAULT_EPSILON};

    fn trending(n: usize) -> Vec<Bar> {
        let data: Vec<_> = (0..n)
            .map(|i| {
                let base = 100.0 + i as f64 * 5.0;
                (base - 1.0, base + 3.0, base - 3.0, base + 2.0, 1000.0)
            })
            .collect();
        make_ohlcv_bars(&data)
    }

    #[test]
    fn row_zero_is_undefined() {
        let lines = directional_lines(&trending(5), 3);
        assert!(lines.plus_di[0].is_nan());
        assert!(lines.adx[0].is_nan());
        assert!(!lines.adx[1].is_nan());
    }

    #[test]
    fn known_first_row() {
        // Bar 1 vs bar 0: up = 5, down = -5 → +DM = 5, -DM = 0.
        // TR[1] = max(6, |108-102|, |102-102|) = 6 → +DI = 500/6, -DI = 0, DX = 100.
        let lines = directional_lines(&trending(2), 3);
        assert_approx(lines.plus_di[1], 500.0 / 6.0, DEFAULT_EPSILON);
        assert_approx(lines.minus_di[1], 0.0, DEFAULT_EPSILON);
        assert_approx(lines.adx[1], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn adx_bounds() {
        let bars = make_ohlcv_bars(&[
            (100.0, 105.0, 95.0, 102.0, 1.0),
            (102.0, 108.0, 100.0, 106.0, 1.0),
            (106.0, 107.0, 98.0, 99.0, 1.0),
            (99.0, 103.0, 97.0, 101.0, 1.0),
            (101.0, 106.0, 100.0, 105.0, 1.0),
            (105.0, 110.0, 103.0, 108.0, 1.0),
            (108.0, 112.0, 106.0, 110.0, 1.0),
            (110.0, 111.0, 104.0, 105.0, 1.0),
        ]);
        for line in [AdxLine::PlusDi, AdxLine::MinusDi, AdxLine::Adx] {
            for (i, &v) in Adx::new(3, line).compute(&bars).iter().enumerate() {
                if !v.is_nan() {
                    assert!((0.0..=100.0).contains(&v), "{line:?} out of bounds at {i}: {v}");
                }
            }
        }
    }

    #[test]
    fn flat_bars_give_zero_dx() {
        let bars = make_ohlcv_bars(&[(10.0, 10.0, 10.0, 10.0, 1.0); 6]);
        let adx = Adx::adx(3).compute(&bars);
        assert!(adx[1..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn adx_lookback() {
        assert_eq!(Adx::adx(14).lookback(), 28);
        assert_eq!(Adx::new(14, AdxLine::PlusDi).lookback(), 14);
    }
}
