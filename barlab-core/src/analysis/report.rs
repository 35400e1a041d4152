//! PerformanceAnalyzer: equity curve in, report out.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::frequency::Frequency;
use super::metrics::{
    annualized_sharpe, max_drawdown_pct, mean, simple_returns, total_return_pct, win_rate_pct,
};
use crate::engine::{ConfigError, EquitySnapshot, RunResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    frequency: Frequency,
    periods_per_year: f64,
}

impl AnalyzerConfig {
    /// `periods_per_year` defaults to the frequency's own factor.
    pub fn new(frequency: Frequency, periods_per_year: Option<f64>) -> Result<Self, ConfigError> {
        let periods_per_year = periods_per_year.unwrap_or_else(|| frequency.periods_per_year());
        if !periods_per_year.is_finite() || periods_per_year <= 0.0 {
            return Err(ConfigError::InvalidPeriodsPerYear(periods_per_year));
        }
        Ok(Self {
            frequency,
            periods_per_year,
        })
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn periods_per_year(&self) -> f64 {
        self.periods_per_year
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            frequency: Frequency::Day,
            periods_per_year: Frequency::Day.periods_per_year(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub frequency: Frequency,
    pub average_period_return_pct: f64,
    /// `None` is rendered as "N/A".
    pub annualized_sharpe: Option<f64>,
    pub max_drawdown_pct: f64,
    pub total_return_pct: f64,
    pub period_count: usize,
    pub trade_count: usize,
    pub win_rate_pct: f64,
    pub final_cash: f64,
    pub equity_curve: Vec<EquitySnapshot>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PerformanceAnalyzer {
    config: AnalyzerConfig,
}

impl PerformanceAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Period returns: the last snapshot of each bucket against the previous
    /// bucket's, with the first snapshot as the opening value.
    pub fn period_returns(&self, curve: &[EquitySnapshot]) -> Vec<f64> {
        let Some(first) = curve.first() else {
            return Vec::new();
        };
        let freq = self.config.frequency;
        let mut closes = vec![first.equity];
        let mut current = None;
        for snap in curve {
            let key = freq.bucket(snap.timestamp);
            if current == Some(key) {
                if let Some(last) = closes.last_mut() {
                    *last = snap.equity;
                }
            } else {
                current = Some(key);
                closes.push(snap.equity);
            }
        }
        simple_returns(&closes)
    }

    /// Metrics of a bare equity curve; trade fields are zero and final cash
    /// is the last equity value.
    pub fn analyze(&self, curve: &[EquitySnapshot]) -> PerformanceReport {
        let returns = self.period_returns(curve);
        let values: Vec<f64> = curve.iter().map(|s| s.equity).collect();
        let first = values.first().copied().unwrap_or(0.0);
        let last = values.last().copied().unwrap_or(first);
        PerformanceReport {
            frequency: self.config.frequency,
            average_period_return_pct: mean(&returns) * 100.0,
            annualized_sharpe: annualized_sharpe(&returns, self.config.periods_per_year),
            max_drawdown_pct: max_drawdown_pct(&values),
            total_return_pct: total_return_pct(first, last),
            period_count: returns.len(),
            trade_count: 0,
            win_rate_pct: 0.0,
            final_cash: last,
            equity_curve: curve.to_vec(),
        }
    }

    pub fn analyze_run(&self, result: &RunResult) -> PerformanceReport {
        let mut report = self.analyze(&result.equity_curve);
        report.total_return_pct = total_return_pct(result.initial_cash, result.final_cash);
        report.trade_count = result.trades.len();
        report.win_rate_pct = win_rate_pct(&result.trades);
        report.final_cash = result.final_cash;
        report
    }
}

impl fmt::Display for PerformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Performance ===")?;
        writeln!(
            f,
            "Average {} return: {:.4}%",
            self.frequency, self.average_period_return_pct
        )?;
        match self.annualized_sharpe {
            Some(s) => writeln!(f, "Annualized Sharpe:  {s:.4}")?,
            None => writeln!(f, "Annualized Sharpe:  N/A")?,
        }
        writeln!(f, "Max drawdown:       {:.2}%", self.max_drawdown_pct)?;
        writeln!(f, "Total return:       {:.2}%", self.total_return_pct)?;
        writeln!(f, "Periods:            {}", self.period_count)?;
        writeln!(
            f,
            "Trades:             {} ({:.1}% winners)",
            self.trade_count, self.win_rate_pct
        )?;
        write!(f, "Final cash:         {:.2}", self.final_cash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn curve(values: &[f64], step: Duration) -> Vec<EquitySnapshot> {
        values
            .iter()
            .enumerate()
            .map(|(i, &equity)| EquitySnapshot {
                timestamp: start() + step * i as i32,
                equity,
                cash: equity,
                position_size: 0.0,
                close: 1.0,
            })
            .collect()
    }

    fn analyzer(freq: Frequency) -> PerformanceAnalyzer {
        PerformanceAnalyzer::new(AnalyzerConfig::new(freq, None).unwrap())
    }

    #[test]
    fn drawdown_scenario() {
        let report = analyzer(Frequency::Bar).analyze(&curve(&[100.0, 110.0, 90.0, 120.0], Duration::days(1)));
        assert_approx(report.max_drawdown_pct, 18.181818181818183, 1e-9);
        assert_approx(report.total_return_pct, 20.0, 1e-9);
    }

    #[test]
    fn daily_buckets_use_last_snapshot() {
        // Two days of hourly snapshots: day 1 ends at 110, day 2 ends at 121
        let mut snaps = curve(&[100.0, 105.0, 110.0], Duration::hours(1));
        let mut day2 = curve(&[115.0, 121.0], Duration::hours(1));
        for s in &mut day2 {
            s.timestamp += Duration::days(1);
        }
        snaps.extend(day2);
        let returns = analyzer(Frequency::Day).period_returns(&snaps);
        assert_eq!(returns.len(), 2);
        assert_approx(returns[0], 0.10, 1e-12);
        assert_approx(returns[1], 0.10, 1e-12);
    }

    #[test]
    fn flat_curve_reports_na() {
        let report = analyzer(Frequency::Day).analyze(&curve(&[600.0; 5], Duration::days(1)));
        assert_eq!(report.annualized_sharpe, None);
        assert_eq!(report.average_period_return_pct, 0.0);
        assert!(report.to_string().contains("Annualized Sharpe:  N/A"));
    }

    #[test]
    fn empty_curve() {
        let report = analyzer(Frequency::Day).analyze(&[]);
        assert_eq!(report.period_count, 0);
        assert_eq!(report.max_drawdown_pct, 0.0);
        assert_eq!(report.annualized_sharpe, None);
    }

    #[test]
    fn periods_per_year_override() {
        let cfg = AnalyzerConfig::new(Frequency::Day, Some(365.0)).unwrap();
        assert_eq!(cfg.periods_per_year(), 365.0);
        assert!(AnalyzerConfig::new(Frequency::Day, Some(0.0)).is_err());
    }

    #[test]
    fn display_block() {
        let report = analyzer(Frequency::Bar).analyze(&curve(&[100.0, 101.0, 103.0, 102.0], Duration::days(1)));
        let text = report.to_string();
        assert!(text.starts_with("=== Performance ==="));
        assert!(text.contains("Max drawdown:"));
        assert!(report.annualized_sharpe.is_some());
    }
}
