//! Performance metrics: pure functions over equity values and trades.

use crate::domain::TradeRecord;

/// Simple returns `v[t] / v[t-1] - 1`; a non-positive base contributes 0.
pub fn simple_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|w| if w[0] > 0.0 { w[1] / w[0] - 1.0 } else { 0.0 })
        .collect()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1).
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// `mean / std × sqrt(periods_per_year)` with a zero risk-free rate.
///
/// `None` with fewer than two returns or zero dispersion.
pub fn annualized_sharpe(returns: &[f64], periods_per_year: f64) -> Option<f64> {
    if returns.len() < 2 {
        return None;
    }
    let std = sample_std(returns);
    if !std.is_finite() || std < 1e-15 {
        return None;
    }
    let sharpe = mean(returns) / std * periods_per_year.sqrt();
    sharpe.is_finite().then_some(sharpe)
}

/// Largest peak-to-trough decline as a positive percentage of the peak.
pub fn max_drawdown_pct(values: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;
    for &v in values {
        if v > peak {
            peak = v;
        }
        if peak > 0.0 {
            max_dd = max_dd.max((peak - v) / peak);
        }
    }
    max_dd * 100.0
}

pub fn total_return_pct(initial: f64, final_value: f64) -> f64 {
    if initial <= 0.0 {
        return 0.0;
    }
    (final_value / initial - 1.0) * 100.0
}

/// Share of trades with positive net PnL, in percent.
pub fn win_rate_pct(trades: &[TradeRecord]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let winners = trades.iter().filter(|t| t.is_winner()).count();
    winners as f64 / trades.len() as f64 * 100.0
}
