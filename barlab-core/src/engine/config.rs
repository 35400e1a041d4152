//! Engine configuration, validated at construction.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A configuration value outside its allowed range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("initial cash must be positive and finite, got {0}")]
    InvalidCash(f64),

    #[error("commission rate must be non-negative and finite, got {0}")]
    InvalidCommission(f64),

    #[error("stake fraction must be in (0, 1], got {0}")]
    InvalidStake(f64),

    #[error("periods per year must be positive and finite, got {0}")]
    InvalidPeriodsPerYear(f64),

    #[error("{name} must be at least {min}, got {value}")]
    ParameterTooSmall {
        name: &'static str,
        min: usize,
        value: usize,
    },

    #[error("{name} must be positive and finite, got {value}")]
    InvalidMultiplier { name: &'static str, value: f64 },

    #[error("{0}")]
    Inconsistent(String),
}

/// Broker and loop settings for one backtest run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    initial_cash: f64,
    commission_rate: f64,
    /// Default fraction of cash committed on entry; strategies may override per decision.
    stake_fraction: f64,
    /// Bars at the start of the run on which the strategy is not consulted.
    warmup_bars: usize,
}

impl EngineConfig {
    pub fn new(
        initial_cash: f64,
        commission_rate: f64,
        stake_fraction: f64,
    ) -> Result<Self, ConfigError> {
        if !initial_cash.is_finite() || initial_cash <= 0.0 {
            return Err(ConfigError::InvalidCash(initial_cash));
        }
        if !commission_rate.is_finite() || commission_rate < 0.0 {
            return Err(ConfigError::InvalidCommission(commission_rate));
        }
        validate_stake(stake_fraction)?;
        Ok(Self {
            initial_cash,
            commission_rate,
            stake_fraction,
            warmup_bars: 0,
        })
    }

    pub fn with_warmup(mut self, warmup_bars: usize) -> Self {
        self.warmup_bars = warmup_bars;
        self
    }

    pub fn initial_cash(&self) -> f64 {
        self.initial_cash
    }

    pub fn commission_rate(&self) -> f64 {
        self.commission_rate
    }

    pub fn stake_fraction(&self) -> f64 {
        self.stake_fraction
    }

    pub fn warmup_bars(&self) -> usize {
        self.warmup_bars
    }
}

impl Default for EngineConfig {
    /// 600 cash, 0.1% commission, 95% stake.
    fn default() -> Self {
        Self {
            initial_cash: 600.0,
            commission_rate: 0.001,
            stake_fraction: 0.95,
            warmup_bars: 0,
        }
    }
}

pub(crate) fn validate_stake(stake_fraction: f64) -> Result<(), ConfigError> {
    if stake_fraction.is_finite() && stake_fraction > 0.0 && stake_fraction <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidStake(stake_fraction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_values() {
        let cfg = EngineConfig::new(600.0, 0.001, 0.95).unwrap().with_warmup(26);
        assert_eq!(cfg.initial_cash(), 600.0);
        assert_eq!(cfg.warmup_bars(), 26);
    }

    #[test]
    fn rejects_bad_cash() {
        assert_eq!(
            EngineConfig::new(0.0, 0.0, 0.5),
            Err(ConfigError::InvalidCash(0.0))
        );
        assert!(EngineConfig::new(f64::INFINITY, 0.0, 0.5).is_err());
    }

    #[test]
    fn rejects_negative_commission() {
        assert_eq!(
            EngineConfig::new(100.0, -0.01, 0.5),
            Err(ConfigError::InvalidCommission(-0.01))
        );
    }

    #[test]
    fn stake_bounds() {
        assert!(EngineConfig::new(100.0, 0.0, 1.0).is_ok());
        assert!(EngineConfig::new(100.0, 0.0, 0.0).is_err());
        assert!(EngineConfig::new(100.0, 0.0, 1.01).is_err());
        assert!(EngineConfig::new(100.0, 0.0, f64::NAN).is_err());
    }
}
