//! Serializable run configuration, parsed from TOML.
//!
//! ```toml
//! [backtest]
//! symbol = "BTCUSDT"
//! initial_cash = 600.0
//! commission_rate = 0.001
//! stake_fraction = 0.95
//!
//! [analysis]
//! frequency = "day"
//!
//! [indicators]
//! ema_spans = [9, 12, 26]
//!
//! [warmup]
//! policy = "fixed"
//! bars = 26
//!
//! [strategy]
//! type = "ema_cross"
//! fast = 9
//! slow = 26
//! ```
//!
//! Every section except `[backtest]` may be omitted.

use std::path::{Path, PathBuf};

use barlab_core::analysis::{AnalyzerConfig, Frequency};
use barlab_core::engine::EngineConfig;
use barlab_core::enrich::{IndicatorConfig, WarmupPolicy};
use barlab_core::strategy::{EmaCross, RsiReversion, Strategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Content-addressable identifier of a run configuration.
pub type RunId = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] barlab_core::ConfigError),

    #[error("[backtest] symbol must not be empty")]
    EmptySymbol,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub backtest: BacktestSection,
    #[serde(default)]
    pub analysis: AnalysisSection,
    #[serde(default)]
    pub indicators: IndicatorConfig,
    #[serde(default)]
    pub warmup: WarmupPolicy,
    #[serde(default)]
    pub strategy: StrategyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSection {
    pub symbol: String,
    #[serde(default = "default_initial_cash")]
    pub initial_cash: f64,
    #[serde(default = "default_commission_rate")]
    pub commission_rate: f64,
    #[serde(default = "default_stake_fraction")]
    pub stake_fraction: f64,
}

fn default_initial_cash() -> f64 {
    600.0
}

fn default_commission_rate() -> f64 {
    0.001
}

fn default_stake_fraction() -> f64 {
    0.95
}

impl BacktestSection {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            initial_cash: default_initial_cash(),
            commission_rate: default_commission_rate(),
            stake_fraction: default_stake_fraction(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisSection {
    #[serde(default)]
    pub frequency: Frequency,
    /// Overrides the frequency's own annualization factor.
    #[serde(default)]
    pub periods_per_year: Option<f64>,
}

/// Which built-in strategy to run, with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyConfig {
    EmaCross {
        fast: usize,
        slow: usize,
        /// Per-entry stake; the `[backtest]` default when absent.
        #[serde(default)]
        stake_fraction: Option<f64>,
    },
    RsiReversion {
        period: usize,
        oversold: f64,
        overbought: f64,
    },
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig::EmaCross {
            fast: 9,
            slow: 26,
            stake_fraction: None,
        }
    }
}

impl StrategyConfig {
    /// Check parameters, then instantiate the strategy.
    pub fn build(&self) -> Result<Box<dyn Strategy>, barlab_core::ConfigError> {
        use barlab_core::ConfigError as Invalid;

        match *self {
            StrategyConfig::EmaCross {
                fast,
                slow,
                stake_fraction,
            } => {
                if fast < 1 {
                    return Err(Invalid::ParameterTooSmall {
                        name: "fast",
                        min: 1,
                        value: fast,
                    });
                }
                if slow <= fast {
                    return Err(Invalid::Inconsistent(format!(
                        "slow span ({slow}) must exceed fast span ({fast})"
                    )));
                }
                let mut strategy = EmaCross::new(fast, slow);
                if let Some(stake) = stake_fraction {
                    if !(stake > 0.0 && stake <= 1.0) {
                        return Err(Invalid::InvalidStake(stake));
                    }
                    strategy = strategy.with_stake(stake);
                }
                Ok(Box::new(strategy))
            }
            StrategyConfig::RsiReversion {
                period,
                oversold,
                overbought,
            } => {
                if period < 1 {
                    return Err(Invalid::ParameterTooSmall {
                        name: "period",
                        min: 1,
                        value: period,
                    });
                }
                if !(0.0 <= oversold && oversold < overbought && overbought <= 100.0) {
                    return Err(Invalid::Inconsistent(format!(
                        "thresholds must satisfy 0 <= oversold ({oversold}) < overbought ({overbought}) <= 100"
                    )));
                }
                Ok(Box::new(RsiReversion::new(period, oversold, overbought)))
            }
        }
    }
}

/// Core configuration derived from a checked [`RunConfig`].
pub struct ValidatedConfig {
    pub engine: EngineConfig,
    pub analyzer: AnalyzerConfig,
    pub strategy: Box<dyn Strategy>,
}

impl RunConfig {
    /// Default settings for `symbol`.
    pub fn for_symbol(symbol: impl Into<String>) -> Self {
        Self {
            backtest: BacktestSection::new(symbol),
            analysis: AnalysisSection::default(),
            indicators: IndicatorConfig::default(),
            warmup: WarmupPolicy::default(),
            strategy: StrategyConfig::default(),
        }
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Check every section and build the core configs.
    pub fn validate(&self) -> Result<ValidatedConfig, ConfigError> {
        if self.backtest.symbol.trim().is_empty() {
            return Err(ConfigError::EmptySymbol);
        }
        let engine = EngineConfig::new(
            self.backtest.initial_cash,
            self.backtest.commission_rate,
            self.backtest.stake_fraction,
        )?;
        let analyzer =
            AnalyzerConfig::new(self.analysis.frequency, self.analysis.periods_per_year)?;
        self.indicators.validate()?;
        let strategy = self.strategy.build()?;
        Ok(ValidatedConfig {
            engine,
            analyzer,
            strategy,
        })
    }

    /// BLAKE3 of the canonical JSON encoding.
    ///
    /// Identical configurations share a run id.
    pub fn run_id(&self) -> RunId {
        // Plain data with string keys; JSON encoding has no failure path here.
        let json = serde_json::to_vec(self).unwrap_or_default();
        blake3::hash(&json).to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[backtest]
symbol = "BTCUSDT"
initial_cash = 1000.0
commission_rate = 0.0005
stake_fraction = 0.5

[analysis]
frequency = "hour"
periods_per_year = 8760.0

[indicators]
ema_spans = [5, 20]
rsi_period = 7

[warmup]
policy = "fixed"
bars = 30

[strategy]
type = "rsi_reversion"
period = 7
oversold = 25.0
overbought = 75.0
"#;

    #[test]
    fn parses_every_section() {
        let config = RunConfig::from_toml(FULL).unwrap();
        assert_eq!(config.backtest.symbol, "BTCUSDT");
        assert_eq!(config.backtest.stake_fraction, 0.5);
        assert_eq!(config.analysis.frequency, Frequency::Hour);
        assert_eq!(config.analysis.periods_per_year, Some(8760.0));
        assert_eq!(config.indicators.ema_spans, vec![5, 20]);
        assert_eq!(config.indicators.rsi_period, 7);
        assert_eq!(config.indicators.macd_slow, 26);
        assert_eq!(config.warmup, WarmupPolicy::Fixed(30));
        assert_eq!(
            config.strategy,
            StrategyConfig::RsiReversion {
                period: 7,
                oversold: 25.0,
                overbought: 75.0
            }
        );
        let validated = config.validate().unwrap();
        assert_eq!(validated.strategy.name(), "rsi_reversion_7");
        assert_eq!(validated.analyzer.periods_per_year(), 8760.0);
    }

    #[test]
    fn minimal_config_takes_defaults() {
        let config = RunConfig::from_toml("[backtest]\nsymbol = \"ETH\"\n").unwrap();
        assert_eq!(config, RunConfig::for_symbol("ETH"));
        assert_eq!(config.backtest.initial_cash, 600.0);
        assert_eq!(config.warmup, WarmupPolicy::MaxLookback);
        assert_eq!(config.validate().unwrap().strategy.name(), "ema_cross_9_26");
    }

    #[test]
    fn unit_warmup_policy_needs_no_bars() {
        let config =
            RunConfig::from_toml("[backtest]\nsymbol = \"X\"\n[warmup]\npolicy = \"mask_per_column\"\n")
                .unwrap();
        assert_eq!(config.warmup, WarmupPolicy::MaskPerColumn);
    }

    #[test]
    fn missing_backtest_section_is_a_toml_error() {
        assert!(matches!(
            RunConfig::from_toml("[analysis]\nfrequency = \"day\"\n"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = RunConfig::for_symbol("X");
        config.backtest.stake_fraction = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid(barlab_core::ConfigError::InvalidStake(_)))
        ));

        let mut config = RunConfig::for_symbol("X");
        config.strategy = StrategyConfig::EmaCross {
            fast: 26,
            slow: 9,
            stake_fraction: None,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid(barlab_core::ConfigError::Inconsistent(_)))
        ));

        let config = RunConfig::for_symbol("  ");
        assert!(matches!(config.validate(), Err(ConfigError::EmptySymbol)));
    }

    #[test]
    fn run_id_is_deterministic_and_parameter_sensitive() {
        let a = RunConfig::for_symbol("X");
        let mut b = a.clone();
        assert_eq!(a.run_id(), b.run_id());
        b.backtest.commission_rate = 0.002;
        assert_ne!(a.run_id(), b.run_id());
        assert_eq!(a.run_id().len(), 64);
    }
}
