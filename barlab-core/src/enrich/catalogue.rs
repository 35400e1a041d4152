//! The indicator catalogue and its parameters.

use serde::{Deserialize, Serialize};

use crate::engine::ConfigError;
use crate::indicators::{
    Adx, AdxLine, Atr, Bollinger, BollingerBand, Ema, HighLowRange, Indicator, Kama, LogReturn,
    Macd, MacdLine, Mfi, Obv, Rsi, Sma, Stochastic, StochasticLine, Volatility, Vwap,
};

/// Parameters for every catalogue indicator.
///
/// All fields default, so a partial `[indicators]` table only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub ema_spans: Vec<usize>,
    pub sma_window: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub rsi_period: usize,
    pub atr_period: usize,
    pub adx_period: usize,
    pub bollinger_window: usize,
    pub bollinger_k: f64,
    pub mfi_period: usize,
    pub stochastic_period: usize,
    pub stochastic_smoothing: usize,
    pub kama_period: usize,
    pub kama_fast: usize,
    pub kama_slow: usize,
    pub volatility_window: usize,
    pub range_window: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ema_spans: vec![9, 12, 26],
            sma_window: 12,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            rsi_period: 14,
            atr_period: 14,
            adx_period: 14,
            bollinger_window: 20,
            bollinger_k: 2.0,
            mfi_period: 14,
            stochastic_period: 14,
            stochastic_smoothing: 3,
            kama_period: 10,
            kama_fast: 2,
            kama_slow: 30,
            volatility_window: 12,
            range_window: 12,
        }
    }
}

fn at_least(name: &'static str, value: usize, min: usize) -> Result<(), ConfigError> {
    if value < min {
        return Err(ConfigError::ParameterTooSmall { name, min, value });
    }
    Ok(())
}

impl IndicatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for &span in &self.ema_spans {
            at_least("ema span", span, 1)?;
        }
        let mut spans = self.ema_spans.clone();
        spans.sort_unstable();
        if spans.windows(2).any(|w| w[0] == w[1]) {
            return Err(ConfigError::Inconsistent(format!(
                "duplicate ema span in {:?}",
                self.ema_spans
            )));
        }

        at_least("sma_window", self.sma_window, 1)?;
        at_least("macd_fast", self.macd_fast, 1)?;
        at_least("macd_signal", self.macd_signal, 1)?;
        if self.macd_fast >= self.macd_slow {
            return Err(ConfigError::Inconsistent(format!(
                "macd_fast ({}) must be below macd_slow ({})",
                self.macd_fast, self.macd_slow
            )));
        }
        at_least("rsi_period", self.rsi_period, 1)?;
        at_least("atr_period", self.atr_period, 1)?;
        at_least("adx_period", self.adx_period, 1)?;
        at_least("bollinger_window", self.bollinger_window, 2)?;
        if !self.bollinger_k.is_finite() || self.bollinger_k <= 0.0 {
            return Err(ConfigError::InvalidMultiplier {
                name: "bollinger_k",
                value: self.bollinger_k,
            });
        }
        at_least("mfi_period", self.mfi_period, 1)?;
        at_least("stochastic_period", self.stochastic_period, 1)?;
        at_least("stochastic_smoothing", self.stochastic_smoothing, 1)?;
        at_least("kama_period", self.kama_period, 1)?;
        at_least("kama_fast", self.kama_fast, 1)?;
        if self.kama_fast >= self.kama_slow {
            return Err(ConfigError::Inconsistent(format!(
                "kama_fast ({}) must be below kama_slow ({})",
                self.kama_fast, self.kama_slow
            )));
        }
        at_least("volatility_window", self.volatility_window, 2)?;
        at_least("range_window", self.range_window, 1)?;
        Ok(())
    }

    /// Instantiate the catalogue in output column order.
    pub fn build(&self) -> Result<Vec<Box<dyn Indicator>>, ConfigError> {
        self.validate()?;

        let mut out: Vec<Box<dyn Indicator>> = vec![
            Box::new(LogReturn::new()),
            Box::new(Sma::new(self.sma_window)),
        ];
        for &span in &self.ema_spans {
            out.push(Box::new(Ema::new(span)));
        }
        for line in [MacdLine::Macd, MacdLine::Signal, MacdLine::Histogram] {
            out.push(Box::new(Macd::new(
                self.macd_fast,
                self.macd_slow,
                self.macd_signal,
                line,
            )));
        }
        out.push(Box::new(Rsi::new(self.rsi_period)));
        out.push(Box::new(Volatility::new(self.volatility_window)));
        out.push(Box::new(HighLowRange::new(self.range_window)));
        out.push(Box::new(Atr::new(self.atr_period)));
        for line in [AdxLine::PlusDi, AdxLine::MinusDi, AdxLine::Adx] {
            out.push(Box::new(Adx::new(self.adx_period, line)));
        }
        out.push(Box::new(Vwap::new()));
        for band in [
            BollingerBand::Upper,
            BollingerBand::Middle,
            BollingerBand::Lower,
            BollingerBand::Width,
        ] {
            out.push(Box::new(Bollinger::new(
                self.bollinger_window,
                self.bollinger_k,
                band,
            )));
        }
        out.push(Box::new(Obv::new()));
        out.push(Box::new(Mfi::new(self.mfi_period)));
        for line in [StochasticLine::K, StochasticLine::D] {
            out.push(Box::new(Stochastic::new(
                self.stochastic_period,
                self.stochastic_smoothing,
                line,
            )));
        }
        out.push(Box::new(Kama::new(
            self.kama_period,
            self.kama_fast,
            self.kama_slow,
        )));
        Ok(out)
    }
}
