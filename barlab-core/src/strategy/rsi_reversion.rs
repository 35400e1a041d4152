//! RSI mean reversion: buy oversold, sell overbought.

use super::{Decision, Strategy};
use crate::domain::Position;
use crate::enrich::TableView;
use crate::indicators::{Indicator, Rsi};

#[derive(Debug, Clone)]
pub struct RsiReversion {
    pub period: usize,
    pub oversold: f64,
    pub overbought: f64,
    name: String,
    key: String,
}

impl RsiReversion {
    pub fn new(period: usize, oversold: f64, overbought: f64) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        assert!(
            (0.0..overbought).contains(&oversold) && overbought <= 100.0,
            "thresholds must satisfy 0 <= oversold < overbought <= 100"
        );
        Self {
            period,
            oversold,
            overbought,
            name: format!("rsi_reversion_{period}"),
            key: format!("rsi_{period}"),
        }
    }
}

impl Default for RsiReversion {
    fn default() -> Self {
        Self::new(14, 30.0, 70.0)
    }
}

impl Strategy for RsiReversion {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![Box::new(Rsi::new(self.period))]
    }

    fn decide(&self, view: &TableView<'_>, position: &Position) -> Decision {
        let Some(rsi) = view.value(&self.key) else {
            return Decision::Hold;
        };
        if position.is_flat() && rsi < self.oversold {
            Decision::enter()
        } else if position.is_long() && rsi > self.overbought {
            Decision::Exit
        } else {
            Decision::Hold
        }
    }
}
