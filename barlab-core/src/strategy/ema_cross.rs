//! EMA crossover: long on the fast EMA crossing above the slow one, flat on
//! the cross back down.

use super::{crossover, Decision, Strategy};
use crate::domain::Position;
use crate::enrich::TableView;
use crate::indicators::{Ema, Indicator};

#[derive(Debug, Clone)]
pub struct EmaCross {
    pub fast: usize,
    pub slow: usize,
    stake_fraction: Option<f64>,
    name: String,
    fast_key: String,
    slow_key: String,
}

impl EmaCross {
    pub fn new(fast: usize, slow: usize) -> Self {
        assert!(fast >= 1, "fast span must be >= 1");
        assert!(slow > fast, "slow span must be > fast span");
        Self {
            fast,
            slow,
            stake_fraction: None,
            name: format!("ema_cross_{fast}_{slow}"),
            fast_key: format!("ema_{fast}"),
            slow_key: format!("ema_{slow}"),
        }
    }

    /// Commit `stake_fraction` of cash on entry instead of the engine default.
    pub fn with_stake(mut self, stake_fraction: f64) -> Self {
        self.stake_fraction = Some(stake_fraction);
        self
    }
}

impl Default for EmaCross {
    fn default() -> Self {
        Self::new(9, 26)
    }
}

impl Strategy for EmaCross {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![Box::new(Ema::new(self.fast)), Box::new(Ema::new(self.slow))]
    }

    fn decide(&self, view: &TableView<'_>, position: &Position) -> Decision {
        match crossover(view, &self.fast_key, &self.slow_key) {
            Some(true) if position.is_flat() => Decision::Enter {
                stake_fraction: self.stake_fraction,
            },
            Some(false) if position.is_long() => Decision::Exit,
            _ => Decision::Hold,
        }
    }
}
