//! StrategyContract: the per-bar decision unit.
//!
//! A strategy sees the enriched history up to and including the current bar
//! plus the current position, and answers with at most one intent. New
//! strategies plug in without touching the engine.

pub mod ema_cross;
pub mod rsi_reversion;

pub use ema_cross::EmaCross;
pub use rsi_reversion::RsiReversion;

use serde::{Deserialize, Serialize};

use crate::domain::Position;
use crate::enrich::TableView;
use crate::indicators::Indicator;

/// What a strategy wants done on the current bar.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Decision {
    #[default]
    Hold,
    /// Open or add to a long position. `None` uses the engine's default stake.
    Enter { stake_fraction: Option<f64> },
    /// Liquidate the whole position.
    Exit,
}

impl Decision {
    pub fn enter() -> Self {
        Decision::Enter {
            stake_fraction: None,
        }
    }

    pub fn enter_with(stake_fraction: f64) -> Self {
        Decision::Enter {
            stake_fraction: Some(stake_fraction),
        }
    }
}

pub trait Strategy: Send + Sync {
    /// Human-readable name (e.g., "ema_cross_9_26").
    fn name(&self) -> &str;

    /// Indicator columns this strategy reads; the runner adds any missing ones.
    fn required_indicators(&self) -> Vec<Box<dyn Indicator>> {
        Vec::new()
    }

    /// Decide for the current bar.
    ///
    /// The view only exposes rows up to the current one. An undefined
    /// indicator value must be read as "no signal".
    fn decide(&self, view: &TableView<'_>, position: &Position) -> Decision;
}

/// Strict sign flip of `fast - slow` at the current row.
///
/// The current difference is compared with the last non-zero difference
/// before it, so a row where the two series are equal neither starts nor
/// completes a cross. `Some(true)` on a flip from negative to positive,
/// `Some(false)` on a flip from positive to negative, `None` otherwise or
/// when any input on the way back is undefined.
pub fn crossover(view: &TableView<'_>, fast: &str, slow: &str) -> Option<bool> {
    let diff_at = |i: usize| Some(view.value_at(fast, i)? - view.value_at(slow, i)?);
    let cur = diff_at(view.index())?;
    if cur == 0.0 {
        return None;
    }
    let mut i = view.index();
    let prev = loop {
        i = i.checked_sub(1)?;
        let d = diff_at(i)?;
        if d != 0.0 {
            break d;
        }
    };
    if prev < 0.0 && cur > 0.0 {
        Some(true)
    } else if prev > 0.0 && cur < 0.0 {
        Some(false)
    } else {
        None
    }
}
