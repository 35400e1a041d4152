//! IndicatorEngine: computes the configured catalogue into an `EnrichedTable`.
//!
//! All columns are materialized before a backtest starts; the engine never
//! recomputes mid-run. Appending bars to a store means computing a fresh table.

pub mod catalogue;
pub mod table;
pub mod warmup;

pub use catalogue::IndicatorConfig;
pub use table::{Column, EnrichedRow, EnrichedTable, TableView};
pub use warmup::WarmupPolicy;

use rayon::prelude::*;
use tracing::debug;

use crate::data::BarStore;
use crate::engine::ConfigError;
use crate::indicators::Indicator;

pub struct IndicatorEngine {
    indicators: Vec<Box<dyn Indicator>>,
}

impl IndicatorEngine {
    pub fn new(indicators: Vec<Box<dyn Indicator>>) -> Self {
        Self { indicators }
    }

    pub fn from_config(config: &IndicatorConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.build()?))
    }

    pub fn indicators(&self) -> &[Box<dyn Indicator>] {
        &self.indicators
    }

    /// Widest lookback across the catalogue.
    pub fn max_lookback(&self) -> usize {
        self.indicators.iter().map(|i| i.lookback()).max().unwrap_or(0)
    }

    /// Compute every column for `store`.
    ///
    /// Columns run in parallel; output order is the catalogue order.
    pub fn compute(&self, store: &BarStore) -> EnrichedTable {
        let bars = store.bars();
        let columns: Vec<Column> = self
            .indicators
            .par_iter()
            .map(|indicator| {
                let values = indicator.compute(bars);
                debug_assert_eq!(
                    values.len(),
                    bars.len(),
                    "indicator '{}' produced {} values for {} bars",
                    indicator.name(),
                    values.len(),
                    bars.len()
                );
                Column::new(indicator.name(), indicator.lookback(), values)
            })
            .collect();

        debug!(
            symbol = store.symbol(),
            bars = bars.len(),
            columns = columns.len(),
            "indicators computed"
        );
        EnrichedTable::new(store.symbol(), bars.to_vec(), columns)
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new(IndicatorConfig::default().build().unwrap_or_default())
    }
}
