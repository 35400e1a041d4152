//! barlab core: indicator computation and backtest simulation.
//!
//! - Domain types (bars, orders, positions, fills, trades)
//! - `BarStore`: validated, append-only bar sequence plus its CSV codec
//! - Indicator library and the `IndicatorEngine` that materializes an `EnrichedTable`
//! - Order lifecycle, broker and the bar-by-bar `BacktestEngine`
//! - Strategy trait with built-in strategies
//! - Performance analysis of the resulting equity curve

pub mod analysis;
pub mod data;
pub mod domain;
pub mod engine;
pub mod enrich;
pub mod indicators;
pub mod strategy;

pub use analysis::{AnalyzerConfig, Frequency, PerformanceAnalyzer, PerformanceReport};
pub use data::{BarStore, DataError};
pub use domain::{Bar, BarError};
pub use engine::{BacktestEngine, ConfigError, EngineConfig, RunResult};
pub use enrich::{EnrichedTable, IndicatorConfig, IndicatorEngine, WarmupPolicy};
pub use strategy::{Decision, Strategy};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types handed across threads are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<data::BarStore>();
        require_sync::<data::BarStore>();
        require_send::<domain::Order>();
        require_sync::<domain::Order>();
        require_send::<domain::Position>();
        require_sync::<domain::Position>();
        require_send::<domain::FillEvent>();
        require_sync::<domain::FillEvent>();
        require_send::<domain::TradeRecord>();
        require_sync::<domain::TradeRecord>();

        require_send::<enrich::EnrichedTable>();
        require_sync::<enrich::EnrichedTable>();
        require_send::<enrich::IndicatorEngine>();
        require_sync::<enrich::IndicatorEngine>();

        require_send::<engine::EngineConfig>();
        require_sync::<engine::EngineConfig>();
        require_send::<engine::RunResult>();
        require_sync::<engine::RunResult>();
        require_send::<analysis::PerformanceReport>();
        require_sync::<analysis::PerformanceReport>();

        require_send::<strategy::EmaCross>();
        require_sync::<strategy::EmaCross>();
        require_send::<strategy::RsiReversion>();
        require_sync::<strategy::RsiReversion>();
    }

    /// Strategies see a bounded view and the position, never the broker.
    #[test]
    fn strategy_trait_has_no_broker_parameter() {
        fn _check_trait_object_builds(
            s: &dyn Strategy,
            view: &enrich::TableView<'_>,
            position: &domain::Position,
        ) -> Decision {
            s.decide(view, position)
        }
    }
}
