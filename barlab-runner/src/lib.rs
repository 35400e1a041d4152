//! barlab runner: backtest orchestration on top of `barlab-core`.
//!
//! - TOML run configuration with a content-addressed run id
//! - Bar loading from CSV files or a seeded synthetic walk
//! - Single-run pipeline: load, enrich, trim warmup, simulate, analyze
//! - JSON/CSV artifact export
//! - Tracing subscriber setup

pub mod config;
pub mod data_loader;
pub mod export;
pub mod logging;
pub mod runner;

pub use config::{ConfigError, RunConfig, RunId, StrategyConfig, ValidatedConfig};
pub use data_loader::{
    generate_synthetic_bars, load_bars, load_csv, BarSource, LoadError, LoadedBars, SyntheticSpec,
};
pub use export::{
    export_json, import_json, load_artifacts, save_artifacts, write_equity_csv, write_trades_csv,
    ExportError,
};
pub use logging::{init_logging, LogConfig, LogFormat, LoggingError};
pub use runner::{
    build_indicator_engine, enrich, run_backtest, run_backtest_on_store, BacktestResult, RunError,
    SCHEMA_VERSION,
};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn result_types_are_send_sync() {
        assert_send::<BacktestResult>();
        assert_sync::<BacktestResult>();
        assert_send::<LoadedBars>();
        assert_sync::<LoadedBars>();
    }

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<RunConfig>();
        assert_sync::<RunConfig>();
        assert_send::<SyntheticSpec>();
        assert_sync::<SyntheticSpec>();
    }
}
