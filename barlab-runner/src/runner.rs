//! Backtest runner: wires loading, enrichment, simulation and analysis.
//!
//! Two entry points:
//! - `run_backtest()`: loads bars from a `BarSource`, then runs. Used by the CLI.
//! - `run_backtest_on_store()`: takes an already loaded store, no I/O.

use barlab_core::analysis::{PerformanceAnalyzer, PerformanceReport};
use barlab_core::data::BarStore;
use barlab_core::engine::{BacktestEngine, RunResult};
use barlab_core::enrich::{EnrichedTable, IndicatorConfig, IndicatorEngine};
use barlab_core::indicators::Indicator;
use barlab_core::strategy::Strategy;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{ConfigError, RunConfig, RunId};
use crate::data_loader::{load_bars, BarSource, LoadError};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("data error: {0}")]
    Load(#[from] LoadError),

    #[error("warmup trimming dropped all {0} bars; supply more data or relax [warmup]")]
    NothingToSimulate(usize),
}

impl From<barlab_core::ConfigError> for RunError {
    fn from(err: barlab_core::ConfigError) -> Self {
        RunError::Config(err.into())
    }
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of a single backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub run_id: RunId,
    pub config: RunConfig,
    pub dataset_hash: String,
    /// BLAKE3 of the enriched table the strategy saw.
    pub table_fingerprint: String,
    pub synthetic: bool,
    /// Leading rows dropped by the warmup policy.
    pub warmup_rows: usize,
    pub report: PerformanceReport,
    pub run: RunResult,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// The configured catalogue plus any column `strategy` reads that it lacks.
pub fn build_indicator_engine(
    indicators: &IndicatorConfig,
    strategy: &dyn Strategy,
) -> Result<IndicatorEngine, barlab_core::ConfigError> {
    let mut columns: Vec<Box<dyn Indicator>> = indicators.build()?;
    for extra in strategy.required_indicators() {
        if !columns.iter().any(|c| c.name() == extra.name()) {
            columns.push(extra);
        }
    }
    Ok(IndicatorEngine::new(columns))
}

/// Enrich `store` for `config` and apply its warmup policy.
pub fn enrich(config: &RunConfig, store: &BarStore) -> Result<EnrichedTable, RunError> {
    let validated = config.validate()?;
    let engine = build_indicator_engine(&config.indicators, validated.strategy.as_ref())?;
    Ok(engine.compute(store).trim_warmup(config.warmup))
}

/// Load bars from `source`, then run.
pub fn run_backtest(config: &RunConfig, source: &BarSource) -> Result<BacktestResult, RunError> {
    let loaded = load_bars(&config.backtest.symbol, source)?;
    run_backtest_on_store(config, &loaded.store, loaded.synthetic)
}

/// Run on pre-loaded bars with no I/O.
pub fn run_backtest_on_store(
    config: &RunConfig,
    store: &BarStore,
    synthetic: bool,
) -> Result<BacktestResult, RunError> {
    let validated = config.validate()?;
    let strategy = validated.strategy.as_ref();
    let run_id = config.run_id();

    let engine = build_indicator_engine(&config.indicators, strategy)?;
    let table = engine.compute(store).trim_warmup(config.warmup);
    if table.is_empty() {
        return Err(RunError::NothingToSimulate(store.len()));
    }
    if synthetic {
        warn!(run_id = %run_id, "running on synthetic bars");
    }

    let run = BacktestEngine::new(validated.engine).run(&table, strategy);
    let report = PerformanceAnalyzer::new(validated.analyzer).analyze_run(&run);
    info!(
        run_id = %run_id,
        trades = report.trade_count,
        total_return_pct = report.total_return_pct,
        max_drawdown_pct = report.max_drawdown_pct,
        "run complete"
    );

    Ok(BacktestResult {
        schema_version: SCHEMA_VERSION,
        run_id,
        config: config.clone(),
        dataset_hash: store.dataset_hash(),
        table_fingerprint: table.fingerprint(),
        synthetic,
        warmup_rows: table.trimmed_rows(),
        report,
        run,
    })
}
