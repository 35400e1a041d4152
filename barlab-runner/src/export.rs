//! Artifact export: JSON result, equity curve, trade tape and enriched table.
//!
//! Persisted results carry a `schema_version`; newer versions are rejected on load.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use barlab_core::data::DataError;
use barlab_core::domain::TradeRecord;
use barlab_core::engine::EquitySnapshot;
use barlab_core::enrich::EnrichedTable;
use thiserror::Error;
use tracing::info;

use crate::runner::{BacktestResult, SCHEMA_VERSION};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("enriched table: {0}")]
    Table(#[from] DataError),

    #[error("unsupported schema version {found} (max supported: {supported})")]
    SchemaVersion { found: u32, supported: u32 },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ExportError + '_ {
    move |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    }
}

// ─── JSON ───────────────────────────────────────────────────────────

pub fn export_json(result: &BacktestResult) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(result)?)
}

pub fn import_json(json: &str) -> Result<BacktestResult, ExportError> {
    let result: BacktestResult = serde_json::from_str(json)?;
    if result.schema_version > SCHEMA_VERSION {
        return Err(ExportError::SchemaVersion {
            found: result.schema_version,
            supported: SCHEMA_VERSION,
        });
    }
    Ok(result)
}

// ─── CSV ────────────────────────────────────────────────────────────

/// Columns: timestamp, equity, cash, position_size, close.
pub fn write_equity_csv<W: Write>(curve: &[EquitySnapshot], writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["timestamp", "equity", "cash", "position_size", "close"])?;
    for snap in curve {
        wtr.write_record([
            snap.timestamp.format(TIME_FORMAT).to_string(),
            format!("{:.6}", snap.equity),
            format!("{:.6}", snap.cash),
            snap.position_size.to_string(),
            snap.close.to_string(),
        ])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_trades_csv<W: Write>(trades: &[TradeRecord], writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "entry_time",
        "exit_time",
        "entry_price",
        "exit_price",
        "size",
        "gross_pnl",
        "commission",
        "net_pnl",
    ])?;
    for t in trades {
        wtr.write_record([
            t.entry_time.format(TIME_FORMAT).to_string(),
            t.exit_time.format(TIME_FORMAT).to_string(),
            t.entry_price.to_string(),
            t.exit_price.to_string(),
            t.size.to_string(),
            format!("{:.6}", t.gross_pnl),
            format!("{:.6}", t.commission),
            format!("{:.6}", t.net_pnl),
        ])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the artifact set for one run under `output_dir/{symbol}_{run_id prefix}/`:
/// - `result.json`: the full `BacktestResult`
/// - `equity.csv`: one row per bar
/// - `trades.csv`: closed round trips
/// - `enriched.csv`: the enriched table, when given
///
/// Returns the created directory.
pub fn save_artifacts(
    result: &BacktestResult,
    table: Option<&EnrichedTable>,
    output_dir: &Path,
) -> Result<PathBuf, ExportError> {
    let dir = output_dir.join(format!("{}_{}", result.run.symbol, &result.run_id[..12]));
    std::fs::create_dir_all(&dir).map_err(io_error(&dir))?;

    let path = dir.join("result.json");
    std::fs::write(&path, export_json(result)?).map_err(io_error(&path))?;

    let path = dir.join("equity.csv");
    write_equity_csv(&result.run.equity_curve, create(&path)?)?;

    let path = dir.join("trades.csv");
    write_trades_csv(&result.run.trades, create(&path)?)?;

    if let Some(table) = table {
        let path = dir.join("enriched.csv");
        table.write_csv(create(&path)?)?;
    }

    info!(dir = %dir.display(), "artifacts saved");
    Ok(dir)
}

/// Load the `BacktestResult` of an artifact directory.
pub fn load_artifacts(dir: &Path) -> Result<BacktestResult, ExportError> {
    let path = dir.join("result.json");
    let json = std::fs::read_to_string(&path).map_err(io_error(&path))?;
    import_json(&json)
}

fn create(path: &Path) -> Result<File, ExportError> {
    File::create(path).map_err(io_error(path))
}
