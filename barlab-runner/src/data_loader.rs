//! Bar loading for the runner.
//!
//! Bars come from one of two sources:
//! 1. A CSV file (`Time,Open,High,Low,Close,Volume`)
//! 2. A seeded random walk, for demos and tests
//!
//! Synthetic data is tagged as such in every result built from it.

use std::fs::File;
use std::path::{Path, PathBuf};

use barlab_core::data::{read_bars, BarStore, DataError};
use barlab_core::domain::{Bar, BarError};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open bar file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("bar file {path}: {source}")]
    Data {
        path: PathBuf,
        #[source]
        source: DataError,
    },

    #[error("bar file {0} contains no bars")]
    Empty(PathBuf),

    #[error("synthetic series needs at least one bar")]
    NoSyntheticBars,

    #[error("synthetic bar interval must be between 1 and 390 minutes, got {0}")]
    BadInterval(i64),

    #[error("generated bar failed validation: {0}")]
    Synthetic(#[from] BarError),
}

/// Parameters of a synthetic intraday random walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticSpec {
    pub seed: u64,
    pub bars: usize,
    pub start_date: NaiveDate,
    pub interval_minutes: i64,
    pub start_price: f64,
    /// Largest absolute per-bar return.
    pub max_step: f64,
}

impl Default for SyntheticSpec {
    fn default() -> Self {
        Self {
            seed: 42,
            bars: 2_000,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap_or_default(),
            interval_minutes: 60,
            start_price: 100.0,
            max_step: 0.01,
        }
    }
}

/// Where bars come from.
#[derive(Debug, Clone, PartialEq)]
pub enum BarSource {
    File(PathBuf),
    Synthetic(SyntheticSpec),
}

/// A loaded store plus its provenance.
#[derive(Debug, Clone)]
pub struct LoadedBars {
    pub store: BarStore,
    /// BLAKE3 over all bar data.
    pub dataset_hash: String,
    pub synthetic: bool,
}

pub fn load_bars(symbol: &str, source: &BarSource) -> Result<LoadedBars, LoadError> {
    let (store, synthetic) = match source {
        BarSource::File(path) => (load_csv(symbol, path)?, false),
        BarSource::Synthetic(spec) => {
            warn!(symbol, seed = spec.seed, "using synthetic bars; results will be tagged");
            (generate_synthetic_bars(symbol, spec)?, true)
        }
    };
    let dataset_hash = store.dataset_hash();
    info!(
        symbol,
        bars = store.len(),
        synthetic,
        dataset = &dataset_hash[..12],
        "bars loaded"
    );
    Ok(LoadedBars {
        store,
        dataset_hash,
        synthetic,
    })
}

/// Read and validate a CSV bar table.
pub fn load_csv(symbol: &str, path: &Path) -> Result<BarStore, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let store = read_bars(symbol, file).map_err(|source| LoadError::Data {
        path: path.to_path_buf(),
        source,
    })?;
    if store.is_empty() {
        return Err(LoadError::Empty(path.to_path_buf()));
    }
    Ok(store)
}

const SESSION_OPEN: (u32, u32) = (9, 30);
const SESSION_MINUTES: i64 = 390;

/// Generate a reproducible random walk of intraday bars.
///
/// Bars fall inside a 09:30–16:00 weekday session; the same spec always
/// yields the same bars.
pub fn generate_synthetic_bars(symbol: &str, spec: &SyntheticSpec) -> Result<BarStore, LoadError> {
    if spec.bars == 0 {
        return Err(LoadError::NoSyntheticBars);
    }
    if !(1..=SESSION_MINUTES).contains(&spec.interval_minutes) {
        return Err(LoadError::BadInterval(spec.interval_minutes));
    }

    let mut rng = StdRng::seed_from_u64(spec.seed);
    let step = spec.max_step.abs().max(f64::EPSILON);
    let per_session = SESSION_MINUTES / spec.interval_minutes;
    let mut day = next_weekday(spec.start_date);
    let mut slot = 0;
    let mut price = spec.start_price;
    let mut bars = Vec::with_capacity(spec.bars);

    while bars.len() < spec.bars {
        if slot == per_session {
            day = next_weekday(day + Duration::days(1));
            slot = 0;
        }
        let timestamp = session_start(day) + Duration::minutes(slot * spec.interval_minutes);
        slot += 1;

        let open = price;
        let close = price * (1.0 + rng.gen_range(-step..step));
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..step / 2.0));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..step / 2.0));
        let volume = rng.gen_range(100.0..10_000.0_f64).round();
        bars.push(Bar::new(timestamp, open, high, low, close, volume)?);
        price = close;
    }

    Ok(BarStore::from_bars(symbol, bars)?)
}

fn next_weekday(mut day: NaiveDate) -> NaiveDate {
    while matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
        day += Duration::days(1);
    }
    day
}

fn session_start(day: NaiveDate) -> NaiveDateTime {
    let (h, m) = SESSION_OPEN;
    day.and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default())
}
