//! BarStore: append-only, strictly time-ordered bar sequence for one instrument.

use crate::domain::{Bar, BarError};
use serde::{Deserialize, Serialize};

/// Ordered, gap-tolerant OHLCV sequence for a single instrument.
///
/// The store only grows at the tail. Every bar is validated on entry and
/// timestamps must be strictly increasing; gaps between timestamps are fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarStore {
    symbol: String,
    bars: Vec<Bar>,
}

impl BarStore {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bars: Vec::new(),
        }
    }

    /// Build a store from a complete bar list, rejecting the whole list on
    /// the first malformed or out-of-order bar.
    pub fn from_bars(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, BarError> {
        let mut store = Self::new(symbol);
        store.extend(bars)?;
        Ok(store)
    }

    /// Append one bar to the tail.
    pub fn push(&mut self, bar: Bar) -> Result<(), BarError> {
        bar.validate()?;
        if let Some(last) = self.bars.last() {
            if bar.timestamp <= last.timestamp {
                return Err(BarError::NonMonotonic {
                    previous: last.timestamp,
                    timestamp: bar.timestamp,
                });
            }
        }
        self.bars.push(bar);
        Ok(())
    }

    /// Append a batch atomically: either every bar is appended or none is.
    ///
    /// Returns the number of bars appended.
    pub fn extend(&mut self, bars: impl IntoIterator<Item = Bar>) -> Result<usize, BarError> {
        let incoming: Vec<Bar> = bars.into_iter().collect();
        let mut previous = self.bars.last().map(|b| b.timestamp);
        for bar in &incoming {
            bar.validate()?;
            if let Some(prev) = previous {
                if bar.timestamp <= prev {
                    return Err(BarError::NonMonotonic {
                        previous: prev,
                        timestamp: bar.timestamp,
                    });
                }
            }
            previous = Some(bar.timestamp);
        }
        let appended = incoming.len();
        self.bars.extend(incoming);
        Ok(appended)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// BLAKE3 over symbol, timestamps and OHLCV values.
    ///
    /// Two stores with identical content always hash identically; used to tag
    /// run results and to detect when derived tables are stale.
    pub fn dataset_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.symbol.as_bytes());
        for bar in &self.bars {
            hasher.update(&bar.timestamp.and_utc().timestamp().to_le_bytes());
            hasher.update(&bar.open.to_le_bytes());
            hasher.update(&bar.high.to_le_bytes());
            hasher.update(&bar.low.to_le_bytes());
            hasher.update(&bar.close.to_le_bytes());
            hasher.update(&bar.volume.to_le_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }
}
