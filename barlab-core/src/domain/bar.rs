//! Bar: the fundamental market data unit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OHLCV bar for one instrument over one interval.
///
/// Bars are validated on entry to a `BarStore`; malformed bars are rejected,
/// never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Why a bar (or a bar sequence) was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BarError {
    #[error("{timestamp}: {field} is not finite ({value})")]
    NonFinite {
        timestamp: NaiveDateTime,
        field: &'static str,
        value: f64,
    },

    #[error("{timestamp}: {field} must be positive, got {value}")]
    NonPositivePrice {
        timestamp: NaiveDateTime,
        field: &'static str,
        value: f64,
    },

    #[error("{timestamp}: {field} must be non-negative, got {value}")]
    Negative {
        timestamp: NaiveDateTime,
        field: &'static str,
        value: f64,
    },

    #[error("{timestamp}: high {high} is below max(open, close) {body_high}")]
    HighBelowBody {
        timestamp: NaiveDateTime,
        high: f64,
        body_high: f64,
    },

    #[error("{timestamp}: low {low} is above min(open, close) {body_low}")]
    LowAboveBody {
        timestamp: NaiveDateTime,
        low: f64,
        body_low: f64,
    },

    #[error("timestamp {timestamp} does not follow {previous} (timestamps must be strictly increasing)")]
    NonMonotonic {
        previous: NaiveDateTime,
        timestamp: NaiveDateTime,
    },
}

impl Bar {
    pub fn new(
        timestamp: NaiveDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Result<Self, BarError> {
        let bar = Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        };
        bar.validate()?;
        Ok(bar)
    }

    /// Check the OHLCV invariants: all fields finite, open/close positive,
    /// low/volume non-negative, high >= max(open, close) >= min(open, close) >= low.
    pub fn validate(&self) -> Result<(), BarError> {
        let ts = self.timestamp;
        for (field, value) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ] {
            if !value.is_finite() {
                return Err(BarError::NonFinite {
                    timestamp: ts,
                    field,
                    value,
                });
            }
        }
        for (field, value) in [("open", self.open), ("close", self.close)] {
            if value <= 0.0 {
                return Err(BarError::NonPositivePrice {
                    timestamp: ts,
                    field,
                    value,
                });
            }
        }
        for (field, value) in [("low", self.low), ("volume", self.volume)] {
            if value < 0.0 {
                return Err(BarError::Negative {
                    timestamp: ts,
                    field,
                    value,
                });
            }
        }

        let body_high = self.open.max(self.close);
        let body_low = self.open.min(self.close);
        if self.high < body_high {
            return Err(BarError::HighBelowBody {
                timestamp: ts,
                high: self.high,
                body_high,
            });
        }
        if self.low > body_low {
            return Err(BarError::LowAboveBody {
                timestamp: ts,
                low: self.low,
                body_low,
            });
        }
        Ok(())
    }

    /// Typical price: (high + low + close) / 3.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}
