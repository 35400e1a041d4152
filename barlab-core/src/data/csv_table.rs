//! CSV codec for the flat bar table.

use std::io::{Read, Write};

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use super::bar_store::BarStore;
use super::schema::{check_header, HeaderMismatch, BAR_COLUMNS, DATE_FORMAT, OUTPUT_TIME_FORMAT, TIME_FORMATS};
use crate::domain::{Bar, BarError};

/// Fatal input errors raised before any computation starts.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("column '{column}' at position {found}, expected position {expected}")]
    ColumnOrder {
        column: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("row {row}: cannot parse timestamp '{value}'")]
    BadTimestamp { row: usize, value: String },

    #[error("row {row}: cannot parse {column} value '{value}'")]
    BadNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: {source}")]
    InvalidBar {
        row: usize,
        #[source]
        source: BarError,
    },
}

/// Parse a timestamp in any of the accepted formats.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Read a bar table (`Time,Open,High,Low,Close,Volume`) into a validated store.
///
/// Rows are 1-based data rows (the header is row 0) in error messages.
pub fn read_bars<R: Read>(symbol: &str, reader: R) -> Result<BarStore, DataError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    check_header(headers.iter()).map_err(|m| match m {
        HeaderMismatch::Missing(c) => DataError::MissingColumn(c.to_string()),
        HeaderMismatch::Misplaced {
            column,
            expected,
            found,
        } => DataError::ColumnOrder {
            column,
            expected,
            found,
        },
    })?;

    let mut store = BarStore::new(symbol);
    for (i, record) in rdr.records().enumerate() {
        let row = i + 1;
        let record = record?;
        let field = |col: usize| record.get(col).unwrap_or("");

        let raw_time = field(0);
        let timestamp = parse_timestamp(raw_time).ok_or_else(|| DataError::BadTimestamp {
            row,
            value: raw_time.to_string(),
        })?;

        let mut values = [0.0f64; 5];
        for (k, value) in values.iter_mut().enumerate() {
            let raw = field(k + 1);
            *value = raw.parse::<f64>().map_err(|_| DataError::BadNumber {
                row,
                column: BAR_COLUMNS[k + 1],
                value: raw.to_string(),
            })?;
        }
        let [open, high, low, close, volume] = values;

        let bar = Bar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        };
        store
            .push(bar)
            .map_err(|source| DataError::InvalidBar { row, source })?;
    }

    Ok(store)
}

/// Write a store back out in the canonical column order.
pub fn write_bars<W: Write>(store: &BarStore, writer: W) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(BAR_COLUMNS)?;
    for bar in store.bars() {
        wtr.write_record([
            bar.timestamp.format(OUTPUT_TIME_FORMAT).to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
