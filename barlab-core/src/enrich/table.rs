//! The enriched table: bars plus one aligned column per indicator.

use std::collections::HashMap;
use std::io::Write;

use chrono::NaiveDateTime;

use crate::data::schema::{BAR_COLUMNS, OUTPUT_TIME_FORMAT};
use crate::data::DataError;
use crate::domain::Bar;

/// One computed indicator series.
#[derive(Debug, Clone)]
pub struct Column {
    pub(crate) name: String,
    pub(crate) lookback: usize,
    /// `NaN` marks an undefined row.
    pub(crate) values: Vec<f64>,
}

impl Column {
    pub fn new(name: impl Into<String>, lookback: usize, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            lookback,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Read-only table of bars and indicator columns, materialized before a run.
///
/// Column order is the order the indicators were configured in.
#[derive(Debug, Clone)]
pub struct EnrichedTable {
    symbol: String,
    bars: Vec<Bar>,
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    /// Leading rows removed by warmup trimming.
    trimmed_rows: usize,
}

fn defined(v: f64) -> Option<f64> {
    if v.is_nan() {
        None
    } else {
        Some(v)
    }
}

impl EnrichedTable {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>, columns: Vec<Column>) -> Self {
        debug_assert!(columns.iter().all(|c| c.values.len() == bars.len()));
        let mut index = HashMap::with_capacity(columns.len());
        for (i, col) in columns.iter().enumerate() {
            index.entry(col.name.clone()).or_insert(i);
        }
        Self {
            symbol: symbol.into(),
            bars,
            columns,
            index,
            trimmed_rows: 0,
        }
    }

    pub(crate) fn with_trimmed_rows(mut self, trimmed_rows: usize) -> Self {
        self.trimmed_rows = trimmed_rows;
        self
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn trimmed_rows(&self) -> usize {
        self.trimmed_rows
    }

    /// Raw series for a column, `NaN` where undefined.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.index.get(name).map(|&i| self.columns[i].values.as_slice())
    }

    pub fn lookback(&self, name: &str) -> Option<usize> {
        self.index.get(name).map(|&i| self.columns[i].lookback)
    }

    pub fn max_lookback(&self) -> usize {
        self.columns.iter().map(|c| c.lookback).max().unwrap_or(0)
    }

    /// Value of `name` at `row`; `None` when undefined, unknown or out of range.
    pub fn value(&self, name: &str, row: usize) -> Option<f64> {
        self.column(name)
            .and_then(|v| v.get(row).copied())
            .and_then(defined)
    }

    pub fn row(&self, index: usize) -> Option<EnrichedRow<'_>> {
        (index < self.len()).then_some(EnrichedRow { table: self, index })
    }

    pub fn rows(&self) -> impl Iterator<Item = EnrichedRow<'_>> {
        (0..self.len()).map(move |index| EnrichedRow { table: self, index })
    }

    /// History visible to a strategy at `index`: rows `0..=index` and nothing after.
    pub fn view_until(&self, index: usize) -> Option<TableView<'_>> {
        (index < self.len()).then_some(TableView { table: self, end: index })
    }

    pub(crate) fn into_parts(self) -> (String, Vec<Bar>, Vec<Column>) {
        (self.symbol, self.bars, self.columns)
    }

    /// BLAKE3 over bars, column names and column bit patterns.
    ///
    /// Recomputing the same store with the same catalogue yields the same hash.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.symbol.as_bytes());
        for bar in &self.bars {
            hasher.update(&bar.timestamp.and_utc().timestamp().to_le_bytes());
            for v in [bar.open, bar.high, bar.low, bar.close, bar.volume] {
                hasher.update(&v.to_le_bytes());
            }
        }
        for col in &self.columns {
            hasher.update(col.name.as_bytes());
            for &v in &col.values {
                let v = if v.is_nan() { f64::NAN } else { v };
                hasher.update(&v.to_bits().to_le_bytes());
            }
        }
        hasher.finalize().to_hex().to_string()
    }

    /// Write the bar columns followed by every indicator column.
    ///
    /// Undefined values are written as empty fields.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), DataError> {
        let mut wtr = csv::Writer::from_writer(writer);
        let header: Vec<&str> = BAR_COLUMNS
            .iter()
            .copied()
            .chain(self.column_names())
            .collect();
        wtr.write_record(&header)?;

        for row in self.rows() {
            let bar = row.bar();
            let mut record = Vec::with_capacity(header.len());
            record.push(bar.timestamp.format(OUTPUT_TIME_FORMAT).to_string());
            for v in [bar.open, bar.high, bar.low, bar.close, bar.volume] {
                record.push(v.to_string());
            }
            for col in &self.columns {
                let v = col.values[row.index];
                record.push(if v.is_nan() { String::new() } else { v.to_string() });
            }
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// One bar plus every indicator value at its timestamp.
#[derive(Debug, Clone, Copy)]
pub struct EnrichedRow<'a> {
    table: &'a EnrichedTable,
    index: usize,
}

impl<'a> EnrichedRow<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn bar(&self) -> &'a Bar {
        &self.table.bars[self.index]
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.bar().timestamp
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.table.value(name, self.index)
    }

    pub fn values(&self) -> impl Iterator<Item = (&'a str, Option<f64>)> + 'a {
        let index = self.index;
        self.table
            .columns
            .iter()
            .map(move |c| (c.name.as_str(), defined(c.values[index])))
    }
}

/// A strategy's window onto the table: the current row and everything before it.
#[derive(Debug, Clone, Copy)]
pub struct TableView<'a> {
    table: &'a EnrichedTable,
    end: usize,
}

impl<'a> TableView<'a> {
    /// Index of the current row.
    pub fn index(&self) -> usize {
        self.end
    }

    /// Number of visible rows.
    pub fn len(&self) -> usize {
        self.end + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn current(&self) -> EnrichedRow<'a> {
        EnrichedRow {
            table: self.table,
            index: self.end,
        }
    }

    pub fn bar(&self) -> &'a Bar {
        &self.table.bars[self.end]
    }

    /// Bars up to and including the current one.
    pub fn history(&self) -> &'a [Bar] {
        &self.table.bars[..=self.end]
    }

    pub fn row(&self, index: usize) -> Option<EnrichedRow<'a>> {
        (index <= self.end).then_some(EnrichedRow {
            table: self.table,
            index,
        })
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.table.value(name, self.end)
    }

    pub fn value_at(&self, name: &str, index: usize) -> Option<f64> {
        if index > self.end {
            return None;
        }
        self.table.value(name, index)
    }

    /// Value one row back, `None` on the first row.
    pub fn previous(&self, name: &str) -> Option<f64> {
        self.end
            .checked_sub(1)
            .and_then(|i| self.table.value(name, i))
    }
}
