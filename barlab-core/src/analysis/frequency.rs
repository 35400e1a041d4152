//! Snapshot periods and their annualization factors.

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The period equity snapshots are bucketed into before computing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every snapshot is its own period, annualised as a daily bar unless
    /// `periods_per_year` is given.
    Bar,
    Minute,
    Hour,
    #[default]
    Day,
    Week,
    Month,
    Year,
}

impl Frequency {
    /// Default periods per year: 252 trading days of 6.5 hours.
    pub fn periods_per_year(&self) -> f64 {
        match self {
            Frequency::Bar | Frequency::Day => 252.0,
            Frequency::Minute => 252.0 * 390.0,
            Frequency::Hour => 252.0 * 6.5,
            Frequency::Week => 52.0,
            Frequency::Month => 12.0,
            Frequency::Year => 1.0,
        }
    }

    /// Bucket key for `ts`; snapshots with equal keys share a period.
    ///
    /// `Bar` keys to the second, so strictly increasing timestamps never share one.
    pub(crate) fn bucket(&self, ts: NaiveDateTime) -> (i32, u32, u32, u32) {
        let d = ts.date();
        match self {
            Frequency::Bar => (d.year(), d.ordinal(), ts.hour(), ts.minute() * 60 + ts.second()),
            Frequency::Minute => (d.year(), d.ordinal(), ts.hour(), ts.minute()),
            Frequency::Hour => (d.year(), d.ordinal(), ts.hour(), 0),
            Frequency::Day => (d.year(), d.ordinal(), 0, 0),
            Frequency::Week => {
                let w = d.iso_week();
                (w.year(), w.week(), 0, 0)
            }
            Frequency::Month => (d.year(), d.month(), 0, 0),
            Frequency::Year => (d.year(), 0, 0, 0),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Frequency::Bar => "bar",
            Frequency::Minute => "minute",
            Frequency::Hour => "hour",
            Frequency::Day => "day",
            Frequency::Week => "week",
            Frequency::Month => "month",
            Frequency::Year => "year",
        };
        f.write_str(s)
    }
}
