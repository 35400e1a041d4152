//! Warmup trimming policies.
//!
//! EMA-family columns are defined from row 0 but unreliable until their span
//! has elapsed; rolling columns are simply undefined before their window fills.
//! A policy decides what a strategy gets to see of that prefix.

use serde::{Deserialize, Serialize};

use super::table::{Column, EnrichedTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", content = "bars", rename_all = "snake_case")]
pub enum WarmupPolicy {
    /// Keep every row and every raw value.
    None,
    /// Drop a fixed number of leading rows from the whole table.
    Fixed(usize),
    /// Drop the largest declared lookback from the whole table.
    #[default]
    MaxLookback,
    /// Keep every row but blank each column's own lookback prefix.
    MaskPerColumn,
}

impl WarmupPolicy {
    /// Leading rows removed from a table whose widest lookback is `max_lookback`.
    pub fn rows_to_drop(&self, max_lookback: usize) -> usize {
        match self {
            WarmupPolicy::None | WarmupPolicy::MaskPerColumn => 0,
            WarmupPolicy::Fixed(n) => *n,
            WarmupPolicy::MaxLookback => max_lookback,
        }
    }
}

impl EnrichedTable {
    /// Apply a warmup policy, returning a new table.
    ///
    /// Dropping more rows than the table holds yields an empty table.
    pub fn trim_warmup(&self, policy: WarmupPolicy) -> EnrichedTable {
        let drop = policy.rows_to_drop(self.max_lookback()).min(self.len());
        let already = self.trimmed_rows();
        let (symbol, bars, columns) = self.clone().into_parts();

        let columns = columns
            .into_iter()
            .map(|mut col| {
                if policy == WarmupPolicy::MaskPerColumn {
                    let n = col.lookback.min(col.values.len());
                    col.values[..n].fill(f64::NAN);
                }
                let values = col.values.split_off(drop);
                Column::new(col.name, col.lookback, values)
            })
            .collect();
        let bars = bars[drop..].to_vec();

        EnrichedTable::new(symbol, bars, columns).with_trimmed_rows(already + drop)
    }
}
