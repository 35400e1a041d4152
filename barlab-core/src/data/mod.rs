//! Bar input: the append-only store and its flat-table codec.

pub mod bar_store;
pub mod csv_table;
pub mod schema;

pub use bar_store::BarStore;
pub use csv_table::{parse_timestamp, read_bars, write_bars, DataError};
