//! Backtest simulation: broker, order lifecycle and the event loop.

pub mod broker;
pub mod config;
pub mod event_loop;
pub mod lifecycle;
pub mod observer;
pub mod result;
pub mod trades;

pub use broker::Broker;
pub use config::{ConfigError, EngineConfig};
pub use event_loop::BacktestEngine;
pub use lifecycle::{OrderLifecycle, Submission};
pub use observer::{NullObserver, OrderObserver, RecordingObserver, TracingObserver};
pub use result::{EquitySnapshot, RunResult};
pub use trades::extract_trades;
