//! PerformanceAnalyzer: post-run aggregation of the equity curve.

pub mod frequency;
pub mod metrics;
pub mod report;

pub use frequency::Frequency;
pub use report::{AnalyzerConfig, PerformanceAnalyzer, PerformanceReport};
