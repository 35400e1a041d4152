//! Run output: equity curve, order history, fills and round trips.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{FillEvent, Order, OrderStatus, TradeRecord};

/// Mark-to-market state at one bar's close, recorded before that bar's order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquitySnapshot {
    pub timestamp: NaiveDateTime,
    pub equity: f64,
    pub cash: f64,
    pub position_size: f64,
    pub close: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub symbol: String,
    pub strategy: String,
    /// One snapshot per processed bar.
    pub equity_curve: Vec<EquitySnapshot>,
    /// Every terminal order in resolution order.
    pub orders: Vec<Order>,
    pub fills: Vec<FillEvent>,
    pub trades: Vec<TradeRecord>,
    pub initial_cash: f64,
    /// Cash after the end-of-run liquidation; the position is always flat here.
    pub final_cash: f64,
    pub bar_count: usize,
    pub warmup_bars: usize,
    /// Whether an open position had to be closed at the end of data.
    pub forced_exit: bool,
}

impl RunResult {
    pub fn rejected_orders(&self) -> impl Iterator<Item = &Order> {
        self.orders
            .iter()
            .filter(|o| matches!(o.status, OrderStatus::Rejected { .. }))
    }

    pub fn equity_values(&self) -> Vec<f64> {
        self.equity_curve.iter().map(|s| s.equity).collect()
    }
}
