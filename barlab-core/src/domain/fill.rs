//! Fill notifications and completed round trips.

use super::order::{OrderId, OrderSide};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Payload of the notification hook, fired on every order fill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillEvent {
    pub order_id: OrderId,
    pub timestamp: NaiveDateTime,
    pub side: OrderSide,
    pub price: f64,
    pub size: f64,
    pub commission: f64,
}

/// A closed round trip: entry fill(s) followed by a liquidating fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub entry_time: NaiveDateTime,
    pub exit_time: NaiveDateTime,
    pub entry_price: f64,
    pub exit_price: f64,
    pub size: f64,
    pub gross_pnl: f64,
    /// Entry plus exit commission.
    pub commission: f64,
    pub net_pnl: f64,
}

impl TradeRecord {
    pub fn is_winner(&self) -> bool {
        self.net_pnl > 0.0
    }

    pub fn return_pct(&self) -> f64 {
        if self.entry_price > 0.0 {
            (self.exit_price / self.entry_price - 1.0) * 100.0
        } else {
            0.0
        }
    }
}
