//! Order types and the per-order status machine.
//!
//! `Submitted → Filled | Rejected`. Transitions consume the order so a
//! terminal order can never be resolved twice.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequential order identifier, unique within one backtest run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
    /// Liquidate the entire position.
    Close,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
            OrderSide::Close => "CLOSE",
        };
        f.write_str(s)
    }
}

/// Why the broker refused to fill an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
    /// Requested size resolved to zero units.
    ZeroSize,
    /// Notional plus commission exceeds available cash.
    InsufficientCash { required: f64, available: f64 },
    /// Sell size exceeds the held position.
    ExceedsPosition { requested: f64, held: f64 },
    /// Close or sell requested while flat.
    NoPosition,
    /// Buy requested while a position is already open.
    AlreadyLong { held: f64 },
    /// Stake fraction outside (0, 1].
    InvalidStake { stake_fraction: f64 },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::ZeroSize => write!(f, "size resolved to zero"),
            RejectReason::InsufficientCash {
                required,
                available,
            } => write!(f, "insufficient cash: need {required:.2}, have {available:.2}"),
            RejectReason::ExceedsPosition { requested, held } => {
                write!(f, "sell size {requested} exceeds position {held}")
            }
            RejectReason::NoPosition => write!(f, "no open position"),
            RejectReason::AlreadyLong { held } => write!(f, "already long {held} units"),
            RejectReason::InvalidStake { stake_fraction } => {
                write!(f, "stake fraction {stake_fraction} outside (0, 1]")
            }
        }
    }
}

/// Execution details recorded when an order fills.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub price: f64,
    pub size: f64,
    pub commission: f64,
    pub filled_at: NaiveDateTime,
}

/// Order lifecycle status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OrderStatus {
    Submitted,
    Filled(Execution),
    Rejected { reason: RejectReason },
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        match self {
            OrderStatus::Submitted => false,
            OrderStatus::Filled(_) | OrderStatus::Rejected { .. } => true,
        }
    }
}

/// A single order.
///
/// `requested_size` is 0 for `Close` orders; the broker resolves the size
/// from the held position at fill time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub side: OrderSide,
    pub requested_size: f64,
    pub submitted_at: NaiveDateTime,
    pub status: OrderStatus,
}

impl Order {
    pub fn submitted(
        id: OrderId,
        side: OrderSide,
        requested_size: f64,
        submitted_at: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            side,
            requested_size,
            submitted_at,
            status: OrderStatus::Submitted,
        }
    }

    /// `Submitted → Filled`.
    pub(crate) fn into_filled(mut self, execution: Execution) -> Self {
        debug_assert_eq!(self.status, OrderStatus::Submitted);
        self.status = OrderStatus::Filled(execution);
        self
    }

    /// `Submitted → Rejected`.
    pub(crate) fn into_rejected(mut self, reason: RejectReason) -> Self {
        debug_assert_eq!(self.status, OrderStatus::Submitted);
        self.status = OrderStatus::Rejected { reason };
        self
    }

    pub fn execution(&self) -> Option<&Execution> {
        match &self.status {
            OrderStatus::Filled(exec) => Some(exec),
            OrderStatus::Submitted | OrderStatus::Rejected { .. } => None,
        }
    }
}
