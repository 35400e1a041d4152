//! Broker: cash, one long-only position, and commission.
//!
//! Orders resolve immediately at the price they are executed against; there is
//! no latency, slippage or partial fill.

use chrono::NaiveDateTime;

use crate::domain::{Execution, Order, OrderSide, Position, RejectReason};

#[derive(Debug, Clone, PartialEq)]
pub struct Broker {
    cash: f64,
    commission_rate: f64,
    position: Position,
}

impl Broker {
    pub fn new(cash: f64, commission_rate: f64) -> Self {
        Self {
            cash,
            commission_rate,
            position: Position::flat(),
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn commission_rate(&self) -> f64 {
        self.commission_rate
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// cash + position.size × close.
    pub fn equity(&self, close: f64) -> f64 {
        self.cash + self.position.market_value(close)
    }

    pub fn commission(&self, notional: f64) -> f64 {
        self.commission_rate * notional.abs()
    }

    /// Whole units bought by committing `stake_fraction` of cash at `close`.
    pub fn entry_size(&self, stake_fraction: f64, close: f64) -> f64 {
        if close <= 0.0 || self.cash <= 0.0 {
            return 0.0;
        }
        (stake_fraction * self.cash / close).floor()
    }

    /// Resolve a submitted order against `price`, returning it in a terminal state.
    ///
    /// Fills debit notional plus commission on buys and credit notional less
    /// commission on sells. Rejections leave broker state untouched.
    pub fn execute(&mut self, order: Order, price: f64, at: NaiveDateTime) -> Order {
        match self.check(&order, price) {
            Ok(size) => {
                let notional = size * price;
                let commission = self.commission(notional);
                match order.side {
                    OrderSide::Buy => {
                        self.cash -= notional + commission;
                        self.position.add(size, price);
                    }
                    OrderSide::Sell | OrderSide::Close => {
                        self.cash += notional - commission;
                        self.position.reduce(size);
                    }
                }
                order.into_filled(Execution {
                    price,
                    size,
                    commission,
                    filled_at: at,
                })
            }
            Err(reason) => order.into_rejected(reason),
        }
    }

    /// The size that would fill, or why the order cannot.
    fn check(&self, order: &Order, price: f64) -> Result<f64, RejectReason> {
        match order.side {
            OrderSide::Buy => {
                if !self.position.is_flat() {
                    return Err(RejectReason::AlreadyLong {
                        held: self.position.size,
                    });
                }
                let size = order.requested_size;
                if size <= 0.0 {
                    return Err(RejectReason::ZeroSize);
                }
                let notional = size * price;
                let required = notional + self.commission(notional);
                if required > self.cash {
                    return Err(RejectReason::InsufficientCash {
                        required,
                        available: self.cash,
                    });
                }
                Ok(size)
            }
            OrderSide::Sell => {
                let size = order.requested_size;
                if self.position.is_flat() {
                    return Err(RejectReason::NoPosition);
                }
                if size <= 0.0 {
                    return Err(RejectReason::ZeroSize);
                }
                if size > self.position.size {
                    return Err(RejectReason::ExceedsPosition {
                        requested: size,
                        held: self.position.size,
                    });
                }
                Ok(size)
            }
            OrderSide::Close => {
                if self.position.is_flat() {
                    return Err(RejectReason::NoPosition);
                }
                Ok(self.position.size)
            }
        }
    }
}
