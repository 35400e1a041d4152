//! OrderLifecycle: the single in-flight order slot.
//!
//! `Idle → Pending(Submitted) → Idle`, with the order leaving as `Filled` or
//! `Rejected` into the history. A submission while an order is pending is
//! ignored, not queued.

use chrono::NaiveDateTime;

use super::broker::Broker;
use crate::domain::{Order, OrderId, OrderSide, RejectReason};

#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Idle,
    Pending(Order),
}

/// Outcome of a submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Accepted(OrderId),
    /// Another order was already in flight; nothing changed.
    Ignored { pending: OrderId },
}

#[derive(Debug, Clone)]
pub struct OrderLifecycle {
    slot: Slot,
    next_id: u64,
    history: Vec<Order>,
}

impl Default for OrderLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderLifecycle {
    pub fn new() -> Self {
        Self {
            slot: Slot::Idle,
            next_id: 1,
            history: Vec::new(),
        }
    }

    pub fn pending(&self) -> Option<&Order> {
        match &self.slot {
            Slot::Idle => None,
            Slot::Pending(order) => Some(order),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending().is_some()
    }

    pub fn submit(
        &mut self,
        side: OrderSide,
        requested_size: f64,
        submitted_at: NaiveDateTime,
    ) -> Submission {
        match &self.slot {
            Slot::Pending(order) => Submission::Ignored { pending: order.id },
            Slot::Idle => {
                let id = OrderId(self.next_id);
                self.next_id += 1;
                self.slot = Slot::Pending(Order::submitted(id, side, requested_size, submitted_at));
                Submission::Accepted(id)
            }
        }
    }

    /// Resolve the pending order against the broker at `price`.
    ///
    /// Returns the terminal order, or `None` if nothing was pending.
    pub fn resolve(
        &mut self,
        broker: &mut Broker,
        price: f64,
        at: NaiveDateTime,
    ) -> Option<&Order> {
        let order = self.take()?;
        let done = broker.execute(order, price, at);
        self.history.push(done);
        self.history.last()
    }

    /// Reject the pending order without consulting the broker.
    pub fn reject(&mut self, reason: RejectReason) -> Option<&Order> {
        let order = self.take()?;
        self.history.push(order.into_rejected(reason));
        self.history.last()
    }

    fn take(&mut self) -> Option<Order> {
        match std::mem::replace(&mut self.slot, Slot::Idle) {
            Slot::Idle => None,
            Slot::Pending(order) => Some(order),
        }
    }

    /// Every terminal order, in resolution order.
    pub fn history(&self) -> &[Order] {
        &self.history
    }

    pub fn into_history(self) -> Vec<Order> {
        self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderStatus;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(16, 0, 0)
            .unwrap()
    }

    #[test]
    fn second_submission_is_ignored() {
        let mut lc = OrderLifecycle::new();
        assert_eq!(lc.submit(OrderSide::Buy, 57.0, ts()), Submission::Accepted(OrderId(1)));
        assert_eq!(
            lc.submit(OrderSide::Buy, 10.0, ts()),
            Submission::Ignored { pending: OrderId(1) }
        );
        assert_eq!(lc.pending().unwrap().requested_size, 57.0);
    }

    #[test]
    fn resolve_moves_order_to_history() {
        let mut lc = OrderLifecycle::new();
        let mut broker = Broker::new(600.0, 0.001);
        lc.submit(OrderSide::Buy, 57.0, ts());
        let order = lc.resolve(&mut broker, 10.0, ts()).unwrap();
        assert!(matches!(order.status, OrderStatus::Filled(_)));
        assert!(!lc.is_pending());
        assert_eq!(lc.history().len(), 1);
        assert!(lc.resolve(&mut broker, 10.0, ts()).is_none());
    }

    #[test]
    fn ids_are_sequential() {
        let mut lc = OrderLifecycle::new();
        let mut broker = Broker::new(100.0, 0.0);
        lc.submit(OrderSide::Close, 0.0, ts());
        lc.resolve(&mut broker, 1.0, ts());
        assert_eq!(lc.submit(OrderSide::Buy, 1.0, ts()), Submission::Accepted(OrderId(2)));
    }

    #[test]
    fn explicit_reject() {
        let mut lc = OrderLifecycle::new();
        lc.submit(OrderSide::Buy, 0.0, ts());
        let order = lc
            .reject(RejectReason::InvalidStake { stake_fraction: 2.0 })
            .unwrap();
        assert!(order.status.is_terminal());
        assert!(!lc.is_pending());
    }
}
